// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proscenium Media: a media player widget commanded through an imperative handle.
//!
//! [`MediaPlayer`] owns a platform media element behind the [`NativeMedia`]
//! trait and keeps two kinds of data apart:
//!
//! - the element itself, the last non-zero volume, and the playback-rate cache
//!   live in [`MutRef`](proscenium_handle::MutRef)s and never cause a render;
//! - [`PlaybackState`] (playing, progress, volume) is render state, queued by
//!   commands and by [`MediaEvent`]s and applied on [`MediaPlayer::render`].
//!
//! The owner drives the player through a [`MediaHandle`] held in a
//! [`HandleCell`](proscenium_handle::HandleCell): play, pause, seek, fullscreen,
//! dimensions, and playback rate. The [`Controls`] sub-widget renders the
//! playback state and turns clicks, arrow keys, and slider input into the same
//! commands.
//!
//! [`TextEntry`] is a small companion widget with its own handle
//! ([`TextEntryHandle`]) for focusing, clearing, and reading its value.
//!
//! [`sim::SimulatedMedia`] is a deterministic element for tests and demos.
//!
//! ## Example
//!
//! ```
//! use kurbo::Size;
//! use proscenium_dom::Document;
//! use proscenium_handle::HandleCell;
//! use proscenium_media::sim::SimulatedMedia;
//! use proscenium_media::{MediaPlayer, MediaProps};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let media = SimulatedMedia::new();
//! let handle = HandleCell::new();
//! let mut player = MediaPlayer::mount(&mut doc, root, MediaProps::new("clip.mp4"), media.clone(), &handle);
//! media.load_metadata(100.0, Size::new(1280.0, 720.0));
//!
//! player.set_volume(0.7).unwrap();
//! player.toggle_mute().unwrap();
//! player.render(&mut doc);
//! assert_eq!(player.state().volume, 0.0);
//!
//! player.toggle_mute().unwrap();
//! player.render(&mut doc);
//! assert_eq!(player.state().volume, 0.7);
//!
//! handle.with(|h| h.set_current_time(42.0));
//! assert_eq!(handle.with(|h| h.current_time()), Some(42.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod controls;
mod error;
mod native;
mod player;
pub mod sim;
mod text_entry;

pub use controls::{
    ControlCallback, Controls, ControlsCallbacks, ControlsParts, ControlsProps, ValueCallback,
    keyboard_seek, scrub_percent, volume_glyph,
};
pub use error::MediaError;
pub use native::{MediaEvent, NativeMedia};
pub use player::{Dimensions, MediaConfig, MediaHandle, MediaPlayer, MediaProps, PlaybackState};
pub use text_entry::{SubmitCallback, TextEntry, TextEntryHandle, TextEntryProps};
