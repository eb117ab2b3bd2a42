// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proscenium DOM: a headless host document for widgets that need imperative access.
//!
//! Widgets in the Proscenium crates are declarative most of the time, but a
//! few of their duties only make sense against a live host: moving focus,
//! measuring an element's box, hooking a document-wide key listener, or
//! attaching content to a shared container outside the widget's own subtree.
//! This crate models exactly that host surface and nothing more.
//!
//! - [`Document`]: a generational element arena with attributes, text, form
//!   values, viewport boxes, focus, and a fullscreen slot.
//! - Element listeners run along a capture → target → bubble path built by
//!   [`dispatch::propagation_path`] and walked by [`dispatch::run`]; a handler
//!   can tell the event's own target from a bubbled descendant via
//!   [`Dispatch::is_target`](dispatch::Dispatch::is_target).
//! - Global listeners ([`Document::add_global_listener`]) fire after element
//!   propagation, in registration order.
//! - [`click::ClickState`] turns pointer down/up pairs into clicks.
//! - Interval timers run on a virtual clock advanced by [`Document::advance`].
//!
//! It is not a layout engine: hosts compute boxes with whatever layout they use
//! and record them with [`Document::set_bounds`].
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use proscenium_dom::{Document, EventKind, Key};
//!
//! let mut doc = Document::new();
//! let escapes = Rc::new(Cell::new(0));
//! let seen = escapes.clone();
//! let listener = doc.add_global_listener(
//!     EventKind::KeyDown,
//!     Rc::new(move |_, ev| {
//!         if ev.key() == Some(Key::Escape) {
//!             seen.set(seen.get() + 1);
//!         }
//!     }),
//! );
//!
//! doc.key_down(Key::Escape);
//! assert!(doc.remove_listener(listener));
//! doc.key_down(Key::Escape);
//! assert_eq!(escapes.get(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod click;
pub mod dispatch;
mod document;
mod error;
mod timer;
mod types;

pub use document::{Dispatched, Document, GlobalHandler, Handler};
pub use error::{FocusError, MeasureError};
pub use timer::TimerCallback;
pub use types::{ElementFlags, ElementId, Event, EventKind, Key, ListenerId, TimerId};
