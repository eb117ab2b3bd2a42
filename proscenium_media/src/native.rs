// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract between the player widget and the platform's media element.

use kurbo::Size;

/// Asynchronous notifications from a media element.
///
/// Playback state changes are only observed through these: a `play()` call
/// returns before the element is actually playing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MediaEvent {
    /// The playback position moved.
    TimeUpdate,
    /// Playback started.
    Play,
    /// Playback paused.
    Pause,
    /// Playback reached the end of the media.
    Ended,
}

/// A playable media element owned by the platform.
///
/// The element is the source of truth for playback. Time values are in
/// seconds; [`NativeMedia::duration`] is NaN until the media's metadata is
/// known.
pub trait NativeMedia {
    /// Begin or resume playback.
    fn play(&mut self);

    /// Pause playback.
    fn pause(&mut self);

    /// Whether playback is paused.
    fn is_paused(&self) -> bool;

    /// Playback position in seconds.
    fn current_time(&self) -> f64;

    /// Jump to `seconds`.
    fn set_current_time(&mut self, seconds: f64);

    /// Total length in seconds; NaN when unknown.
    fn duration(&self) -> f64;

    /// Output volume in `[0, 1]`.
    fn volume(&self) -> f64;

    /// Set the output volume.
    fn set_volume(&mut self, volume: f64);

    /// Playback speed multiplier.
    fn playback_rate(&self) -> f64;

    /// Set the playback speed multiplier.
    fn set_playback_rate(&mut self, rate: f64);

    /// Size of the decoded frames, zero before metadata is loaded.
    fn intrinsic_size(&self) -> Size;

    /// Load a new source, resetting playback.
    fn set_source(&mut self, src: &str);

    /// Take the next pending notification, if any.
    ///
    /// Elements that deliver events through another channel keep the default.
    fn poll_event(&mut self) -> Option<MediaEvent> {
        None
    }
}
