// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click synthesis from pointer down/up pairs.
//!
//! A click is emitted on the element that received the pointer-down when the
//! pointer-up lands on the same element. When the targets differ (for example
//! the content under the pointer re-rendered during the press), the press is
//! still honored if the pointer stayed within the configured spatial and
//! temporal tolerance; either tolerance set to `None` means unlimited, both
//! `None` means only same-target presses click.
//!
//! ```
//! use kurbo::Point;
//! use proscenium_dom::click::{ClickResult, ClickState};
//!
//! let mut state: ClickState<u32> = ClickState::new();
//! state.on_down(7, Point::new(10.0, 10.0), 1_000);
//! assert_eq!(state.on_up(&7, Point::new(40.0, 40.0), 1_500), ClickResult::Click(7));
//!
//! // Release over another element, far away: no click.
//! state.on_down(7, Point::new(10.0, 10.0), 2_000);
//! assert_eq!(state.on_up(&8, Point::new(90.0, 10.0), 2_010), ClickResult::Suppressed(Some(7)));
//! ```

use kurbo::Point;

/// Click recognizer for a single pointer.
#[derive(Clone, Debug)]
pub struct ClickState<K> {
    press: Option<Press<K>>,
    /// Distance the pointer may travel when down and up targets differ.
    pub distance_threshold: Option<f64>,
    /// Milliseconds the press may last when down and up targets differ.
    pub time_threshold: Option<u64>,
}

/// An active press.
#[derive(Clone, Debug, PartialEq)]
pub struct Press<K> {
    /// Element under the pointer when it went down.
    pub target: K,
    /// Position at press time.
    pub position: Point,
    /// Timestamp at press time, in milliseconds.
    pub time: u64,
}

/// Result of a pointer release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickResult<K> {
    /// Emit a click on this element.
    Click(K),
    /// No click; carries the pressed element, if there was an active press.
    Suppressed(Option<K>),
}

impl<K: PartialEq + Clone> Default for ClickState<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq + Clone> ClickState<K> {
    /// Create a recognizer with a 5 px / 100 ms tolerance for retargeted releases.
    pub fn new() -> Self {
        Self::with_thresholds(Some(5.0), Some(100))
    }

    /// Create a recognizer with custom tolerances.
    pub fn with_thresholds(distance_threshold: Option<f64>, time_threshold: Option<u64>) -> Self {
        Self {
            press: None,
            distance_threshold,
            time_threshold,
        }
    }

    /// Record a pointer-down. A press that never saw its release is replaced.
    pub fn on_down(&mut self, target: K, position: Point, time: u64) {
        self.press = Some(Press {
            target,
            position,
            time,
        });
    }

    /// Record a pointer-up and decide whether it completes a click.
    pub fn on_up(&mut self, target: &K, position: Point, time: u64) -> ClickResult<K> {
        let Some(press) = self.press.take() else {
            return ClickResult::Suppressed(None);
        };

        if press.target == *target {
            return ClickResult::Click(press.target);
        }

        if self.distance_threshold.is_none() && self.time_threshold.is_none() {
            return ClickResult::Suppressed(Some(press.target));
        }

        let distance_ok = self
            .distance_threshold
            .is_none_or(|limit| press.position.distance(position) <= limit);
        let time_ok = self
            .time_threshold
            .is_none_or(|limit| time.saturating_sub(press.time) <= limit);

        if distance_ok && time_ok {
            ClickResult::Click(press.target)
        } else {
            ClickResult::Suppressed(Some(press.target))
        }
    }

    /// Forget the active press, for example when its element was removed.
    pub fn cancel(&mut self) -> Option<Press<K>> {
        self.press.take()
    }

    /// The active press, if any.
    pub fn press(&self) -> Option<&Press<K>> {
        self.press.as_ref()
    }
}
