// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic in-memory media element.
//!
//! [`SimulatedMedia`] behaves like a platform element with the network and
//! decoder taken out: commands change its state immediately and queue the
//! notifications a real element would fire later. The host (or a test) moves
//! the playback clock with [`SimulatedMedia::tick`] and forwards the queued
//! events to the player.
//!
//! Clones share the element, so the host can keep one to drive the clock while
//! the player owns another.

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Size;

use crate::native::{MediaEvent, NativeMedia};

#[derive(Debug)]
struct Sim {
    src: String,
    paused: bool,
    autoplay: bool,
    current: f64,
    duration: f64,
    volume: f64,
    rate: f64,
    size: Size,
    events: VecDeque<MediaEvent>,
}

/// An in-memory [`NativeMedia`] implementation.
///
/// ```
/// use kurbo::Size;
/// use proscenium_media::sim::SimulatedMedia;
/// use proscenium_media::{MediaEvent, NativeMedia};
///
/// let mut media = SimulatedMedia::with_metadata(10.0, Size::new(640.0, 360.0));
/// media.play();
/// media.tick(4.0);
/// assert_eq!(media.current_time(), 4.0);
/// assert_eq!(media.take_events(), vec![MediaEvent::Play, MediaEvent::TimeUpdate]);
/// ```
#[derive(Clone, Debug)]
pub struct SimulatedMedia {
    sim: Rc<RefCell<Sim>>,
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedMedia {
    /// A paused element whose metadata has not loaded.
    pub fn new() -> Self {
        Self {
            sim: Rc::new(RefCell::new(Sim {
                src: String::new(),
                paused: true,
                autoplay: false,
                current: 0.0,
                duration: f64::NAN,
                volume: 1.0,
                rate: 1.0,
                size: Size::ZERO,
                events: VecDeque::new(),
            })),
        }
    }

    /// A paused element with known duration and frame size.
    pub fn with_metadata(duration: f64, size: Size) -> Self {
        let media = Self::new();
        media.load_metadata(duration, size);
        media
    }

    /// Make the duration and frame size known.
    pub fn load_metadata(&self, duration: f64, size: Size) {
        let mut sim = self.sim.borrow_mut();
        sim.duration = duration;
        sim.size = size;
    }

    /// Start playing as soon as a source is set, like the `autoplay`
    /// attribute.
    pub fn set_autoplay(&self, autoplay: bool) {
        self.sim.borrow_mut().autoplay = autoplay;
    }

    /// Advance playback by `seconds` of wall time.
    ///
    /// Does nothing while paused. Reaching the end pauses the element and
    /// queues [`MediaEvent::Ended`].
    pub fn tick(&self, seconds: f64) {
        let mut sim = self.sim.borrow_mut();
        if sim.paused {
            return;
        }
        let step = seconds * sim.rate;
        sim.current += step;
        sim.events.push_back(MediaEvent::TimeUpdate);
        if sim.duration.is_finite() && sim.current >= sim.duration {
            sim.current = sim.duration;
            sim.paused = true;
            sim.events.push_back(MediaEvent::Ended);
        }
    }

    /// Drain the queued notifications.
    pub fn take_events(&self) -> Vec<MediaEvent> {
        self.sim.borrow_mut().events.drain(..).collect()
    }

    /// Number of queued notifications.
    pub fn pending_events(&self) -> usize {
        self.sim.borrow().events.len()
    }

    /// The loaded source.
    pub fn source(&self) -> String {
        self.sim.borrow().src.clone()
    }
}

impl NativeMedia for SimulatedMedia {
    fn play(&mut self) {
        let mut sim = self.sim.borrow_mut();
        if sim.paused {
            sim.paused = false;
            sim.events.push_back(MediaEvent::Play);
        }
    }

    fn pause(&mut self) {
        let mut sim = self.sim.borrow_mut();
        if !sim.paused {
            sim.paused = true;
            sim.events.push_back(MediaEvent::Pause);
        }
    }

    fn is_paused(&self) -> bool {
        self.sim.borrow().paused
    }

    fn current_time(&self) -> f64 {
        self.sim.borrow().current
    }

    fn set_current_time(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        let mut sim = self.sim.borrow_mut();
        let upper = if sim.duration.is_finite() {
            sim.duration.max(0.0)
        } else {
            f64::INFINITY
        };
        sim.current = seconds.clamp(0.0, upper);
        sim.events.push_back(MediaEvent::TimeUpdate);
    }

    fn duration(&self) -> f64 {
        self.sim.borrow().duration
    }

    fn volume(&self) -> f64 {
        self.sim.borrow().volume
    }

    fn set_volume(&mut self, volume: f64) {
        if volume.is_finite() {
            self.sim.borrow_mut().volume = volume.clamp(0.0, 1.0);
        }
    }

    fn playback_rate(&self) -> f64 {
        self.sim.borrow().rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.sim.borrow_mut().rate = rate;
    }

    fn intrinsic_size(&self) -> Size {
        self.sim.borrow().size
    }

    fn set_source(&mut self, src: &str) {
        let mut sim = self.sim.borrow_mut();
        if !sim.paused {
            sim.paused = true;
            sim.events.push_back(MediaEvent::Pause);
        }
        sim.src = String::from(src);
        sim.current = 0.0;
        sim.duration = f64::NAN;
        sim.size = Size::ZERO;
        if sim.autoplay {
            sim.paused = false;
            sim.events.push_back(MediaEvent::Play);
        }
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        self.sim.borrow_mut().events.pop_front()
    }
}
