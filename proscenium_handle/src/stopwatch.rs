// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A ref-backed stopwatch ticking on a document interval.

use alloc::rc::Rc;

use proscenium_dom::{Document, TimerId};

use crate::MutRef;

/// Elapsed-time bookkeeping that never causes a render.
///
/// All fields are [`MutRef`]s: the interval callback and the owning widget
/// read and write the same slots. While running, a document interval refreshes
/// the elapsed time every `tick_ms`; pausing clears that interval, so a paused
/// or reset stopwatch holds no timer. Once every clone is dropped, the next
/// tick clears the interval instead.
///
/// ```
/// use proscenium_dom::Document;
/// use proscenium_handle::Stopwatch;
///
/// let mut doc = Document::new();
/// let watch = Stopwatch::new(10);
/// assert!(watch.start(&mut doc));
/// assert!(!watch.start(&mut doc));
/// doc.advance(50);
/// watch.pause(&mut doc);
/// assert_eq!(watch.elapsed_ms(), 50);
/// assert_eq!(doc.interval_count(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Stopwatch {
    interval: MutRef<Option<TimerId>>,
    started_at: MutRef<Option<u64>>,
    elapsed: MutRef<u64>,
    tick_ms: u64,
    /// The interval holds this weakly to notice the stopwatch was dropped.
    alive: Rc<()>,
}

impl Stopwatch {
    /// A stopped stopwatch refreshing every `tick_ms` while running.
    pub fn new(tick_ms: u64) -> Self {
        Self {
            interval: MutRef::new(None),
            started_at: MutRef::new(None),
            elapsed: MutRef::new(0),
            tick_ms,
            alive: Rc::new(()),
        }
    }

    /// Start or resume. Returns `false` if already running.
    pub fn start(&self, doc: &mut Document) -> bool {
        if self.is_running() {
            return false;
        }
        let origin = doc.now_ms().saturating_sub(self.elapsed.get());
        self.started_at.set(Some(origin));

        let elapsed = self.elapsed.clone();
        let interval = self.interval.clone();
        let owner = Rc::downgrade(&self.alive);
        let id = doc.set_interval(
            self.tick_ms,
            Rc::new(move |doc: &mut Document| {
                if owner.strong_count() == 0 {
                    if let Some(id) = interval.take() {
                        doc.clear_interval(id);
                    }
                    return;
                }
                elapsed.set(doc.now_ms().saturating_sub(origin));
            }),
        );
        self.interval.set(Some(id));
        true
    }

    /// Stop ticking and keep the elapsed time. Returns `false` if not running.
    pub fn pause(&self, doc: &mut Document) -> bool {
        let Some(id) = self.interval.take() else {
            return false;
        };
        doc.clear_interval(id);
        if let Some(origin) = self.started_at.get() {
            self.elapsed.set(doc.now_ms().saturating_sub(origin));
        }
        true
    }

    /// Stop and zero the elapsed time.
    pub fn reset(&self, doc: &mut Document) {
        self.pause(doc);
        self.elapsed.set(0);
        self.started_at.set(None);
    }

    /// Elapsed milliseconds as of the last tick (or pause).
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.get()
    }

    /// Whether an interval is registered.
    pub fn is_running(&self) -> bool {
        self.interval.with(Option::is_some)
    }
}
