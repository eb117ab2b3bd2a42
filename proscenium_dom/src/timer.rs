// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interval bookkeeping driven by the document's virtual clock.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::document::Document;
use crate::types::TimerId;

/// Callback run each time an interval elapses.
pub type TimerCallback = Rc<dyn Fn(&mut Document)>;

struct Interval {
    id: TimerId,
    period_ms: u64,
    next_due: u64,
    callback: TimerCallback,
}

#[derive(Default)]
pub(crate) struct Timers {
    intervals: Vec<Interval>,
    next_id: u64,
}

impl core::fmt::Debug for Timers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Timers")
            .field("intervals", &self.intervals.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl Timers {
    pub(crate) fn insert(&mut self, now: u64, period_ms: u64, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // A zero period would never let the clock move forward.
        let period_ms = period_ms.max(1);
        self.intervals.push(Interval {
            id,
            period_ms,
            next_due: now.saturating_add(period_ms),
            callback,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: TimerId) -> bool {
        let before = self.intervals.len();
        self.intervals.retain(|i| i.id != id);
        before != self.intervals.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.intervals.len()
    }

    pub(crate) fn contains(&self, id: TimerId) -> bool {
        self.intervals.iter().any(|i| i.id == id)
    }

    /// Pop the earliest interval due at or before `until` and schedule its
    /// next run. Ties fire in registration order.
    pub(crate) fn take_due(&mut self, until: u64) -> Option<(u64, TimerCallback)> {
        let next = self
            .intervals
            .iter_mut()
            .filter(|i| i.next_due <= until)
            .min_by_key(|i| (i.next_due, i.id))?;
        let due = next.next_due;
        next.next_due = due.saturating_add(next.period_ms);
        Some((due, next.callback.clone()))
    }
}
