// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Propagation sequences and the dispatcher that walks them.
//!
//! An event aimed at an element travels capture → target → bubble along the
//! root→target path. [`propagation_path`] builds that sequence and [`run`]
//! walks it, honoring [`Outcome::Stop`].
//!
//! ```
//! use proscenium_dom::dispatch::{self, Dispatch, Outcome, Phase};
//! # #[derive(Copy, Clone, Debug, PartialEq)] struct Node(u32);
//!
//! let seq = vec![
//!     Dispatch::new(Phase::Capture, Node(1), Node(2)),
//!     Dispatch::new(Phase::Target, Node(2), Node(2)),
//!     Dispatch::new(Phase::Bubble, Node(1), Node(2)),
//! ];
//!
//! let mut seen = Vec::new();
//! let stopped = dispatch::run(&seq, &mut seen, |d, seen| {
//!     seen.push(d.phase);
//!     if d.is_target() { Outcome::Stop } else { Outcome::Continue }
//! });
//!
//! assert_eq!(stopped.map(|d| d.node), Some(Node(2)));
//! assert_eq!(seen, vec![Phase::Capture, Phase::Target]);
//! ```

use alloc::vec::Vec;

/// Propagation phase of a single dispatch step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root → target, before the target sees the event.
    Capture,
    /// The event's own target.
    Target,
    /// Target → root, after the target saw the event.
    Bubble,
}

/// Whether propagation continues after a handler ran.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Keep going.
    Continue,
    /// Abort propagation; later steps (and global listeners) are skipped.
    Stop,
}

/// One step in a propagation sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Phase of this step.
    pub phase: Phase,
    /// The element whose listeners run in this step (the "current target").
    pub node: K,
    /// The element the event was aimed at.
    pub target: K,
}

impl<K: Copy + PartialEq> Dispatch<K> {
    /// Create a step.
    pub fn new(phase: Phase, node: K, target: K) -> Self {
        Self {
            phase,
            node,
            target,
        }
    }

    /// True when the current node is the event's own target rather than an
    /// ancestor seeing a propagated event.
    pub fn is_target(&self) -> bool {
        self.phase == Phase::Target
    }
}

/// Build the capture → target → bubble sequence for a root→target `path`.
///
/// Capture visits every ancestor, the target appears once in the target phase,
/// and bubble revisits the ancestors inner→outer. When `bubbles` is false only
/// the capture and target steps are produced.
pub fn propagation_path<K: Copy + PartialEq>(path: &[K], bubbles: bool) -> Vec<Dispatch<K>> {
    let Some((&target, ancestors)) = path.split_last() else {
        return Vec::new();
    };
    let mut seq = Vec::with_capacity(ancestors.len() * 2 + 1);
    seq.extend(
        ancestors
            .iter()
            .map(|&n| Dispatch::new(Phase::Capture, n, target)),
    );
    seq.push(Dispatch::new(Phase::Target, target, target));
    if bubbles {
        seq.extend(
            ancestors
                .iter()
                .rev()
                .map(|&n| Dispatch::new(Phase::Bubble, n, target)),
        );
    }
    seq
}

/// Run a handler over a dispatch sequence and honor stop outcomes.
///
/// Returns `None` when the whole sequence was visited, or the step at which a
/// handler returned [`Outcome::Stop`].
pub fn run<'a, K, E>(
    seq: &'a [Dispatch<K>],
    state: &mut E,
    mut handler: impl FnMut(&Dispatch<K>, &mut E) -> Outcome,
) -> Option<&'a Dispatch<K>> {
    for d in seq {
        match handler(d, state) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(d),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn path_orders_capture_target_bubble() {
        let seq = propagation_path(&[1_u32, 2, 3], true);
        let steps: Vec<(Phase, u32)> = seq.iter().map(|d| (d.phase, d.node)).collect();
        assert_eq!(
            steps,
            vec![
                (Phase::Capture, 1),
                (Phase::Capture, 2),
                (Phase::Target, 3),
                (Phase::Bubble, 2),
                (Phase::Bubble, 1),
            ]
        );
        assert!(seq.iter().all(|d| d.target == 3));
    }

    #[test]
    fn non_bubbling_path_ends_at_target() {
        let seq = propagation_path(&[1_u32, 2], false);
        assert_eq!(seq.len(), 2);
        assert!(seq[1].is_target());
    }

    #[test]
    fn empty_path_yields_nothing() {
        assert!(propagation_path::<u32>(&[], true).is_empty());
    }

    #[test]
    fn stop_in_capture_skips_target() {
        let seq = propagation_path(&[1_u32, 2], true);
        let mut seen = Vec::new();
        let stopped = run(&seq, &mut seen, |d, seen| {
            seen.push((d.phase, d.node));
            Outcome::Stop
        });
        assert_eq!(stopped.map(|d| d.phase), Some(Phase::Capture));
        assert_eq!(seen, vec![(Phase::Capture, 1)]);
    }

    #[test]
    fn continue_visits_everything() {
        let seq = propagation_path(&[1_u32, 2], true);
        let mut count = 0;
        let stopped = run(&seq, &mut count, |_, count| {
            *count += 1;
            Outcome::Continue
        });
        assert!(stopped.is_none());
        assert_eq!(count, 3);
    }
}
