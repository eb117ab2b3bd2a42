// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render state with batched updates.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

type Update<T> = Box<dyn FnOnce(&mut T)>;

struct Shared<T> {
    committed: T,
    pending: Vec<Update<T>>,
}

/// State whose changes must produce new visible output.
///
/// Writes go through a [`Setter`] and are queued; [`State::flush`] applies
/// everything queued since the last flush in order and reports whether the
/// committed value changed. Widgets flush once per render, so several
/// updates made by one handler are observed together or not at all.
///
/// ```
/// use proscenium_handle::State;
///
/// let state = State::new(0_u32);
/// let set = state.setter();
/// set.set(5);
/// set.update(|v| *v += 1);
///
/// // Nothing is visible until the flush.
/// assert_eq!(state.get(), 0);
/// assert!(state.flush());
/// assert_eq!(state.get(), 6);
/// assert!(!state.flush());
/// ```
pub struct State<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

/// Queues updates for a [`State`].
///
/// Setters hold the state weakly: once the owning widget is gone, writes are
/// dropped silently.
pub struct Setter<T> {
    shared: Weak<RefCell<Shared<T>>>,
}

impl<T: Clone + PartialEq + 'static> State<T> {
    /// Create state with its initial committed value.
    pub fn new(initial: T) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                committed: initial,
                pending: Vec::new(),
            })),
        }
    }

    /// The committed value, as last rendered.
    pub fn get(&self) -> T {
        self.shared.borrow().committed.clone()
    }

    /// Read the committed value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.borrow().committed)
    }

    /// A setter sharing this state.
    pub fn setter(&self) -> Setter<T> {
        Setter {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Whether updates are queued.
    pub fn has_pending(&self) -> bool {
        !self.shared.borrow().pending.is_empty()
    }

    /// Apply queued updates in order. Returns `true` if the committed value changed.
    ///
    /// Updates queued while this flush runs wait for the next one.
    pub fn flush(&self) -> bool {
        let (pending, mut next) = {
            let mut shared = self.shared.borrow_mut();
            if shared.pending.is_empty() {
                return false;
            }
            (
                core::mem::take(&mut shared.pending),
                shared.committed.clone(),
            )
        };
        for update in pending {
            update(&mut next);
        }
        let mut shared = self.shared.borrow_mut();
        if next == shared.committed {
            return false;
        }
        shared.committed = next;
        true
    }
}

impl<T: 'static> Setter<T> {
    /// Queue a replacement value.
    pub fn set(&self, value: T) {
        self.update(move |v| *v = value);
    }

    /// Queue an update computed from the value at flush time.
    pub fn update(&self, f: impl FnOnce(&mut T) + 'static) {
        match self.shared.upgrade() {
            Some(shared) => shared.borrow_mut().pending.push(Box::new(f)),
            None => tracing::trace!("state update after owner dropped ignored"),
        }
    }

    /// Whether the owning state still exists.
    pub fn is_live(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for State<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("State")
            .field("committed", &shared.committed)
            .field("pending", &shared.pending.len())
            .finish()
    }
}

impl<T> core::fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Setter")
            .field("live", &(self.shared.strong_count() > 0))
            .finish()
    }
}
