// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Imperative handles: a child's curated command surface, held by its parent.

use alloc::rc::Rc;
use core::cell::RefCell;

use thiserror::Error;

/// Calling through a handle failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum HandleError {
    /// The child has not mounted yet, or has already unmounted.
    #[error("imperative handle is not attached to a mounted widget")]
    NotReady,
}

struct Slot<H> {
    handle: Option<Rc<H>>,
    generation: u64,
}

/// A stable cell through which a parent reaches a child's imperative API.
///
/// The parent creates the cell and passes a clone to the child at mount. On
/// each render the child calls [`HandleCell::expose`]; the handle object is
/// rebuilt only when the declared dependencies changed, and each rebuild bumps
/// [`HandleCell::generation`]. Parents must not assume the handle object is the
/// same across renders unless the generation is unchanged.
///
/// Calls made before mount or after unmount are silent no-ops: parents
/// routinely race their children's mount.
///
/// ```
/// use proscenium_handle::{Deps, HandleCell};
///
/// struct Counter { start: u32 }
/// impl Counter { fn start(&self) -> u32 { self.start } }
///
/// let cell: HandleCell<Counter> = HandleCell::new();
/// assert_eq!(cell.with(|c| c.start()), None);
///
/// // Child side.
/// let mut deps = Deps::new();
/// assert!(cell.expose(&mut deps, 4_u32, || Counter { start: 4 }));
/// assert!(!cell.expose(&mut deps, 4_u32, || Counter { start: 4 }));
///
/// // Parent side.
/// assert_eq!(cell.with(|c| c.start()), Some(4));
/// assert_eq!(cell.generation(), 1);
/// ```
pub struct HandleCell<H> {
    slot: Rc<RefCell<Slot<H>>>,
}

/// The dependency values a handle was last built from.
#[derive(Clone, Debug)]
pub struct Deps<D> {
    last: Option<D>,
}

impl<D> Default for Deps<D> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<D: PartialEq> Deps<D> {
    /// No build has happened yet.
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Record `next`, returning whether it differs from the recorded value.
    pub fn changed(&mut self, next: D) -> bool {
        if self.last.as_ref() == Some(&next) {
            return false;
        }
        self.last = Some(next);
        true
    }

    /// Forget the recorded value so the next check reports a change.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// The recorded value.
    pub fn last(&self) -> Option<&D> {
        self.last.as_ref()
    }
}

impl<H> HandleCell<H> {
    /// An empty cell.
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot {
                handle: None,
                generation: 0,
            })),
        }
    }

    /// Rebuild the handle with `build` when `next` differs from the deps it
    /// was last built with, or when the cell is empty. Returns whether a
    /// rebuild happened.
    pub fn expose<D: PartialEq>(
        &self,
        deps: &mut Deps<D>,
        next: D,
        build: impl FnOnce() -> H,
    ) -> bool {
        let changed = deps.changed(next);
        if !changed && self.is_ready() {
            return false;
        }
        self.set(build());
        true
    }

    /// Install a handle unconditionally.
    pub fn set(&self, handle: H) {
        let mut slot = self.slot.borrow_mut();
        slot.handle = Some(Rc::new(handle));
        slot.generation += 1;
    }

    /// Empty the cell, returning the handle it held. Called on unmount.
    pub fn clear(&self) -> Option<Rc<H>> {
        self.slot.borrow_mut().handle.take()
    }

    /// Whether a mounted child has populated the cell.
    pub fn is_ready(&self) -> bool {
        self.slot.borrow().handle.is_some()
    }

    /// Number of handle objects installed so far.
    pub fn generation(&self) -> u64 {
        self.slot.borrow().generation
    }

    /// The current handle object.
    pub fn get(&self) -> Option<Rc<H>> {
        self.slot.borrow().handle.clone()
    }

    /// Call into the handle, or report [`HandleError::NotReady`].
    ///
    /// The cell is not borrowed while `f` runs, so a handle method may cause
    /// its widget to re-expose.
    pub fn try_with<R>(&self, f: impl FnOnce(&H) -> R) -> Result<R, HandleError> {
        let handle = self.get().ok_or(HandleError::NotReady)?;
        Ok(f(&handle))
    }

    /// Call into the handle; `None` when nothing is mounted.
    pub fn with<R>(&self, f: impl FnOnce(&H) -> R) -> Option<R> {
        match self.try_with(f) {
            Ok(r) => Some(r),
            Err(err) => {
                tracing::trace!(%err, "handle call ignored");
                None
            }
        }
    }

    /// Call into the handle; `R::default()` when nothing is mounted.
    pub fn call_or_default<R: Default>(&self, f: impl FnOnce(&H) -> R) -> R {
        self.with(f).unwrap_or_default()
    }
}

impl<H> Default for HandleCell<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for HandleCell<H> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<H> core::fmt::Debug for HandleCell<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("HandleCell")
            .field("ready", &slot.handle.is_some())
            .field("generation", &slot.generation)
            .finish()
    }
}
