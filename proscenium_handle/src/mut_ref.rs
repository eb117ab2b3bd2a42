// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mutable slots that persist across renders without causing them.

use alloc::rc::Rc;
use core::cell::RefCell;

/// A shared, mutable slot owned by one widget instance.
///
/// Cloning a `MutRef` shares the slot, which is how handle methods and
/// listeners see the widget's *current* value at call time instead of a copy
/// taken when they were built. Writing to it never schedules a render; values
/// that must show up on screen belong in [`State`](crate::State).
///
/// Borrows are short and scoped to the closure passed to [`MutRef::with`] /
/// [`MutRef::with_mut`]; do not call back into the same slot from inside them.
pub struct MutRef<T> {
    cell: Rc<RefCell<T>>,
}

impl<T> MutRef<T> {
    /// Create a slot holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(RefCell::new(value)),
        }
    }

    /// Overwrite the value.
    pub fn set(&self, value: T) {
        *self.cell.borrow_mut() = value;
    }

    /// Overwrite the value, returning the previous one.
    pub fn replace(&self, value: T) -> T {
        self.cell.replace(value)
    }

    /// Read through a shared borrow.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.borrow())
    }

    /// Mutate through an exclusive borrow.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.cell.borrow_mut())
    }

    /// Whether two refs share the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Clone> MutRef<T> {
    /// A copy of the current value.
    pub fn get(&self) -> T {
        self.cell.borrow().clone()
    }
}

impl<T: Default> MutRef<T> {
    /// Take the value, leaving the default in its place.
    pub fn take(&self) -> T {
        self.cell.take()
    }
}

impl<T> Clone for MutRef<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Default> Default for MutRef<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for MutRef<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.cell.try_borrow() {
            Ok(v) => f.debug_tuple("MutRef").field(&*v).finish(),
            Err(_) => f.write_str("MutRef(<borrowed>)"),
        }
    }
}
