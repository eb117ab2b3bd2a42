// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proscenium Handle: the state plumbing behind imperative widget APIs.
//!
//! A widget keeps two very different kinds of data:
//!
//! - **Render state** ([`State`]): values that must show up on screen. Writes
//!   are queued through a [`Setter`] and applied together when the widget
//!   flushes before rendering.
//! - **Mutable refs** ([`MutRef`]): values that persist across renders but must
//!   not cause them, such as native element handles or timer ids.
//!
//! A parent that needs to command a child directly holds a [`HandleCell`].
//! The child fills it with a curated API object built from its refs and
//! setters, rebuilding only when the declared [`Deps`] change. Calls made
//! while the cell is empty degrade to no-ops.
//!
//! [`Stopwatch`] combines the two: elapsed-time bookkeeping in refs, ticking on
//! a document interval that is cleared whenever the stopwatch stops.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod handle;
mod mut_ref;
mod state;
mod stopwatch;

pub use handle::{Deps, HandleCell, HandleError};
pub use mut_ref::MutRef;
pub use state::{Setter, State};
pub use stopwatch::Stopwatch;
