// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for focus and geometry queries.
//!
//! Widgets treat all of these as reasons to skip an update rather than as
//! failures: a stale focus target or an unmeasurable element is an expected
//! race with the host, not a programming mistake.

use thiserror::Error;

use crate::types::ElementId;

/// Why focus could not move to an element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum FocusError {
    /// The element was removed from the document.
    #[error("element {0:?} no longer exists")]
    Stale(ElementId),
    /// The element exists but is not attached under the document root.
    #[error("element {0:?} is not attached to the document")]
    Detached(ElementId),
    /// The element does not accept focus.
    #[error("element {0:?} is not focusable")]
    NotFocusable(ElementId),
}

/// Why an element's bounding box is unusable for positioning math.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum MeasureError {
    /// The element was removed from the document.
    #[error("element {0:?} no longer exists")]
    Stale(ElementId),
    /// The element is not attached, so it has no layout box.
    #[error("element {0:?} is not attached to the document")]
    Detached(ElementId),
    /// The box has zero width or height.
    #[error("element {0:?} has an empty bounding box")]
    Degenerate(ElementId),
    /// The box has a NaN or infinite coordinate.
    #[error("element {0:?} has a non-finite bounding box")]
    NonFinite(ElementId),
}
