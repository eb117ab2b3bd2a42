// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared overlay surface and the portals mounted into it.

use proscenium_dom::{Document, ElementId, MeasureError};
use thiserror::Error;

/// Anchor id of the overlay surface element.
pub const OVERLAY_ANCHOR_ID: &str = "overlay-root";

/// Why overlay content could not be mounted or placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// No live element carries the overlay anchor id.
    #[error("no overlay surface with id `{OVERLAY_ANCHOR_ID}` in the document")]
    SurfaceMissing,
    /// The surface element exists but is not attached under the root.
    #[error("overlay surface {0:?} is not attached to the document")]
    SurfaceDetached(ElementId),
    /// The content element was removed before it could be mounted.
    #[error("overlay content {0:?} no longer exists")]
    StaleContent(ElementId),
    /// The element the overlay is positioned against has no usable box.
    #[error(transparent)]
    Measure(#[from] MeasureError),
}

/// The single attachment point shared by every overlay widget.
///
/// Install it once, before the first overlay renders. It is a direct child of
/// the document root, so content mounted into it escapes whatever box its
/// logical owner was laid out in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverlaySurface {
    element: ElementId,
}

impl OverlaySurface {
    /// Create the surface, or return the one already installed.
    pub fn install(doc: &mut Document) -> Self {
        if let Ok(existing) = Self::find(doc) {
            return existing;
        }
        let element = doc.create_element("div");
        doc.set_attribute(element, "id", OVERLAY_ANCHOR_ID);
        let root = doc.root();
        doc.append_child(root, element);
        tracing::debug!(element = ?element, "overlay surface installed");
        Self { element }
    }

    /// Locate the installed surface.
    pub fn find(doc: &Document) -> Result<Self, OverlayError> {
        let element = doc
            .element_by_id(OVERLAY_ANCHOR_ID)
            .ok_or(OverlayError::SurfaceMissing)?;
        if !doc.is_attached(element) {
            return Err(OverlayError::SurfaceDetached(element));
        }
        Ok(Self { element })
    }

    /// The surface element.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Mount `content` at the end of the surface.
    pub fn mount(&self, doc: &mut Document, content: ElementId) -> Result<Portal, OverlayError> {
        if !doc.is_attached(self.element) {
            return Err(OverlayError::SurfaceDetached(self.element));
        }
        if !doc.append_child(self.element, content) {
            return Err(OverlayError::StaleContent(content));
        }
        Ok(Portal {
            surface: *self,
            content,
        })
    }

    /// Number of overlay entries currently mounted.
    pub fn mounted_count(&self, doc: &Document) -> usize {
        doc.children_of(self.element).len()
    }
}

/// One widget's content on the overlay surface.
///
/// Exists only while that content is visible; [`Portal::unmount`] consumes it
/// and removes exactly the element it mounted.
#[derive(Debug, PartialEq, Eq)]
pub struct Portal {
    surface: OverlaySurface,
    content: ElementId,
}

impl Portal {
    /// The mounted content element.
    pub fn content(&self) -> ElementId {
        self.content
    }

    /// The surface this portal lives on.
    pub fn surface(&self) -> OverlaySurface {
        self.surface
    }

    /// Remove the content. Returns `false` if it had already left the surface,
    /// in which case nothing else on the surface is touched.
    pub fn unmount(self, doc: &mut Document) -> bool {
        if doc.parent_of(self.content) != Some(self.surface.element) {
            tracing::trace!(content = ?self.content, "portal content already gone");
            return false;
        }
        doc.remove(self.content)
    }
}
