// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Saving and restoring focus around overlays.

use proscenium_dom::{Document, ElementId, FocusError};

/// The element that had focus before an overlay took it.
///
/// Captured when a modal opens and consumed when it closes. Restoring is a
/// no-op when the element has since been removed, detached, or made
/// unfocusable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusMemento {
    previously_focused: Option<ElementId>,
}

impl FocusMemento {
    /// Remember the document's current focus.
    pub fn capture(doc: &Document) -> Self {
        Self {
            previously_focused: doc.active_element(),
        }
    }

    /// The remembered element.
    pub fn previously_focused(&self) -> Option<ElementId> {
        self.previously_focused
    }

    /// Give focus back. `Ok(false)` when nothing was focused at capture time.
    pub fn try_restore(self, doc: &mut Document) -> Result<bool, FocusError> {
        let Some(id) = self.previously_focused else {
            return Ok(false);
        };
        doc.try_focus(id)?;
        Ok(true)
    }

    /// Give focus back if the remembered element can still take it.
    pub fn restore(self, doc: &mut Document) -> bool {
        match self.try_restore(doc) {
            Ok(restored) => restored,
            Err(err) => {
                tracing::debug!(%err, "focus restore skipped");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restores_attached_element() {
        let mut doc = Document::new();
        let root = doc.root();
        let button = doc.create_element("button");
        doc.append_child(root, button);
        doc.set_tab_index(button, Some(0));
        doc.focus(button);

        let memento = FocusMemento::capture(&doc);
        doc.blur();
        assert!(memento.restore(&mut doc));
        assert_eq!(doc.active_element(), Some(button));
    }

    #[test]
    fn detached_element_is_left_alone() {
        let mut doc = Document::new();
        let root = doc.root();
        let button = doc.create_element("button");
        doc.append_child(root, button);
        doc.set_tab_index(button, Some(0));
        doc.focus(button);

        let memento = FocusMemento::capture(&doc);
        doc.detach(button);
        assert_eq!(
            memento.try_restore(&mut doc),
            Err(FocusError::Detached(button))
        );
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn nothing_focused_restores_nothing() {
        let mut doc = Document::new();
        let memento = FocusMemento::capture(&doc);
        assert_eq!(memento.previously_focused(), None);
        assert_eq!(memento.try_restore(&mut doc), Ok(false));
    }
}
