// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modal dialog rendered into the overlay surface.

use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use proscenium_dom::dispatch::{Dispatch, Outcome};
use proscenium_dom::{Document, ElementId, Event, EventKind, Key, ListenerId};

use crate::focus::FocusMemento;
use crate::surface::{OverlayError, OverlaySurface, Portal};

static NEXT_TITLE: AtomicU32 = AtomicU32::new(0);

/// Called after the dialog dismissed itself.
pub type CloseCallback = Rc<dyn Fn(&mut Document)>;

/// Properties a dialog is created with.
#[derive(Clone, Default)]
pub struct DialogProps {
    /// Heading text; the content is labelled by it.
    pub title: String,
    /// Notified on Escape, backdrop press, or the close button.
    pub on_close: Option<CloseCallback>,
}

impl DialogProps {
    /// Props with a title and no close callback.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            on_close: None,
        }
    }

    /// Set the close callback.
    pub fn with_on_close(mut self, on_close: impl Fn(&mut Document) + 'static) -> Self {
        self.on_close = Some(Rc::new(on_close));
        self
    }
}

impl core::fmt::Debug for DialogProps {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DialogProps")
            .field("title", &self.title)
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

/// Elements of an open dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DialogParts {
    /// Full-surface backdrop; pressing it directly dismisses the dialog.
    pub backdrop: ElementId,
    /// The `role=dialog` container, focused while open.
    pub content: ElementId,
    /// Heading element referenced by `aria-labelledby`.
    pub title: ElementId,
    /// Button labelled "Close modal".
    pub close_button: ElementId,
    /// Where the owner places the dialog's body.
    pub body: ElementId,
}

enum DialogState {
    Closed,
    Open {
        escape: ListenerId,
        portal: Portal,
        parts: DialogParts,
        memento: FocusMemento,
    },
}

struct DialogInner {
    surface: OverlaySurface,
    props: DialogProps,
    title_id: String,
    state: DialogState,
}

/// A modal dialog.
///
/// Closed until the owner opens it. Opening captures a [`FocusMemento`],
/// mounts backdrop and content into the overlay surface, listens for Escape
/// at document level, and focuses the content. Every way out of the open
/// state (Escape, a press on the backdrop itself, the close button,
/// [`Dialog::close`], [`Dialog::unmount`]) removes that listener and the
/// portal and hands focus back.
///
/// Dropping an open dialog without [`Dialog::unmount`] leaves it on screen
/// only until the next key press or backdrop press, which tears it down
/// without notifying `on_close`.
///
/// ```
/// use proscenium_dom::{Document, Key};
/// use proscenium_overlay::{Dialog, DialogProps, OverlaySurface};
///
/// let mut doc = Document::new();
/// let surface = OverlaySurface::install(&mut doc);
/// let dialog = Dialog::new(surface, DialogProps::new("Video Settings"));
///
/// dialog.set_open(&mut doc, true);
/// let content = dialog.parts().unwrap().content;
/// assert_eq!(doc.active_element(), Some(content));
/// assert_eq!(doc.global_listener_count(), 1);
///
/// doc.key_down(Key::Escape);
/// assert!(!dialog.is_open());
/// assert_eq!(doc.global_listener_count(), 0);
/// assert_eq!(surface.mounted_count(&doc), 0);
/// ```
pub struct Dialog {
    inner: Rc<RefCell<DialogInner>>,
    /// Listeners hold this weakly to notice the dialog was dropped.
    alive: Rc<()>,
}

impl Dialog {
    /// A closed dialog rendering into `surface`.
    pub fn new(surface: OverlaySurface, props: DialogProps) -> Self {
        let n = NEXT_TITLE.fetch_add(1, Ordering::Relaxed);
        Self {
            inner: Rc::new(RefCell::new(DialogInner {
                surface,
                props,
                title_id: format!("dialog-title-{n}"),
                state: DialogState::Closed,
            })),
            alive: Rc::new(()),
        }
    }

    /// Mirror the owner's open flag. Returns whether the dialog changed state.
    pub fn set_open(&self, doc: &mut Document, open: bool) -> bool {
        if open { self.open(doc) } else { self.close(doc) }
    }

    /// Open the dialog. Returns `false` if it was already open or could not
    /// be mounted.
    pub fn open(&self, doc: &mut Document) -> bool {
        match self.try_open(doc) {
            Ok(opened) => opened,
            Err(err) => {
                tracing::debug!(%err, "dialog open failed");
                false
            }
        }
    }

    /// Open the dialog, reporting why the overlay could not be mounted.
    pub fn try_open(&self, doc: &mut Document) -> Result<bool, OverlayError> {
        if self.is_open() {
            return Ok(false);
        }
        let memento = FocusMemento::capture(doc);
        let (surface, title, title_id) = {
            let inner = self.inner.borrow();
            (inner.surface, inner.props.title.clone(), inner.title_id.clone())
        };

        let parts = build_parts(doc, &title, &title_id);
        let portal = match surface.mount(doc, parts.backdrop) {
            Ok(portal) => portal,
            Err(err) => {
                doc.remove(parts.backdrop);
                return Err(err);
            }
        };

        let owner = Rc::downgrade(&self.alive);
        let (on_backdrop, backdrop_owner) = (self.inner.clone(), owner.clone());
        doc.add_listener(
            parts.backdrop,
            EventKind::PointerDown,
            Rc::new(move |doc: &mut Document, d: &Dispatch<ElementId>, _: &Event| {
                // Presses inside the content bubble through here too.
                if d.is_target() {
                    dismiss(&on_backdrop, &backdrop_owner, doc, "backdrop");
                }
                Outcome::Continue
            }),
        );
        let (on_button, button_owner) = (self.inner.clone(), owner.clone());
        doc.add_listener(
            parts.close_button,
            EventKind::Click,
            Rc::new(move |doc: &mut Document, _: &Dispatch<ElementId>, _: &Event| {
                dismiss(&on_button, &button_owner, doc, "close button");
                Outcome::Stop
            }),
        );
        let on_escape = self.inner.clone();
        let escape = doc.add_global_listener(
            EventKind::KeyDown,
            Rc::new(move |doc: &mut Document, ev: &Event| {
                if ev.key() == Some(Key::Escape) || owner.strong_count() == 0 {
                    dismiss(&on_escape, &owner, doc, "escape");
                }
            }),
        );

        self.inner.borrow_mut().state = DialogState::Open {
            escape,
            portal,
            parts,
            memento,
        };
        doc.focus(parts.content);
        tracing::debug!(content = ?parts.content, title = %title, "dialog opened");
        Ok(true)
    }

    /// Close the dialog without notifying `on_close`. Returns `false` if it
    /// was not open.
    pub fn close(&self, doc: &mut Document) -> bool {
        let closed = close_inner(&self.inner, doc);
        if closed {
            tracing::debug!("dialog closed");
        }
        closed
    }

    /// Tear the dialog down with its owner.
    pub fn unmount(&self, doc: &mut Document) {
        if close_inner(&self.inner, doc) {
            tracing::debug!("dialog unmounted while open");
        }
    }

    /// Whether the dialog is open.
    pub fn is_open(&self) -> bool {
        matches!(self.inner.borrow().state, DialogState::Open { .. })
    }

    /// The open dialog's elements.
    pub fn parts(&self) -> Option<DialogParts> {
        match &self.inner.borrow().state {
            DialogState::Open { parts, .. } => Some(*parts),
            DialogState::Closed => None,
        }
    }

    /// The body container, while open.
    pub fn body(&self) -> Option<ElementId> {
        self.parts().map(|p| p.body)
    }

    /// The `id` the content's `aria-labelledby` points at.
    pub fn title_id(&self) -> String {
        self.inner.borrow().title_id.clone()
    }

    /// Change the heading, updating an open dialog in place.
    pub fn set_title(&self, doc: &mut Document, title: impl Into<String>) {
        let title = title.into();
        if let Some(parts) = self.parts() {
            doc.set_text(parts.title, title.clone());
        }
        self.inner.borrow_mut().props.title = title;
    }
}

impl core::fmt::Debug for Dialog {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Dialog")
            .field("props", &inner.props)
            .field("parts", &self.parts())
            .finish_non_exhaustive()
    }
}

fn build_parts(doc: &mut Document, title: &str, title_id: &str) -> DialogParts {
    let backdrop = doc.create_element("div");
    doc.set_attribute(backdrop, "class", "modal-backdrop");

    let content = doc.create_element("div");
    doc.set_attribute(content, "class", "modal-content");
    doc.set_attribute(content, "role", "dialog");
    doc.set_attribute(content, "aria-modal", "true");
    doc.set_attribute(content, "aria-labelledby", title_id);
    doc.set_tab_index(content, Some(-1));

    let header = doc.create_element("div");
    doc.set_attribute(header, "class", "modal-header");

    let heading = doc.create_element("h2");
    doc.set_attribute(heading, "id", title_id);
    doc.set_text(heading, title);

    let close_button = doc.create_element("button");
    doc.set_attribute(close_button, "class", "modal-close-btn");
    doc.set_attribute(close_button, "aria-label", "Close modal");
    doc.set_text(close_button, "\u{00d7}");
    doc.set_tab_index(close_button, Some(0));

    let body = doc.create_element("div");
    doc.set_attribute(body, "class", "modal-body");

    doc.append_child(header, heading);
    doc.append_child(header, close_button);
    doc.append_child(content, header);
    doc.append_child(content, body);
    doc.append_child(backdrop, content);

    DialogParts {
        backdrop,
        content,
        title: heading,
        close_button,
        body,
    }
}

fn close_inner(inner: &RefCell<DialogInner>, doc: &mut Document) -> bool {
    let state = core::mem::replace(&mut inner.borrow_mut().state, DialogState::Closed);
    let DialogState::Open {
        escape,
        portal,
        memento,
        ..
    } = state
    else {
        return false;
    };
    doc.remove_listener(escape);
    portal.unmount(doc);
    memento.restore(doc);
    true
}

fn dismiss(
    inner: &RefCell<DialogInner>,
    owner: &Weak<()>,
    doc: &mut Document,
    cause: &'static str,
) {
    if owner.strong_count() == 0 {
        if close_inner(inner, doc) {
            tracing::debug!(cause, "dropped dialog torn down");
        }
        return;
    }
    if !close_inner(inner, doc) {
        return;
    }
    tracing::debug!(cause, "dialog dismissed");
    let on_close = inner.borrow().props.on_close.clone();
    if let Some(on_close) = on_close {
        on_close(doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use kurbo::Point;

    struct Fixture {
        doc: Document,
        surface: OverlaySurface,
        opener: ElementId,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let surface = OverlaySurface::install(&mut doc);
        let root = doc.root();
        let opener = doc.create_element("button");
        doc.append_child(root, opener);
        doc.set_tab_index(opener, Some(0));
        doc.focus(opener);
        Fixture {
            doc,
            surface,
            opener,
        }
    }

    fn counting_dialog(surface: OverlaySurface) -> (Dialog, Rc<Cell<u32>>) {
        let closes = Rc::new(Cell::new(0));
        let seen = closes.clone();
        let dialog = Dialog::new(
            surface,
            DialogProps::new("Video Settings").with_on_close(move |_| seen.set(seen.get() + 1)),
        );
        (dialog, closes)
    }

    #[test]
    fn open_builds_accessible_content_and_takes_focus() {
        let Fixture {
            mut doc, surface, ..
        } = fixture();
        let dialog = Dialog::new(surface, DialogProps::new("Video Settings"));
        assert!(dialog.set_open(&mut doc, true));
        assert!(!dialog.set_open(&mut doc, true));

        let parts = dialog.parts().unwrap();
        assert_eq!(doc.parent_of(parts.backdrop), Some(surface.element()));
        assert_eq!(doc.attribute(parts.content, "role"), Some("dialog"));
        assert_eq!(doc.attribute(parts.content, "aria-modal"), Some("true"));
        assert_eq!(doc.attribute(parts.content, "tabindex"), Some("-1"));
        let title_id = dialog.title_id();
        assert_eq!(
            doc.attribute(parts.content, "aria-labelledby"),
            Some(title_id.as_str())
        );
        assert_eq!(doc.element_by_id(&title_id), Some(parts.title));
        assert_eq!(doc.text(parts.title), "Video Settings");
        assert_eq!(
            doc.attribute(parts.close_button, "aria-label"),
            Some("Close modal")
        );
        assert_eq!(doc.active_element(), Some(parts.content));
        assert_eq!(doc.global_listener_count(), 1);
    }

    #[test]
    fn escape_closes_restores_focus_and_notifies() {
        let Fixture {
            mut doc,
            surface,
            opener,
        } = fixture();
        let (dialog, closes) = counting_dialog(surface);
        dialog.set_open(&mut doc, true);

        doc.key_down(Key::Escape);
        assert!(!dialog.is_open());
        assert_eq!(closes.get(), 1);
        assert_eq!(doc.active_element(), Some(opener));
        assert_eq!(doc.global_listener_count(), 0);
        assert_eq!(surface.mounted_count(&doc), 0);
    }

    #[test]
    fn other_keys_leave_dialog_open() {
        let Fixture {
            mut doc, surface, ..
        } = fixture();
        let (dialog, closes) = counting_dialog(surface);
        dialog.set_open(&mut doc, true);
        doc.key_down(Key::Enter);
        assert!(dialog.is_open());
        assert_eq!(closes.get(), 0);
    }

    #[test]
    fn backdrop_press_closes_but_content_press_does_not() {
        let Fixture {
            mut doc,
            surface,
            opener,
        } = fixture();
        let (dialog, closes) = counting_dialog(surface);
        dialog.set_open(&mut doc, true);
        let parts = dialog.parts().unwrap();

        doc.pointer_down(parts.body, Point::new(5.0, 5.0));
        doc.pointer_down(parts.content, Point::new(5.0, 5.0));
        assert!(dialog.is_open());

        doc.pointer_down(parts.backdrop, Point::new(1.0, 1.0));
        assert!(!dialog.is_open());
        assert_eq!(closes.get(), 1);
        assert_eq!(doc.active_element(), Some(opener));
        assert!(!doc.is_alive(parts.backdrop));
    }

    #[test]
    fn close_button_click_dismisses() {
        let Fixture {
            mut doc,
            surface,
            opener,
        } = fixture();
        let (dialog, closes) = counting_dialog(surface);
        dialog.set_open(&mut doc, true);
        let button = dialog.parts().unwrap().close_button;
        doc.click(button, Point::new(2.0, 2.0));
        assert!(!dialog.is_open());
        assert_eq!(closes.get(), 1);
        assert_eq!(doc.active_element(), Some(opener));
    }

    #[test]
    fn owner_close_does_not_notify() {
        let Fixture {
            mut doc,
            surface,
            opener,
        } = fixture();
        let (dialog, closes) = counting_dialog(surface);
        dialog.set_open(&mut doc, true);
        assert!(dialog.set_open(&mut doc, false));
        assert!(!dialog.close(&mut doc));
        assert_eq!(closes.get(), 0);
        assert_eq!(doc.active_element(), Some(opener));
    }

    #[test]
    fn detached_opener_is_not_refocused() {
        let Fixture {
            mut doc,
            surface,
            opener,
        } = fixture();
        let dialog = Dialog::new(surface, DialogProps::new("t"));
        dialog.open(&mut doc);
        doc.detach(opener);
        dialog.close(&mut doc);
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn reopening_captures_fresh_focus() {
        let Fixture {
            mut doc,
            surface,
            opener,
        } = fixture();
        let root = doc.root();
        let other = doc.create_element("input");
        doc.append_child(root, other);
        doc.set_tab_index(other, Some(0));

        let dialog = Dialog::new(surface, DialogProps::new("t"));
        dialog.open(&mut doc);
        dialog.close(&mut doc);
        assert_eq!(doc.active_element(), Some(opener));

        doc.focus(other);
        dialog.open(&mut doc);
        dialog.close(&mut doc);
        assert_eq!(doc.active_element(), Some(other));
    }

    #[test]
    fn unmount_while_open_removes_listener_and_portal() {
        let Fixture {
            mut doc, surface, ..
        } = fixture();
        let dialog = Dialog::new(surface, DialogProps::new("t"));
        dialog.open(&mut doc);
        let listeners = doc.element_listener_count();
        assert!(listeners >= 2);
        dialog.unmount(&mut doc);
        assert_eq!(doc.global_listener_count(), 0);
        assert_eq!(doc.element_listener_count(), 0);
        assert_eq!(surface.mounted_count(&doc), 0);
    }

    #[test]
    fn closing_leaves_other_overlay_content() {
        let Fixture {
            mut doc, surface, ..
        } = fixture();
        let tip = doc.create_element("div");
        let _tip_portal = surface.mount(&mut doc, tip).unwrap();
        let dialog = Dialog::new(surface, DialogProps::new("t"));
        dialog.open(&mut doc);
        assert_eq!(surface.mounted_count(&doc), 2);
        dialog.close(&mut doc);
        assert_eq!(doc.children_of(surface.element()), &[tip]);
    }

    #[test]
    fn open_without_surface_stays_closed() {
        let mut doc = Document::new();
        let surface = OverlaySurface::install(&mut doc);
        doc.detach(surface.element());
        let dialog = Dialog::new(surface, DialogProps::new("t"));
        assert_eq!(
            dialog.try_open(&mut doc),
            Err(OverlayError::SurfaceDetached(surface.element()))
        );
        assert!(!dialog.is_open());
        assert_eq!(doc.global_listener_count(), 0);
    }

    #[test]
    fn on_close_may_reenter_the_dialog() {
        let Fixture {
            mut doc, surface, ..
        } = fixture();
        let slot: Rc<RefCell<Option<Rc<Dialog>>>> = Rc::new(RefCell::new(None));
        let reach = slot.clone();
        let dialog = Rc::new(Dialog::new(
            surface,
            DialogProps::new("t").with_on_close(move |doc| {
                if let Some(d) = reach.borrow().as_ref() {
                    d.set_open(doc, false);
                }
            }),
        ));
        *slot.borrow_mut() = Some(dialog.clone());
        dialog.open(&mut doc);
        doc.key_down(Key::Escape);
        assert!(!dialog.is_open());
        slot.borrow_mut().take();
    }

    #[test]
    fn dropped_open_dialogs_do_not_accumulate() {
        let Fixture {
            mut doc,
            surface,
            opener,
        } = fixture();
        for _ in 0..3 {
            let (dialog, closes) = counting_dialog(surface);
            dialog.open(&mut doc);
            drop(dialog);
            doc.key_down(Key::Escape);
            assert_eq!(closes.get(), 0);
            assert_eq!(doc.active_element(), Some(opener));
        }
        assert_eq!(doc.global_listener_count(), 0);
        assert_eq!(doc.element_listener_count(), 0);
        assert_eq!(surface.mounted_count(&doc), 0);
    }

    #[test]
    fn any_key_tears_down_a_dropped_dialog() {
        let Fixture {
            mut doc, surface, ..
        } = fixture();
        let dialog = Dialog::new(surface, DialogProps::new("Video Settings"));
        dialog.open(&mut doc);
        let backdrop = dialog.parts().unwrap().backdrop;
        drop(dialog);
        doc.key_down(Key::Char('a'));
        assert!(!doc.is_alive(backdrop));
        assert_eq!(doc.global_listener_count(), 0);
    }
}
