// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tip anchored above a trigger element.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;

use kurbo::Rect;
use proscenium_dom::dispatch::{Dispatch, Outcome};
use proscenium_dom::{Document, ElementId, Event, EventKind, ListenerId};

use crate::surface::{OverlayError, OverlaySurface, Portal};

const TRIGGER_CLASS: &str = "tooltip-trigger";

/// Tooltip placement settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TooltipConfig {
    /// Vertical distance between the trigger's top edge and the tip's anchor.
    pub gap: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self { gap: 10.0 }
    }
}

impl TooltipConfig {
    /// Use a different gap.
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }
}

/// Anchor point of a visible tip, in viewport coordinates.
///
/// The tip is centred horizontally on `x` and sits with its bottom at `y`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TooltipPosition {
    /// Horizontal centre of the trigger.
    pub x: f64,
    /// `gap` above the trigger's top edge.
    pub y: f64,
}

impl TooltipPosition {
    /// Position for a tip above `trigger`.
    ///
    /// ```
    /// use kurbo::Rect;
    /// use proscenium_overlay::TooltipPosition;
    ///
    /// let p = TooltipPosition::above(Rect::new(100.0, 50.0, 180.0, 70.0), 10.0);
    /// assert_eq!((p.x, p.y), (140.0, 40.0));
    /// ```
    pub fn above(trigger: Rect, gap: f64) -> Self {
        Self {
            x: trigger.x0 + trigger.width() / 2.0,
            y: trigger.y0 - gap,
        }
    }
}

enum TooltipState {
    Hidden,
    Visible {
        portal: Portal,
        position: TooltipPosition,
    },
}

struct TooltipInner {
    surface: OverlaySurface,
    trigger: ElementId,
    text: String,
    config: TooltipConfig,
    state: TooltipState,
    listeners: Option<[ListenerId; 2]>,
}

/// A hover tip for one trigger element.
///
/// Pointer-enter on the trigger measures it and mounts the tip into the
/// overlay surface; pointer-leave removes it. The position is computed once
/// per enter and is not tracked while visible. A trigger with no usable box
/// leaves the tip hidden.
///
/// A tooltip dropped without [`Tooltip::unmount`] detaches from its trigger
/// the next time the pointer enters or leaves it.
pub struct Tooltip {
    inner: Rc<RefCell<TooltipInner>>,
    /// Trigger listeners hold this weakly to notice the tooltip was dropped.
    alive: Rc<()>,
}

impl Tooltip {
    /// Attach a tip showing `text` to `trigger`.
    pub fn mount(
        doc: &mut Document,
        surface: OverlaySurface,
        trigger: ElementId,
        text: impl Into<String>,
        config: TooltipConfig,
    ) -> Self {
        let inner = Rc::new(RefCell::new(TooltipInner {
            surface,
            trigger,
            text: text.into(),
            config,
            state: TooltipState::Hidden,
            listeners: None,
        }));
        let class = match doc.attribute(trigger, "class") {
            Some(existing) if existing.split_whitespace().any(|c| c == TRIGGER_CLASS) => None,
            Some(existing) if !existing.trim().is_empty() => {
                Some(format!("{} {}", existing.trim_end(), TRIGGER_CLASS))
            }
            _ => Some(String::from(TRIGGER_CLASS)),
        };
        if let Some(class) = class {
            doc.set_attribute(trigger, "class", class);
        }

        let alive = Rc::new(());
        let (on_enter_inner, owner) = (inner.clone(), Rc::downgrade(&alive));
        let on_enter = doc.add_listener(
            trigger,
            EventKind::PointerEnter,
            Rc::new(move |doc: &mut Document, _: &Dispatch<ElementId>, _: &Event| {
                if owner.strong_count() == 0 {
                    detach(&on_enter_inner, doc);
                } else {
                    show(&on_enter_inner, doc);
                }
                Outcome::Continue
            }),
        );
        let (on_leave_inner, owner) = (inner.clone(), Rc::downgrade(&alive));
        let on_leave = doc.add_listener(
            trigger,
            EventKind::PointerLeave,
            Rc::new(move |doc: &mut Document, _: &Dispatch<ElementId>, _: &Event| {
                if owner.strong_count() == 0 {
                    detach(&on_leave_inner, doc);
                } else {
                    hide(&on_leave_inner, doc);
                }
                Outcome::Continue
            }),
        );
        match (on_enter, on_leave) {
            (Some(enter), Some(leave)) => inner.borrow_mut().listeners = Some([enter, leave]),
            _ => tracing::debug!(trigger = ?trigger, "tooltip trigger is stale"),
        }
        Self { inner, alive }
    }

    /// Show the tip as on pointer-enter. Returns whether it is visible after.
    pub fn show(&self, doc: &mut Document) -> bool {
        show(&self.inner, doc)
    }

    /// Show the tip, reporting why the trigger could not be used.
    pub fn try_show(&self, doc: &mut Document) -> Result<TooltipPosition, OverlayError> {
        try_show(&self.inner, doc)
    }

    /// Hide the tip as on pointer-leave. Returns `false` if it was hidden.
    pub fn hide(&self, doc: &mut Document) -> bool {
        hide(&self.inner, doc)
    }

    /// Hide the tip and detach from the trigger.
    pub fn unmount(&self, doc: &mut Document) {
        detach(&self.inner, doc);
    }

    /// Whether the tip is on the surface.
    pub fn is_visible(&self) -> bool {
        matches!(self.inner.borrow().state, TooltipState::Visible { .. })
    }

    /// The visible tip's anchor point.
    pub fn position(&self) -> Option<TooltipPosition> {
        match &self.inner.borrow().state {
            TooltipState::Visible { position, .. } => Some(*position),
            TooltipState::Hidden => None,
        }
    }

    /// The visible tip element.
    pub fn tip(&self) -> Option<ElementId> {
        match &self.inner.borrow().state {
            TooltipState::Visible { portal, .. } => Some(portal.content()),
            TooltipState::Hidden => None,
        }
    }

    /// The trigger element.
    pub fn trigger(&self) -> ElementId {
        self.inner.borrow().trigger
    }

    /// Change the text, updating a visible tip in place.
    pub fn set_text(&self, doc: &mut Document, text: impl Into<String>) {
        let text = text.into();
        if let Some(tip) = self.tip() {
            doc.set_text(tip, text.clone());
        }
        self.inner.borrow_mut().text = text;
    }
}

impl core::fmt::Debug for Tooltip {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Tooltip")
            .field("trigger", &inner.trigger)
            .field("text", &inner.text)
            .field("position", &self.position())
            .finish_non_exhaustive()
    }
}

fn detach(inner: &Rc<RefCell<TooltipInner>>, doc: &mut Document) {
    hide(inner, doc);
    let listeners = inner.borrow_mut().listeners.take();
    for id in listeners.into_iter().flatten() {
        doc.remove_listener(id);
    }
}

fn show(inner: &Rc<RefCell<TooltipInner>>, doc: &mut Document) -> bool {
    match try_show(inner, doc) {
        Ok(_) => true,
        Err(err) => {
            tracing::debug!(%err, "tooltip not shown");
            false
        }
    }
}

fn try_show(
    inner: &Rc<RefCell<TooltipInner>>,
    doc: &mut Document,
) -> Result<TooltipPosition, OverlayError> {
    let (surface, trigger, text, gap) = {
        let i = inner.borrow();
        (i.surface, i.trigger, i.text.clone(), i.config.gap)
    };
    let bounds = doc.measure(trigger)?;
    let position = TooltipPosition::above(bounds, gap);

    let mut i = inner.borrow_mut();
    if let TooltipState::Visible {
        portal,
        position: current,
    } = &mut i.state
    {
        *current = position;
        place(doc, portal.content(), position);
        return Ok(position);
    }

    let tip = doc.create_element("div");
    doc.set_attribute(tip, "class", "tooltip");
    doc.set_attribute(tip, "role", "tooltip");
    doc.set_text(tip, text);
    let arrow = doc.create_element("div");
    doc.set_attribute(arrow, "class", "tooltip-arrow");
    doc.append_child(tip, arrow);
    place(doc, tip, position);

    let portal = match surface.mount(doc, tip) {
        Ok(portal) => portal,
        Err(err) => {
            doc.remove(tip);
            return Err(err);
        }
    };
    i.state = TooltipState::Visible { portal, position };
    Ok(position)
}

fn hide(inner: &Rc<RefCell<TooltipInner>>, doc: &mut Document) -> bool {
    let state = core::mem::replace(&mut inner.borrow_mut().state, TooltipState::Hidden);
    match state {
        TooltipState::Visible { portal, .. } => {
            portal.unmount(doc);
            true
        }
        TooltipState::Hidden => false,
    }
}

fn place(doc: &mut Document, tip: ElementId, position: TooltipPosition) {
    doc.set_attribute(
        tip,
        "style",
        format!(
            "left: {}px; top: {}px; transform: translate(-50%, -100%)",
            position.x, position.y
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use proscenium_dom::MeasureError;

    fn trigger_at(doc: &mut Document, bounds: Rect) -> ElementId {
        let root = doc.root();
        let el = doc.create_element("span");
        doc.append_child(root, el);
        doc.set_bounds(el, bounds);
        el
    }

    #[test]
    fn enter_shows_tip_above_trigger_centre() {
        let mut doc = Document::new();
        let surface = OverlaySurface::install(&mut doc);
        let trigger = trigger_at(&mut doc, Rect::new(100.0, 50.0, 180.0, 70.0));
        let tip = Tooltip::mount(
            &mut doc,
            surface,
            trigger,
            "hello",
            TooltipConfig::default(),
        );

        doc.pointer_enter(trigger);
        assert!(tip.is_visible());
        assert_eq!(tip.position(), Some(TooltipPosition { x: 140.0, y: 40.0 }));
        let el = tip.tip().unwrap();
        assert_eq!(doc.parent_of(el), Some(surface.element()));
        assert_eq!(doc.text(el), "hello");
        assert_eq!(doc.attribute(el, "class"), Some("tooltip"));
        assert_eq!(doc.children_of(el).len(), 1);

        doc.pointer_leave(trigger);
        assert!(!tip.is_visible());
        assert_eq!(surface.mounted_count(&doc), 0);
    }

    #[test]
    fn two_triggers_position_independently() {
        let mut doc = Document::new();
        let surface = OverlaySurface::install(&mut doc);
        let a = trigger_at(&mut doc, Rect::new(0.0, 100.0, 40.0, 120.0));
        let b = trigger_at(&mut doc, Rect::new(300.0, 20.0, 400.0, 40.0));
        let config = TooltipConfig::default().with_gap(4.0);
        let tip_a = Tooltip::mount(&mut doc, surface, a, "a", config);
        let tip_b = Tooltip::mount(&mut doc, surface, b, "b", config);

        doc.pointer_enter(a);
        doc.pointer_enter(b);
        assert_eq!(tip_a.position(), Some(TooltipPosition { x: 20.0, y: 96.0 }));
        assert_eq!(tip_b.position(), Some(TooltipPosition { x: 350.0, y: 16.0 }));
        assert_eq!(surface.mounted_count(&doc), 2);

        doc.pointer_leave(a);
        assert!(tip_b.is_visible());
        assert_eq!(surface.mounted_count(&doc), 1);
    }

    #[test]
    fn degenerate_trigger_stays_hidden() {
        let mut doc = Document::new();
        let surface = OverlaySurface::install(&mut doc);
        let trigger = trigger_at(&mut doc, Rect::new(10.0, 10.0, 10.0, 30.0));
        let tip = Tooltip::mount(&mut doc, surface, trigger, "x", TooltipConfig::default());
        assert_eq!(
            tip.try_show(&mut doc),
            Err(OverlayError::Measure(MeasureError::Degenerate(trigger)))
        );
        doc.pointer_enter(trigger);
        assert!(!tip.is_visible());
        assert_eq!(surface.mounted_count(&doc), 0);
    }

    #[test]
    fn position_is_not_tracked_until_next_enter() {
        let mut doc = Document::new();
        let surface = OverlaySurface::install(&mut doc);
        let trigger = trigger_at(&mut doc, Rect::new(0.0, 50.0, 20.0, 60.0));
        let tip = Tooltip::mount(&mut doc, surface, trigger, "x", TooltipConfig::default());
        doc.pointer_enter(trigger);
        doc.set_bounds(trigger, Rect::new(0.0, 150.0, 20.0, 160.0));
        assert_eq!(tip.position(), Some(TooltipPosition { x: 10.0, y: 40.0 }));
        doc.pointer_enter(trigger);
        assert_eq!(tip.position(), Some(TooltipPosition { x: 10.0, y: 140.0 }));
        assert_eq!(surface.mounted_count(&doc), 1);
    }

    #[test]
    fn unmount_removes_trigger_listeners() {
        let mut doc = Document::new();
        let surface = OverlaySurface::install(&mut doc);
        let trigger = trigger_at(&mut doc, Rect::new(0.0, 50.0, 20.0, 60.0));
        let tip = Tooltip::mount(&mut doc, surface, trigger, "x", TooltipConfig::default());
        assert_eq!(doc.element_listener_count(), 2);
        doc.pointer_enter(trigger);
        tip.unmount(&mut doc);
        assert_eq!(doc.element_listener_count(), 0);
        assert_eq!(surface.mounted_count(&doc), 0);
        doc.pointer_enter(trigger);
        assert!(!tip.is_visible());
    }

    #[test]
    fn dropped_tooltip_detaches_on_next_pointer_event() {
        let mut doc = Document::new();
        let surface = OverlaySurface::install(&mut doc);
        let trigger = trigger_at(&mut doc, Rect::new(0.0, 50.0, 20.0, 60.0));
        let tip = Tooltip::mount(&mut doc, surface, trigger, "x", TooltipConfig::default());
        doc.pointer_enter(trigger);
        assert_eq!(surface.mounted_count(&doc), 1);
        drop(tip);
        doc.pointer_leave(trigger);
        assert_eq!(doc.element_listener_count(), 0);
        assert_eq!(surface.mounted_count(&doc), 0);
        doc.pointer_enter(trigger);
        assert_eq!(surface.mounted_count(&doc), 0);
    }

    #[test]
    fn trigger_keeps_its_own_classes() {
        let mut doc = Document::new();
        let surface = OverlaySurface::install(&mut doc);
        let plain = trigger_at(&mut doc, Rect::new(0.0, 50.0, 20.0, 60.0));
        let styled = trigger_at(&mut doc, Rect::new(40.0, 50.0, 60.0, 60.0));
        doc.set_attribute(styled, "class", "info-icon");
        let _a = Tooltip::mount(&mut doc, surface, plain, "a", TooltipConfig::default());
        let _b = Tooltip::mount(&mut doc, surface, styled, "b", TooltipConfig::default());
        let _c = Tooltip::mount(&mut doc, surface, styled, "c", TooltipConfig::default());
        assert_eq!(doc.attribute(plain, "class"), Some("tooltip-trigger"));
        assert_eq!(doc.attribute(styled, "class"), Some("info-icon tooltip-trigger"));
    }

    #[test]
    fn tip_and_dialog_share_the_surface() {
        use crate::{Dialog, DialogProps};

        let mut doc = Document::new();
        let surface = OverlaySurface::install(&mut doc);
        let trigger = trigger_at(&mut doc, Rect::new(0.0, 50.0, 20.0, 60.0));
        let tip = Tooltip::mount(&mut doc, surface, trigger, "x", TooltipConfig::default());
        let dialog = Dialog::new(surface, DialogProps::new("t"));
        doc.pointer_enter(trigger);
        dialog.open(&mut doc);
        assert_eq!(surface.mounted_count(&doc), 2);
        tip.hide(&mut doc);
        assert!(dialog.is_open());
        assert_eq!(surface.mounted_count(&doc), 1);
    }
}
