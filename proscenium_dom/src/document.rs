// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document: element structure, attributes, geometry, focus, listeners.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::click::{ClickResult, ClickState};
use crate::dispatch::{self, Dispatch, Outcome, Phase};
use crate::error::{FocusError, MeasureError};
use crate::timer::{TimerCallback, Timers};
use crate::types::{ElementFlags, ElementId, Event, EventKind, Key, ListenerId, TimerId};

/// Element-level listener: runs for the node in the matching phases.
pub type Handler = Rc<dyn Fn(&mut Document, &Dispatch<ElementId>, &Event) -> Outcome>;

/// Document-level listener: runs after element propagation completes.
pub type GlobalHandler = Rc<dyn Fn(&mut Document, &Event)>;

/// Summary of a finished dispatch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Dispatched {
    /// Some handler returned [`Outcome::Stop`].
    pub stopped: bool,
    /// Some handler called [`Event::prevent_default`].
    pub default_prevented: bool,
}

#[derive(Clone)]
struct ElementListener {
    id: ListenerId,
    kind: EventKind,
    capture: bool,
    handler: Handler,
}

impl ElementListener {
    fn runs_in(&self, phase: Phase) -> bool {
        match phase {
            Phase::Capture => self.capture,
            Phase::Target => true,
            Phase::Bubble => !self.capture,
        }
    }
}

#[derive(Clone)]
struct GlobalListener {
    id: ListenerId,
    kind: EventKind,
    handler: GlobalHandler,
}

struct Node {
    generation: u32,
    tag: &'static str,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attributes: HashMap<String, String>,
    text: String,
    value: String,
    bounds: Rect,
    flags: ElementFlags,
    listeners: SmallVec<[ElementListener; 2]>,
}

impl Node {
    fn new(generation: u32, tag: &'static str) -> Self {
        Self {
            generation,
            tag,
            parent: None,
            children: Vec::new(),
            attributes: HashMap::new(),
            text: String::new(),
            value: String::new(),
            bounds: Rect::ZERO,
            flags: ElementFlags::empty(),
            listeners: SmallVec::new(),
        }
    }
}

/// A single-threaded host document.
///
/// Elements live in a generational arena. An element is *attached* when its
/// parent chain reaches [`Document::root`]; only attached elements can take
/// focus, report a bounding box, or forward events to document-level
/// listeners. Geometry is supplied by the host's layout through
/// [`Document::set_bounds`] in viewport coordinates.
///
/// ```
/// use kurbo::Rect;
/// use proscenium_dom::Document;
///
/// let mut doc = Document::new();
/// let button = doc.create_element("button");
/// doc.append_child(doc.root(), button);
/// doc.set_tab_index(button, Some(0));
/// doc.set_bounds(button, Rect::new(10.0, 10.0, 90.0, 30.0));
///
/// assert!(doc.focus(button));
/// assert_eq!(doc.active_element(), Some(button));
/// assert_eq!(doc.measure(button), Ok(Rect::new(10.0, 10.0, 90.0, 30.0)));
/// ```
pub struct Document {
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: ElementId,
    ids: HashMap<String, ElementId>,
    focused: Option<ElementId>,
    fullscreen: Option<ElementId>,
    globals: Vec<GlobalListener>,
    next_listener: u64,
    timers: Timers,
    now_ms: u64,
    clicks: ClickState<ElementId>,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("focused", &self.focused)
            .field("global_listeners", &self.globals.len())
            .field("timers", &self.timers)
            .field("now_ms", &self.now_ms)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only its root (`body`) element.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: ElementId::new(0, 1),
            ids: HashMap::new(),
            focused: None,
            fullscreen: None,
            globals: Vec::new(),
            next_listener: 0,
            timers: Timers::default(),
            now_ms: 0,
            clicks: ClickState::new(),
        };
        doc.root = doc.create_element("body");
        doc
    }

    /// The root element. Always attached, never removable.
    pub fn root(&self) -> ElementId {
        self.root
    }

    // ---- structure ---------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &'static str) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, tag));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, tag)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementId uses 32-bit indices by design."
        )]
        let idx = idx as u32;
        ElementId::new(idx, generation)
    }

    /// Append `child` as the last child of `parent`, moving it if it already
    /// has a parent.
    ///
    /// Returns `false` if either element is stale or if the move would make
    /// an element its own ancestor.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if !self.is_alive(parent) || !self.is_alive(child) || child == self.root {
            return false;
        }
        if self.contains(child, parent) {
            return false;
        }
        self.unlink(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        true
    }

    /// Unlink an element (and its subtree) from its parent without destroying it.
    pub fn detach(&mut self, id: ElementId) -> bool {
        if !self.is_alive(id) || id == self.root {
            return false;
        }
        self.unlink(id);
        self.drop_state_within(id);
        true
    }

    /// Destroy an element and its subtree. Listeners registered on them are
    /// dropped and their identifiers become stale.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if !self.is_alive(id) || id == self.root {
            return false;
        }
        self.unlink(id);
        self.drop_state_within(id);
        self.free_subtree(id);
        true
    }

    /// Whether `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    /// Whether `id` is live and its parent chain reaches the root.
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.is_alive(id) && self.contains(self.root, id)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.node(c).and_then(|n| n.parent);
        }
        false
    }

    /// The parent of a live element.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.node(id)?.parent
    }

    /// The children of a live element, in document order.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// The tag an element was created with.
    pub fn tag_of(&self, id: ElementId) -> Option<&'static str> {
        self.node(id).map(|n| n.tag)
    }

    // ---- content -----------------------------------------------------------

    /// Set an attribute. Setting `id` also registers the element for
    /// [`Document::element_by_id`].
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        let value = value.into();
        if !self.is_alive(id) {
            return;
        }
        if name == "id" {
            if let Some(old) = self.attribute(id, "id").map(String::from) {
                self.ids.remove(&old);
            }
            self.ids.insert(value.clone(), id);
        }
        if let Some(n) = self.node_mut(id) {
            n.attributes.insert(String::from(name), value);
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> Option<String> {
        let old = self.node_mut(id)?.attributes.remove(name)?;
        if name == "id" {
            self.ids.remove(&old);
        }
        Some(old)
    }

    /// Read an attribute.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.node(id)?.attributes.get(name).map(String::as_str)
    }

    /// Look up a live element by its `id` attribute.
    pub fn element_by_id(&self, anchor: &str) -> Option<ElementId> {
        self.ids
            .get(anchor)
            .copied()
            .filter(|&id| self.is_alive(id))
    }

    /// Replace an element's text content.
    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(n) = self.node_mut(id) {
            n.text = text.into();
        }
    }

    /// An element's text content.
    pub fn text(&self, id: ElementId) -> &str {
        self.node(id).map(|n| n.text.as_str()).unwrap_or("")
    }

    /// Replace the current value of a form element.
    pub fn set_value(&mut self, id: ElementId, value: impl Into<String>) {
        if let Some(n) = self.node_mut(id) {
            n.value = value.into();
        }
    }

    /// The current value of a form element; empty for stale elements.
    pub fn value(&self, id: ElementId) -> &str {
        self.node(id).map(|n| n.value.as_str()).unwrap_or("")
    }

    // ---- geometry ----------------------------------------------------------

    /// Record an element's laid-out box in viewport coordinates.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(n) = self.node_mut(id) {
            n.bounds = bounds;
        }
    }

    /// The element's box, or [`Rect::ZERO`] when it is stale or detached.
    pub fn bounding_client_rect(&self, id: ElementId) -> Rect {
        if !self.is_attached(id) {
            return Rect::ZERO;
        }
        self.node(id).map(|n| n.bounds).unwrap_or(Rect::ZERO)
    }

    /// The element's box, validated for use in positioning math.
    pub fn measure(&self, id: ElementId) -> Result<Rect, MeasureError> {
        let node = self.node(id).ok_or(MeasureError::Stale(id))?;
        if !self.is_attached(id) {
            return Err(MeasureError::Detached(id));
        }
        let r = node.bounds;
        if ![r.x0, r.y0, r.x1, r.y1].iter().all(|v| v.is_finite()) {
            return Err(MeasureError::NonFinite(id));
        }
        if r.width() <= 0.0 || r.height() <= 0.0 {
            return Err(MeasureError::Degenerate(id));
        }
        Ok(r)
    }

    // ---- focus -------------------------------------------------------------

    /// Set or clear an element's `tabindex`.
    ///
    /// Any index makes the element focusable; non-negative indices also put it
    /// in sequential navigation.
    pub fn set_tab_index(&mut self, id: ElementId, index: Option<i32>) {
        match index {
            Some(i) => {
                self.set_attribute(id, "tabindex", alloc::format!("{i}"));
                if let Some(n) = self.node_mut(id) {
                    n.flags.insert(ElementFlags::FOCUSABLE);
                    n.flags.set(ElementFlags::TABBABLE, i >= 0);
                }
            }
            None => {
                self.remove_attribute(id, "tabindex");
                if let Some(n) = self.node_mut(id) {
                    n.flags
                        .remove(ElementFlags::FOCUSABLE | ElementFlags::TABBABLE);
                }
            }
        }
    }

    /// Flags of a live element.
    pub fn flags(&self, id: ElementId) -> Option<ElementFlags> {
        self.node(id).map(|n| n.flags)
    }

    /// Move focus to `id`.
    pub fn try_focus(&mut self, id: ElementId) -> Result<(), FocusError> {
        let node = self.node(id).ok_or(FocusError::Stale(id))?;
        if !node.flags.contains(ElementFlags::FOCUSABLE) {
            return Err(FocusError::NotFocusable(id));
        }
        if !self.is_attached(id) {
            return Err(FocusError::Detached(id));
        }
        self.focused = Some(id);
        Ok(())
    }

    /// Move focus to `id`; returns `false` (and leaves focus alone) if it cannot
    /// take focus.
    pub fn focus(&mut self, id: ElementId) -> bool {
        match self.try_focus(id) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(%err, "focus request ignored");
                false
            }
        }
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// The focused element, if any.
    pub fn active_element(&self) -> Option<ElementId> {
        self.focused.filter(|&id| self.is_attached(id))
    }

    // ---- fullscreen --------------------------------------------------------

    /// Ask for `id` to be presented fullscreen.
    pub fn request_fullscreen(&mut self, id: ElementId) -> bool {
        if !self.is_attached(id) {
            tracing::debug!(element = ?id, "fullscreen request for detached element ignored");
            return false;
        }
        self.fullscreen = Some(id);
        true
    }

    /// Leave fullscreen.
    pub fn exit_fullscreen(&mut self) {
        self.fullscreen = None;
    }

    /// The element currently presented fullscreen.
    pub fn fullscreen_element(&self) -> Option<ElementId> {
        self.fullscreen.filter(|&id| self.is_attached(id))
    }

    // ---- listeners ---------------------------------------------------------

    /// Listen for `kind` on `id` in the target and bubble phases.
    ///
    /// Returns `None` if the element is stale.
    pub fn add_listener(
        &mut self,
        id: ElementId,
        kind: EventKind,
        handler: Handler,
    ) -> Option<ListenerId> {
        self.push_listener(id, kind, false, handler)
    }

    /// Listen for `kind` on `id` in the capture and target phases.
    pub fn add_capture_listener(
        &mut self,
        id: ElementId,
        kind: EventKind,
        handler: Handler,
    ) -> Option<ListenerId> {
        self.push_listener(id, kind, true, handler)
    }

    /// Listen for `kind` at document level. Global listeners fire in
    /// registration order once element propagation finished without a stop.
    pub fn add_global_listener(&mut self, kind: EventKind, handler: GlobalHandler) -> ListenerId {
        let id = self.next_listener_id();
        self.globals.push(GlobalListener { id, kind, handler });
        id
    }

    /// Remove a listener registered with any of the `add_*` methods.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        if let Some(pos) = self.globals.iter().position(|l| l.id == id) {
            self.globals.remove(pos);
            return true;
        }
        for n in self.nodes.iter_mut().flatten() {
            if let Some(pos) = n.listeners.iter().position(|l| l.id == id) {
                n.listeners.remove(pos);
                return true;
            }
        }
        false
    }

    /// Number of document-level listeners currently registered.
    pub fn global_listener_count(&self) -> usize {
        self.globals.len()
    }

    /// Number of element-level listeners on live elements.
    pub fn element_listener_count(&self) -> usize {
        self.nodes.iter().flatten().map(|n| n.listeners.len()).sum()
    }

    // ---- dispatch ----------------------------------------------------------

    /// Deliver `event` to `target`: capture → target → bubble over the
    /// element's ancestors, then document-level listeners when the event
    /// bubbles, nothing stopped it, and the target is attached.
    pub fn dispatch(&mut self, target: ElementId, event: &Event) -> Dispatched {
        if !self.is_alive(target) {
            tracing::trace!(element = ?target, kind = ?event.kind(), "dispatch to stale element dropped");
            return Dispatched::default();
        }
        let path = self.path_to(target);
        let bubbles = event.kind().bubbles();
        let seq = dispatch::propagation_path(&path, bubbles);
        let stopped = dispatch::run(&seq, self, |d, doc| doc.run_element_listeners(d, event)).is_some();

        if !stopped && bubbles && path.first() == Some(&self.root) {
            let due: Vec<(ListenerId, GlobalHandler)> = self
                .globals
                .iter()
                .filter(|l| l.kind == event.kind())
                .map(|l| (l.id, l.handler.clone()))
                .collect();
            for (id, handler) in due {
                // A listener removed by an earlier one in this batch must not run.
                if self.globals.iter().any(|l| l.id == id) {
                    handler(self, event);
                }
            }
        }

        Dispatched {
            stopped,
            default_prevented: event.default_prevented(),
        }
    }

    /// Press `key` on the focused element (or the root when nothing has focus).
    pub fn key_down(&mut self, key: Key) -> Dispatched {
        let target = self.active_element().unwrap_or(self.root);
        self.dispatch(target, &Event::key_down(key))
    }

    /// Press the pointer on `target` at `position`.
    pub fn pointer_down(&mut self, target: ElementId, position: Point) -> Dispatched {
        self.clicks.on_down(target, position, self.now_ms);
        self.dispatch(target, &Event::pointer(EventKind::PointerDown, position))
    }

    /// Release the pointer over `target`; synthesizes a click on the pressed
    /// element when the release completes one.
    pub fn pointer_up(&mut self, target: ElementId, position: Point) -> Dispatched {
        let up = self.dispatch(target, &Event::pointer(EventKind::PointerUp, position));
        match self.clicks.on_up(&target, position, self.now_ms) {
            ClickResult::Click(pressed) if self.is_alive(pressed) => {
                self.dispatch(pressed, &Event::pointer(EventKind::Click, position))
            }
            _ => up,
        }
    }

    /// Press and release on `target` at `position`.
    pub fn click(&mut self, target: ElementId, position: Point) -> Dispatched {
        self.pointer_down(target, position);
        self.pointer_up(target, position)
    }

    /// The user changed a form control's value.
    pub fn input(&mut self, target: ElementId, value: impl Into<String>) -> Dispatched {
        self.set_value(target, value);
        self.dispatch(target, &Event::input())
    }

    /// The pointer moved onto `target`.
    pub fn pointer_enter(&mut self, target: ElementId) -> Dispatched {
        let at = self.bounding_client_rect(target).center();
        self.dispatch(target, &Event::pointer(EventKind::PointerEnter, at))
    }

    /// The pointer moved off `target`.
    pub fn pointer_leave(&mut self, target: ElementId) -> Dispatched {
        let at = self.bounding_client_rect(target).center();
        self.dispatch(target, &Event::pointer(EventKind::PointerLeave, at))
    }

    // ---- timers ------------------------------------------------------------

    /// Milliseconds on the document's clock.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Run `callback` every `period_ms` milliseconds of document time.
    pub fn set_interval(&mut self, period_ms: u64, callback: TimerCallback) -> TimerId {
        self.timers.insert(self.now_ms, period_ms, callback)
    }

    /// Stop an interval. Returns `false` if it was not registered.
    pub fn clear_interval(&mut self, id: TimerId) -> bool {
        self.timers.remove(id)
    }

    /// Whether an interval is still registered.
    pub fn has_interval(&self, id: TimerId) -> bool {
        self.timers.contains(id)
    }

    /// Number of registered intervals.
    pub fn interval_count(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward, firing every interval that falls due on the way
    /// in time order.
    pub fn advance(&mut self, ms: u64) {
        let until = self.now_ms.saturating_add(ms);
        while let Some((due, callback)) = self.timers.take_due(until) {
            self.now_ms = due;
            callback(self);
        }
        self.now_ms = until;
    }

    // ---- internals ---------------------------------------------------------

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|n| n.generation == id.1)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|n| n.generation == id.1)
    }

    fn next_listener_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }

    fn push_listener(
        &mut self,
        id: ElementId,
        kind: EventKind,
        capture: bool,
        handler: Handler,
    ) -> Option<ListenerId> {
        if !self.is_alive(id) {
            return None;
        }
        let listener = self.next_listener_id();
        self.node_mut(id)?.listeners.push(ElementListener {
            id: listener,
            kind,
            capture,
            handler,
        });
        Some(listener)
    }

    fn run_element_listeners(&mut self, d: &Dispatch<ElementId>, event: &Event) -> Outcome {
        let Some(node) = self.node(d.node) else {
            return Outcome::Continue;
        };
        let due: SmallVec<[(ListenerId, Handler); 2]> = node
            .listeners
            .iter()
            .filter(|l| l.kind == event.kind() && l.runs_in(d.phase))
            .map(|l| (l.id, l.handler.clone()))
            .collect();
        for (id, handler) in due {
            let still_registered = self
                .node(d.node)
                .is_some_and(|n| n.listeners.iter().any(|l| l.id == id));
            if still_registered && handler(self, d, event) == Outcome::Stop {
                return Outcome::Stop;
            }
        }
        Outcome::Continue
    }

    /// Root-most ancestor first, `id` last.
    fn path_to(&self, id: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            path.push(c);
            cur = self.node(c).and_then(|n| n.parent);
        }
        path.reverse();
        path
    }

    fn unlink(&mut self, id: ElementId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    /// Clear focus, fullscreen, and a pending press that point into `id`'s subtree.
    fn drop_state_within(&mut self, id: ElementId) {
        if self.focused.is_some_and(|f| self.contains(id, f)) {
            self.focused = None;
        }
        if self.fullscreen.is_some_and(|f| self.contains(id, f)) {
            self.fullscreen = None;
        }
        if self
            .clicks
            .press()
            .is_some_and(|p| self.contains(id, p.target))
        {
            self.clicks.cancel();
        }
    }

    fn free_subtree(&mut self, id: ElementId) {
        let children = self
            .node(id)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.free_subtree(child);
        }
        if let Some(anchor) = self.attribute(id, "id").map(String::from)
            && self.ids.get(&anchor) == Some(&id)
        {
            self.ids.remove(&anchor);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::{Cell, RefCell};

    fn attached(doc: &mut Document, parent: ElementId, tag: &'static str) -> ElementId {
        let el = doc.create_element(tag);
        assert!(doc.append_child(parent, el), "append should succeed");
        el
    }

    fn attached_to_root(doc: &mut Document, tag: &'static str) -> ElementId {
        let root = doc.root();
        attached(doc, root, tag)
    }

    #[test]
    fn removed_ids_are_stale_even_when_slot_is_reused() {
        let mut doc = Document::new();
        let a = attached_to_root(&mut doc, "div");
        assert!(doc.remove(a));
        let b = doc.create_element("div");
        assert_eq!(a.idx(), b.idx());
        assert!(!doc.is_alive(a));
        assert!(doc.is_alive(b));
    }

    #[test]
    fn detached_subtrees_lose_focus_and_measure_as_zero() {
        let mut doc = Document::new();
        let parent = attached_to_root(&mut doc, "div");
        let child = attached(&mut doc, parent, "button");
        doc.set_tab_index(child, Some(0));
        doc.set_bounds(child, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(doc.focus(child));

        assert!(doc.detach(parent));
        assert_eq!(doc.active_element(), None);
        assert!(doc.is_alive(child));
        assert!(!doc.is_attached(child));
        assert_eq!(doc.bounding_client_rect(child), Rect::ZERO);
        assert_eq!(doc.measure(child), Err(MeasureError::Detached(child)));
        assert_eq!(doc.try_focus(child), Err(FocusError::Detached(child)));
    }

    #[test]
    fn focus_requires_focusable_live_element() {
        let mut doc = Document::new();
        let plain = attached_to_root(&mut doc, "div");
        assert_eq!(doc.try_focus(plain), Err(FocusError::NotFocusable(plain)));
        doc.set_tab_index(plain, Some(-1));
        assert_eq!(doc.try_focus(plain), Ok(()));
        assert!(!doc.flags(plain).unwrap().contains(ElementFlags::TABBABLE));
        doc.remove(plain);
        assert_eq!(doc.try_focus(plain), Err(FocusError::Stale(plain)));
    }

    #[test]
    fn measure_rejects_degenerate_and_non_finite_boxes() {
        let mut doc = Document::new();
        let el = attached_to_root(&mut doc, "span");
        assert_eq!(doc.measure(el), Err(MeasureError::Degenerate(el)));
        doc.set_bounds(el, Rect::new(0.0, 0.0, f64::NAN, 5.0));
        assert_eq!(doc.measure(el), Err(MeasureError::NonFinite(el)));
    }

    #[test]
    fn append_refuses_cycles() {
        let mut doc = Document::new();
        let a = attached_to_root(&mut doc, "div");
        let b = attached(&mut doc, a, "div");
        assert!(!doc.append_child(b, a));
        assert_eq!(doc.parent_of(b), Some(a));
    }

    #[test]
    fn element_by_id_tracks_attribute_and_removal() {
        let mut doc = Document::new();
        let a = attached_to_root(&mut doc, "div");
        doc.set_attribute(a, "id", "anchor");
        assert_eq!(doc.element_by_id("anchor"), Some(a));
        doc.remove(a);
        assert_eq!(doc.element_by_id("anchor"), None);
    }

    #[test]
    fn dispatch_distinguishes_target_from_bubbled() {
        let mut doc = Document::new();
        let outer = attached_to_root(&mut doc, "div");
        let inner = attached(&mut doc, outer, "div");
        let seen: Rc<RefCell<Vec<(Phase, bool)>>> = Rc::default();
        let log = seen.clone();
        doc.add_listener(
            outer,
            EventKind::PointerDown,
            Rc::new(move |_, d, _| {
                log.borrow_mut().push((d.phase, d.node == d.target));
                Outcome::Continue
            }),
        );

        doc.pointer_down(inner, Point::ZERO);
        doc.pointer_down(outer, Point::ZERO);
        assert_eq!(
            *seen.borrow(),
            vec![(Phase::Bubble, false), (Phase::Target, true)]
        );
    }

    #[test]
    fn stop_prevents_global_listeners() {
        let mut doc = Document::new();
        let el = attached_to_root(&mut doc, "input");
        doc.set_tab_index(el, Some(0));
        doc.focus(el);
        let globals = Rc::new(Cell::new(0));
        let g = globals.clone();
        doc.add_global_listener(EventKind::KeyDown, Rc::new(move |_, _| g.set(g.get() + 1)));

        doc.key_down(Key::Escape);
        assert_eq!(globals.get(), 1);

        doc.add_listener(
            el,
            EventKind::KeyDown,
            Rc::new(|_, _, ev| {
                ev.prevent_default();
                Outcome::Stop
            }),
        );
        let result = doc.key_down(Key::Escape);
        assert!(result.stopped);
        assert!(result.default_prevented);
        assert_eq!(globals.get(), 1);
    }

    #[test]
    fn global_listeners_fire_in_registration_order_and_respect_removal() {
        let mut doc = Document::new();
        let order: Rc<RefCell<Vec<u8>>> = Rc::default();
        let second: Rc<Cell<Option<ListenerId>>> = Rc::default();

        let (o, s) = (order.clone(), second.clone());
        doc.add_global_listener(
            EventKind::KeyDown,
            Rc::new(move |doc, _| {
                o.borrow_mut().push(1);
                if let Some(id) = s.get() {
                    doc.remove_listener(id);
                }
            }),
        );
        let o = order.clone();
        let id = doc.add_global_listener(EventKind::KeyDown, Rc::new(move |_, _| o.borrow_mut().push(2)));
        second.set(Some(id));

        doc.key_down(Key::Enter);
        assert_eq!(*order.borrow(), vec![1]);
        assert_eq!(doc.global_listener_count(), 1);
    }

    #[test]
    fn click_is_synthesized_on_matching_release() {
        let mut doc = Document::new();
        let button = attached_to_root(&mut doc, "button");
        let other = attached_to_root(&mut doc, "div");
        let clicks = Rc::new(Cell::new(0));
        let c = clicks.clone();
        doc.add_listener(
            button,
            EventKind::Click,
            Rc::new(move |_, _, _| {
                c.set(c.get() + 1);
                Outcome::Continue
            }),
        );

        doc.click(button, Point::new(5.0, 5.0));
        assert_eq!(clicks.get(), 1);

        doc.pointer_down(button, Point::new(5.0, 5.0));
        doc.pointer_up(other, Point::new(300.0, 5.0));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn removing_element_drops_its_listeners() {
        let mut doc = Document::new();
        let el = attached_to_root(&mut doc, "div");
        doc.add_listener(el, EventKind::Click, Rc::new(|_, _, _| Outcome::Continue));
        assert_eq!(doc.element_listener_count(), 1);
        doc.remove(el);
        assert_eq!(doc.element_listener_count(), 0);
        assert!(doc.add_listener(el, EventKind::Click, Rc::new(|_, _, _| Outcome::Continue)).is_none());
    }

    #[test]
    fn intervals_fire_in_time_order_and_can_clear_themselves() {
        let mut doc = Document::new();
        let ticks = Rc::new(Cell::new(0_u32));
        let own: Rc<Cell<Option<TimerId>>> = Rc::default();
        let (t, o) = (ticks.clone(), own.clone());
        let id = doc.set_interval(
            10,
            Rc::new(move |doc| {
                t.set(t.get() + 1);
                if t.get() == 3
                    && let Some(id) = o.get()
                {
                    doc.clear_interval(id);
                }
            }),
        );
        own.set(Some(id));

        doc.advance(25);
        assert_eq!(ticks.get(), 2);
        assert_eq!(doc.now_ms(), 25);
        doc.advance(100);
        assert_eq!(ticks.get(), 3);
        assert_eq!(doc.interval_count(), 0);
    }

    #[test]
    fn fullscreen_follows_attachment() {
        let mut doc = Document::new();
        let el = attached_to_root(&mut doc, "div");
        assert!(doc.request_fullscreen(el));
        assert_eq!(doc.fullscreen_element(), Some(el));
        doc.remove(el);
        assert_eq!(doc.fullscreen_element(), None);
        let loose = doc.create_element("div");
        assert!(!doc.request_fullscreen(loose));
    }

    #[test]
    fn input_sets_value_before_listeners_run() {
        let mut doc = Document::new();
        let field = attached_to_root(&mut doc, "input");
        let seen = Rc::new(RefCell::new(String::new()));
        let s = seen.clone();
        doc.add_listener(
            field,
            EventKind::Input,
            Rc::new(move |doc, d, _| {
                s.borrow_mut().push_str(doc.value(d.target));
                Outcome::Continue
            }),
        );
        doc.input(field, "0.4");
        assert_eq!(doc.value(field), "0.4");
        assert_eq!(seen.borrow().as_str(), "0.4");
    }
}
