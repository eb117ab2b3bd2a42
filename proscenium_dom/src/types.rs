// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: identifiers, flags, keys, and events.

use core::cell::Cell;

use kurbo::Point;

/// Identifier for an element in the document (generational).
///
/// A removed element's slot may be reused; the generation makes stale
/// identifiers distinguishable from the element that replaced them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier of a registered listener (element-level or global).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// Identifier of a registered interval timer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u64);

bitflags::bitflags! {
    /// Element flags controlling focus.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element can receive focus, programmatically or by keyboard.
        const FOCUSABLE = 0b0000_0001;
        /// Element takes part in sequential (Tab) navigation.
        const TABBABLE  = 0b0000_0010;
    }
}

/// Keys the widgets react to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Tab.
    Tab,
    /// Space bar.
    Space,
    /// Any other printable character.
    Char(char),
}

/// Kind of an event, used to match listeners.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A key was pressed.
    KeyDown,
    /// A pointer button went down.
    PointerDown,
    /// A pointer button went up.
    PointerUp,
    /// Synthesized from a matching down/up pair.
    Click,
    /// The pointer entered an element. Does not bubble.
    PointerEnter,
    /// The pointer left an element. Does not bubble.
    PointerLeave,
    /// A form control's value changed.
    Input,
}

impl EventKind {
    /// Whether events of this kind propagate past their target.
    pub const fn bubbles(self) -> bool {
        !matches!(self, Self::PointerEnter | Self::PointerLeave)
    }
}

/// An input event delivered through [`Document::dispatch`](crate::Document::dispatch).
///
/// Default prevention lives on the event so handlers can mark it through a
/// shared reference while propagation continues.
#[derive(Clone, Debug)]
pub struct Event {
    kind: EventKind,
    key: Option<Key>,
    position: Option<Point>,
    default_prevented: Cell<bool>,
}

impl Event {
    /// A key-down event.
    pub fn key_down(key: Key) -> Self {
        Self {
            kind: EventKind::KeyDown,
            key: Some(key),
            position: None,
            default_prevented: Cell::new(false),
        }
    }

    /// A pointer event of the given kind at a viewport position.
    pub fn pointer(kind: EventKind, position: Point) -> Self {
        Self {
            kind,
            key: None,
            position: Some(position),
            default_prevented: Cell::new(false),
        }
    }

    /// A value-change event for form controls.
    pub fn input() -> Self {
        Self {
            kind: EventKind::Input,
            key: None,
            position: None,
            default_prevented: Cell::new(false),
        }
    }

    /// The event kind.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The key, for key events.
    pub fn key(&self) -> Option<Key> {
        self.key
    }

    /// The pointer position in viewport coordinates, for pointer events.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Ask the host to skip its default action for this event.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether any handler called [`Event::prevent_default`].
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}
