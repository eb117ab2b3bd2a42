// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proscenium Overlay: widgets that render outside their owner's box.
//!
//! A dialog or tooltip belongs logically to the widget that shows it, but must
//! not be clipped or stacked by that widget's layout. Every overlay widget here
//! mounts its content into one shared [`OverlaySurface`], a direct child of the
//! document root with the well-known id [`OVERLAY_ANCHOR_ID`], while keeping
//! its event handling and lifecycle with its owner.
//!
//! - [`OverlaySurface`] / [`Portal`]: install the surface once; each portal
//!   removes only the element it mounted.
//! - [`Dialog`]: modal. Saves and restores focus with a [`FocusMemento`],
//!   closes on Escape, on a press on its backdrop, or from its close button.
//! - [`Tooltip`]: non-modal. Measures its trigger on hover and places the tip
//!   above it.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use proscenium_dom::Document;
//! use proscenium_overlay::{Dialog, DialogProps, OverlaySurface, Tooltip, TooltipConfig};
//!
//! let mut doc = Document::new();
//! let surface = OverlaySurface::install(&mut doc);
//!
//! let info = doc.create_element("span");
//! doc.append_child(doc.root(), info);
//! doc.set_bounds(info, Rect::new(20.0, 100.0, 60.0, 120.0));
//! let tip = Tooltip::mount(&mut doc, surface, info, "About this player", TooltipConfig::default());
//!
//! doc.pointer_enter(info);
//! assert_eq!(tip.position().map(|p| (p.x, p.y)), Some((40.0, 90.0)));
//!
//! let dialog = Dialog::new(surface, DialogProps::new("Video Settings"));
//! dialog.set_open(&mut doc, true);
//! assert_eq!(surface.mounted_count(&doc), 2);
//!
//! let backdrop = dialog.parts().unwrap().backdrop;
//! doc.pointer_down(backdrop, Point::new(1.0, 1.0));
//! assert!(!dialog.is_open());
//! assert!(tip.is_visible());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod dialog;
mod focus;
mod surface;
mod tooltip;

pub use dialog::{CloseCallback, Dialog, DialogParts, DialogProps};
pub use focus::FocusMemento;
pub use surface::{OVERLAY_ANCHOR_ID, OverlayError, OverlaySurface, Portal};
pub use tooltip::{Tooltip, TooltipConfig, TooltipPosition};
