// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Playback controls: play/pause, scrubber, mute, volume, fullscreen.
//!
//! The controls hold no playback state of their own. They render the props
//! they are given and turn user input into callbacks; the owning player
//! decides what those callbacks do to the media element.

use alloc::format;
use alloc::rc::Rc;
use alloc::vec::Vec;

use kurbo::Rect;
use proscenium_dom::dispatch::{Dispatch, Outcome};
use proscenium_dom::{Document, ElementId, Event, EventKind, Handler, Key, ListenerId};
use proscenium_handle::MutRef;

/// A command without arguments, such as play/pause or mute.
pub type ControlCallback = Rc<dyn Fn(&mut Document)>;

/// A command carrying a value: a progress percentage or a volume.
pub type ValueCallback = Rc<dyn Fn(&mut Document, f64)>;

/// What the controls display.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControlsProps {
    /// Shows "Pause" when true, "Play" otherwise.
    pub is_playing: bool,
    /// Scrubber fill in percent.
    pub progress: f64,
    /// Volume slider position in `[0, 1]`.
    pub volume: f64,
}

impl Default for ControlsProps {
    fn default() -> Self {
        Self {
            is_playing: false,
            progress: 0.0,
            volume: 1.0,
        }
    }
}

/// Where the controls send user input.
#[derive(Clone)]
pub struct ControlsCallbacks {
    /// The play/pause button was clicked.
    pub on_play_pause: ControlCallback,
    /// The scrubber asked for a new position, in percent.
    pub on_seek: ValueCallback,
    /// The volume slider moved.
    pub on_volume_change: ValueCallback,
    /// The mute button was clicked.
    pub on_toggle_mute: ControlCallback,
    /// The fullscreen button was clicked.
    pub on_enter_fullscreen: ControlCallback,
}

impl core::fmt::Debug for ControlsCallbacks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ControlsCallbacks").finish_non_exhaustive()
    }
}

/// Elements of mounted controls.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ControlsParts {
    /// Wrapper holding every control.
    pub container: ElementId,
    /// Play/pause toggle.
    pub play_button: ElementId,
    /// The scrubber track (`role=slider`).
    pub progress_bar: ElementId,
    /// Filled part of the scrubber.
    pub progress_fill: ElementId,
    /// Mute toggle.
    pub mute_button: ElementId,
    /// Volume range input.
    pub volume_slider: ElementId,
    /// Fullscreen button.
    pub fullscreen_button: ElementId,
}

/// Mounted playback controls.
#[derive(Debug)]
pub struct Controls {
    parts: ControlsParts,
    listeners: Vec<ListenerId>,
    progress: MutRef<f64>,
}

/// Percentage of the track left of `click_x`, clamped to `[0, 100]`.
///
/// `None` when the track has no usable width.
///
/// ```
/// use kurbo::Rect;
/// use proscenium_media::scrub_percent;
///
/// let bar = Rect::new(0.0, 0.0, 200.0, 8.0);
/// assert_eq!(scrub_percent(100.0, bar), Some(50.0));
/// assert_eq!(scrub_percent(-30.0, bar), Some(0.0));
/// assert_eq!(scrub_percent(100.0, Rect::new(0.0, 0.0, 0.0, 8.0)), None);
/// ```
pub fn scrub_percent(click_x: f64, bar: Rect) -> Option<f64> {
    let width = bar.width();
    if !(width.is_finite() && width > 0.0 && click_x.is_finite() && bar.x0.is_finite()) {
        return None;
    }
    Some(((click_x - bar.x0) / width).clamp(0.0, 1.0) * 100.0)
}

/// New progress after an arrow key on the scrubber, or `None` for other keys.
pub fn keyboard_seek(progress: f64, key: Key, step: f64) -> Option<f64> {
    let delta = match key {
        Key::ArrowLeft => -step,
        Key::ArrowRight => step,
        _ => return None,
    };
    Some(sanitize_percent(progress + delta))
}

/// Speaker glyph for a volume level.
pub fn volume_glyph(volume: f64) -> &'static str {
    if volume <= 0.0 {
        "\u{1f507}"
    } else if volume > 0.5 {
        "\u{1f50a}"
    } else {
        "\u{1f508}"
    }
}

/// Clamp into `[0, 100]`, mapping NaN to 0.
pub(crate) fn sanitize_percent(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) }
}

impl Controls {
    /// Build the controls under `parent` and wire them to `callbacks`.
    ///
    /// `seek_step` is how many percentage points one arrow key moves the
    /// scrubber.
    pub fn mount(
        doc: &mut Document,
        parent: ElementId,
        callbacks: ControlsCallbacks,
        seek_step: f64,
    ) -> Self {
        let parts = build_parts(doc, parent);
        let progress = MutRef::new(0.0);
        let mut listeners = Vec::with_capacity(6);

        let on_play_pause = callbacks.on_play_pause.clone();
        listeners.extend(doc.add_listener(
            parts.play_button,
            EventKind::Click,
            command(move |doc| on_play_pause(doc)),
        ));

        let on_seek = callbacks.on_seek.clone();
        let bar = parts.progress_bar;
        listeners.extend(doc.add_listener(
            bar,
            EventKind::Click,
            Rc::new(move |doc: &mut Document, _: &Dispatch<ElementId>, ev: &Event| {
                let Some(at) = ev.position() else {
                    return Outcome::Continue;
                };
                match doc.measure(bar) {
                    Ok(track) => {
                        if let Some(percent) = scrub_percent(at.x, track) {
                            on_seek(doc, percent);
                        }
                    }
                    Err(err) => tracing::debug!(%err, "scrub ignored"),
                }
                Outcome::Continue
            }),
        ));

        let on_seek = callbacks.on_seek.clone();
        let shown = progress.clone();
        listeners.extend(doc.add_listener(
            bar,
            EventKind::KeyDown,
            Rc::new(move |doc: &mut Document, d: &Dispatch<ElementId>, ev: &Event| {
                if !d.is_target() {
                    return Outcome::Continue;
                }
                if let Some(next) = ev.key().and_then(|k| keyboard_seek(shown.get(), k, seek_step)) {
                    ev.prevent_default();
                    on_seek(doc, next);
                }
                Outcome::Continue
            }),
        ));

        let on_toggle_mute = callbacks.on_toggle_mute.clone();
        listeners.extend(doc.add_listener(
            parts.mute_button,
            EventKind::Click,
            command(move |doc| on_toggle_mute(doc)),
        ));

        let on_volume_change = callbacks.on_volume_change.clone();
        let slider = parts.volume_slider;
        listeners.extend(doc.add_listener(
            slider,
            EventKind::Input,
            Rc::new(move |doc: &mut Document, _: &Dispatch<ElementId>, _: &Event| {
                match doc.value(slider).trim().parse::<f64>() {
                    Ok(volume) => on_volume_change(doc, volume),
                    Err(err) => tracing::debug!(%err, "volume input ignored"),
                }
                Outcome::Continue
            }),
        ));

        let on_enter_fullscreen = callbacks.on_enter_fullscreen;
        listeners.extend(doc.add_listener(
            parts.fullscreen_button,
            EventKind::Click,
            command(move |doc| on_enter_fullscreen(doc)),
        ));

        let controls = Self {
            parts,
            listeners,
            progress,
        };
        controls.render(doc, &ControlsProps::default());
        controls
    }

    /// Reflect `props` in the elements.
    pub fn render(&self, doc: &mut Document, props: &ControlsProps) {
        let p = &self.parts;
        let progress = sanitize_percent(props.progress);
        self.progress.set(progress);

        let (label, glyph) = if props.is_playing {
            ("Pause", "\u{23f8}")
        } else {
            ("Play", "\u{25b6}")
        };
        doc.set_attribute(p.play_button, "aria-label", label);
        doc.set_text(p.play_button, glyph);

        doc.set_attribute(p.progress_bar, "aria-valuenow", format!("{progress}"));
        doc.set_attribute(p.progress_fill, "style", format!("width: {progress}%"));

        let volume = if props.volume.is_finite() {
            props.volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let muted = volume <= 0.0;
        doc.set_attribute(p.mute_button, "aria-label", if muted { "Unmute" } else { "Mute" });
        doc.set_text(p.mute_button, volume_glyph(volume));
        doc.set_value(p.volume_slider, format!("{volume}"));
    }

    /// The mounted elements.
    pub fn parts(&self) -> ControlsParts {
        self.parts
    }

    /// Remove the listeners and the elements.
    pub fn unmount(self, doc: &mut Document) {
        for id in self.listeners {
            doc.remove_listener(id);
        }
        doc.remove(self.parts.container);
    }
}

fn command(f: impl Fn(&mut Document) + 'static) -> Handler {
    Rc::new(move |doc: &mut Document, _: &Dispatch<ElementId>, _: &Event| {
        f(doc);
        Outcome::Continue
    })
}

fn build_parts(doc: &mut Document, parent: ElementId) -> ControlsParts {
    let container = doc.create_element("div");
    doc.set_attribute(container, "class", "video-controls");

    let play_button = doc.create_element("button");
    doc.set_attribute(play_button, "class", "control-btn play-btn");
    doc.set_tab_index(play_button, Some(0));

    let progress_bar = doc.create_element("div");
    doc.set_attribute(progress_bar, "class", "progress-bar");
    doc.set_attribute(progress_bar, "role", "slider");
    doc.set_attribute(progress_bar, "aria-label", "Video progress");
    doc.set_attribute(progress_bar, "aria-valuemin", "0");
    doc.set_attribute(progress_bar, "aria-valuemax", "100");
    doc.set_tab_index(progress_bar, Some(0));
    let progress_fill = doc.create_element("div");
    doc.set_attribute(progress_fill, "class", "progress-fill");
    doc.append_child(progress_bar, progress_fill);

    let volume_group = doc.create_element("div");
    doc.set_attribute(volume_group, "class", "volume-control");
    let mute_button = doc.create_element("button");
    doc.set_attribute(mute_button, "class", "control-btn");
    doc.set_tab_index(mute_button, Some(0));
    let volume_slider = doc.create_element("input");
    doc.set_attribute(volume_slider, "type", "range");
    doc.set_attribute(volume_slider, "class", "volume-slider");
    doc.set_attribute(volume_slider, "min", "0");
    doc.set_attribute(volume_slider, "max", "1");
    doc.set_attribute(volume_slider, "step", "0.1");
    doc.set_attribute(volume_slider, "aria-label", "Volume");
    doc.set_tab_index(volume_slider, Some(0));
    doc.append_child(volume_group, mute_button);
    doc.append_child(volume_group, volume_slider);

    let fullscreen_button = doc.create_element("button");
    doc.set_attribute(fullscreen_button, "class", "control-btn");
    doc.set_attribute(fullscreen_button, "aria-label", "Enter fullscreen");
    doc.set_text(fullscreen_button, "\u{26f6}");
    doc.set_tab_index(fullscreen_button, Some(0));

    for child in [play_button, progress_bar, volume_group, fullscreen_button] {
        doc.append_child(container, child);
    }
    doc.append_child(parent, container);

    ControlsParts {
        container,
        play_button,
        progress_bar,
        progress_fill,
        mute_button,
        volume_slider,
        fullscreen_button,
    }
}
