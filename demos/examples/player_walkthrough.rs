// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root composition: a media player, a URL entry, an info tooltip, and a
//! settings dialog sharing one overlay surface.
//!
//! The walkthrough scripts a short session against a simulated media element
//! and prints what a user would see after each step. Set `RUST_LOG=debug` to
//! also see the widgets' lifecycle events.
//!
//! Run:
//! - `cargo run -p proscenium_demos --example player_walkthrough`

use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use proscenium_dom::dispatch::{Dispatch, Outcome};
use proscenium_dom::{Document, ElementId, Event, EventKind, Key};
use proscenium_handle::{HandleCell, MutRef, State};
use proscenium_media::sim::SimulatedMedia;
use proscenium_media::{
    MediaHandle, MediaPlayer, MediaProps, TextEntry, TextEntryHandle, TextEntryProps,
};
use proscenium_overlay::{Dialog, DialogProps, OverlaySurface, Tooltip, TooltipConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_URL: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

type Player = MediaPlayer<SimulatedMedia>;

/// The application root: owns the widgets and the state that wires them.
struct App {
    player: Player,
    player_handle: HandleCell<MediaHandle<SimulatedMedia>>,
    /// Host side of the media element, used to drive the playback clock.
    media: SimulatedMedia,
    entry: TextEntry,
    entry_handle: HandleCell<TextEntryHandle>,
    dialog: Dialog,
    tooltip: Tooltip,
    settings_open: State<bool>,
    video_url: State<String>,
    info: State<String>,
    render_count: MutRef<u64>,
    settings_button: ElementId,
    info_button: ElementId,
    info_icon: ElementId,
    info_label: ElementId,
}

fn button(
    doc: &mut Document,
    parent: ElementId,
    label: &str,
    bounds: Rect,
    on_click: impl Fn(&mut Document) + 'static,
) -> ElementId {
    let el = doc.create_element("button");
    doc.set_text(el, label);
    doc.set_tab_index(el, Some(0));
    doc.append_child(parent, el);
    doc.set_bounds(el, bounds);
    doc.add_listener(
        el,
        EventKind::Click,
        Rc::new(move |doc: &mut Document, _: &Dispatch<ElementId>, _: &Event| {
            on_click(doc);
            Outcome::Continue
        }),
    );
    el
}

impl App {
    fn mount(doc: &mut Document, surface: OverlaySurface) -> Self {
        let root = doc.root();
        let app = doc.create_element("div");
        doc.set_attribute(app, "class", "app");
        doc.append_child(root, app);

        let settings_open = State::new(false);
        let video_url = State::new(String::from(DEFAULT_URL));
        let info = State::new(String::new());

        let media = SimulatedMedia::new();
        let player_handle = HandleCell::new();
        let player = Player::mount(
            doc,
            app,
            MediaProps::new(DEFAULT_URL).with_class("demo-player"),
            media.clone(),
            &player_handle,
        );
        doc.set_bounds(player.video(), Rect::new(0.0, 0.0, 640.0, 360.0));
        let bar = player.controls().parts().progress_bar;
        doc.set_bounds(bar, Rect::new(40.0, 370.0, 600.0, 378.0));

        let entry_handle = HandleCell::new();
        let set_url = video_url.setter();
        let entry = TextEntry::mount(
            doc,
            app,
            TextEntryProps::new("Enter video URL...")
                .with_on_submit(move |_, value| set_url.set(String::from(value))),
            &entry_handle,
        );

        let cell = entry_handle.clone();
        button(doc, app, "Focus Input", Rect::new(0.0, 420.0, 100.0, 440.0), move |doc| {
            cell.with(|h| h.focus(doc));
        });
        let cell = entry_handle.clone();
        button(doc, app, "Clear Input", Rect::new(110.0, 420.0, 210.0, 440.0), move |doc| {
            cell.with(|h| h.clear(doc));
        });

        let set_info = info.setter();
        let cell = player_handle.clone();
        let info_button = button(
            doc,
            app,
            "Get Player Info",
            Rect::new(220.0, 420.0, 340.0, 440.0),
            move |doc| {
                let time = cell.call_or_default(|h| h.current_time());
                let dims = cell.with(|h| h.dimensions(doc)).flatten();
                let text = match dims {
                    Some(d) => format!(
                        "Current time: {time:.2}s, video {}x{} shown at {}x{}",
                        d.native.width, d.native.height, d.rendered.width, d.rendered.height
                    ),
                    None => format!("Current time: {time:.2}s"),
                };
                set_info.set(text);
            },
        );

        let set_open = settings_open.setter();
        let settings_button = button(
            doc,
            app,
            "Open Settings",
            Rect::new(350.0, 420.0, 460.0, 440.0),
            move |_| set_open.set(true),
        );

        let info_icon = doc.create_element("span");
        doc.set_text(info_icon, "\u{2139}");
        doc.append_child(app, info_icon);
        doc.set_bounds(info_icon, Rect::new(470.0, 420.0, 490.0, 440.0));
        let tooltip = Tooltip::mount(
            doc,
            surface,
            info_icon,
            "This video player demonstrates imperative handles and overlays",
            TooltipConfig::default(),
        );

        let info_label = doc.create_element("p");
        doc.append_child(app, info_label);

        let set_closed = settings_open.setter();
        let dialog = Dialog::new(
            surface,
            DialogProps::new("Video Settings").with_on_close(move |_| set_closed.set(false)),
        );

        Self {
            player,
            player_handle,
            media,
            entry,
            entry_handle,
            dialog,
            tooltip,
            settings_open,
            video_url,
            info,
            render_count: MutRef::new(0),
            settings_button,
            info_button,
            info_icon,
            info_label,
        }
    }

    fn render(&mut self, doc: &mut Document) {
        self.render_count.with_mut(|n| *n += 1);
        self.settings_open.flush();
        self.video_url.flush();
        self.info.flush();

        let url = self.video_url.get();
        if url != self.player.src() {
            self.player.set_source(doc, url);
        }

        self.dialog.set_open(doc, self.settings_open.get());
        if let Some(body) = self.dialog.body()
            && doc.children_of(body).is_empty()
        {
            self.fill_settings(doc, body);
        }

        doc.set_text(self.info_label, self.info.get());
        self.player.render(doc);
    }

    fn fill_settings(&self, doc: &mut Document, body: ElementId) {
        let text = doc.create_element("p");
        doc.set_text(text, "Playback speed");
        doc.append_child(body, text);
        let cell = self.player_handle.clone();
        button(doc, body, "1.5x", Rect::new(300.0, 200.0, 340.0, 220.0), move |_| {
            cell.with(|h| h.set_playback_rate(1.5));
        });
    }

    /// Forward element notifications, then render.
    fn settle(&mut self, doc: &mut Document) {
        self.player.pump(doc);
        self.render(doc);
    }

    fn print_player(&self, doc: &Document, step: &str) {
        let state = self.player.state();
        println!(
            "[{step}] playing={} progress={:.1}% volume={:.1} watched={}ms fullscreen={}",
            state.is_playing,
            state.progress_percent,
            state.volume,
            self.player.watched_ms(),
            doc.fullscreen_element().is_some(),
        );
    }

    fn unmount(self, doc: &mut Document) {
        self.dialog.unmount(doc);
        self.tooltip.unmount(doc);
        self.entry.unmount(doc);
        self.player.unmount(doc);
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut doc = Document::new();
    // The surface must exist before any overlay widget renders.
    let surface = OverlaySurface::install(&mut doc);
    let mut app = App::mount(&mut doc, surface);
    app.media.load_metadata(596.0, Size::new(1280.0, 720.0));
    app.render(&mut doc);

    println!("== Playback through the controls ==");
    let controls = app.player.controls().parts();
    doc.click(controls.play_button, Point::ZERO);
    for _ in 0..3 {
        app.media.tick(1.0);
        doc.advance(1_000);
        app.settle(&mut doc);
    }
    app.print_player(&doc, "after 3s");

    doc.click(controls.progress_bar, Point::new(320.0, 374.0));
    app.settle(&mut doc);
    app.print_player(&doc, "scrubbed to middle");

    doc.focus(controls.progress_bar);
    doc.key_down(Key::ArrowRight);
    app.settle(&mut doc);
    app.print_player(&doc, "arrow right");

    doc.click(controls.mute_button, Point::ZERO);
    app.settle(&mut doc);
    app.print_player(&doc, "muted");
    doc.click(controls.mute_button, Point::ZERO);
    app.settle(&mut doc);
    app.print_player(&doc, "unmuted");

    doc.click(controls.fullscreen_button, Point::ZERO);
    app.print_player(&doc, "fullscreen");
    doc.exit_fullscreen();

    println!("\n== Tooltip ==");
    doc.pointer_enter(app.info_icon);
    if let Some(p) = app.tooltip.position() {
        println!("tip anchored at ({:.1}, {:.1})", p.x, p.y);
    }
    doc.pointer_leave(app.info_icon);
    println!("tip visible after leave: {}", app.tooltip.is_visible());

    println!("\n== Settings dialog ==");
    doc.focus(app.settings_button);
    doc.click(app.settings_button, Point::ZERO);
    app.render(&mut doc);
    println!(
        "open={} focus on content={}",
        app.dialog.is_open(),
        doc.active_element() == app.dialog.parts().map(|p| p.content)
    );
    if let Some(body) = app.dialog.body()
        && let Some(&speed) = doc.children_of(body).last()
    {
        doc.click(speed, Point::ZERO);
        println!(
            "playback rate now {}",
            app.player_handle.call_or_default(|h| h.playback_rate())
        );
    }
    doc.key_down(Key::Escape);
    app.render(&mut doc);
    println!(
        "open={} focus back on settings button={}",
        app.dialog.is_open(),
        doc.active_element() == Some(app.settings_button)
    );

    println!("\n== Player info ==");
    doc.click(app.info_button, Point::ZERO);
    app.render(&mut doc);
    println!("{}", doc.text(app.info_label));

    println!("\n== Swap source from the text entry ==");
    app.entry_handle.with(|h| h.focus(&mut doc));
    doc.input(app.entry.input(), "https://example.com/trailer.mp4");
    doc.key_down(Key::Enter);
    app.entry_handle.with(|h| h.clear(&mut doc));
    app.settle(&mut doc);
    println!("source: {}", app.player.src());
    app.print_player(&doc, "new source");

    println!("\nroot renders: {}", app.render_count.get());

    app.unmount(&mut doc);
    println!(
        "after unmount: {} element listeners, {} global listeners, {} intervals",
        doc.element_listener_count(),
        doc.global_listener_count(),
        doc.interval_count()
    );
}
