// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The media player widget and its imperative handle.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;

use kurbo::Size;
use proscenium_dom::{Document, ElementId};
use proscenium_handle::{Deps, HandleCell, MutRef, Setter, State, Stopwatch};

use crate::controls::{
    ControlCallback, Controls, ControlsCallbacks, ControlsProps, ValueCallback, sanitize_percent,
};
use crate::error::MediaError;
use crate::native::{MediaEvent, NativeMedia};

/// Player settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MediaConfig {
    /// Percentage points one arrow key moves the scrubber.
    pub seek_step: f64,
    /// Volume restored by unmuting when no earlier level was remembered.
    pub fallback_volume: f64,
    /// Volume applied to the element at mount.
    pub initial_volume: f64,
    /// Refresh period of the watch-time stopwatch.
    pub stopwatch_tick_ms: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            seek_step: 5.0,
            fallback_volume: 1.0,
            initial_volume: 1.0,
            stopwatch_tick_ms: 10,
        }
    }
}

impl MediaConfig {
    /// Use a different keyboard seek step.
    pub fn with_seek_step(mut self, step: f64) -> Self {
        self.seek_step = step;
        self
    }

    /// Use a different unmute fallback.
    pub fn with_fallback_volume(mut self, volume: f64) -> Self {
        self.fallback_volume = volume;
        self
    }

    /// Use a different starting volume.
    pub fn with_initial_volume(mut self, volume: f64) -> Self {
        self.initial_volume = volume;
        self
    }

    /// Use a different stopwatch period.
    pub fn with_stopwatch_tick_ms(mut self, tick_ms: u64) -> Self {
        self.stopwatch_tick_ms = tick_ms;
        self
    }
}

/// What the player shows. Changes only through [`MediaPlayer::render`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaybackState {
    /// Whether the element last reported (or was told) to play.
    pub is_playing: bool,
    /// Position in percent of the duration, in `[0, 100]`.
    pub progress_percent: f64,
    /// Output volume in `[0, 1]`.
    pub volume: f64,
}

/// Properties the owner passes at mount.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaProps {
    /// Media source URL.
    pub src: String,
    /// Extra class for the player's container.
    pub class: Option<String>,
}

impl MediaProps {
    /// Props for `src` with no extra class.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            class: None,
        }
    }

    /// Add a class to the container.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

/// Sizes reported by [`MediaHandle::dimensions`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Dimensions {
    /// Decoded frame size.
    pub native: Size,
    /// Size the element is laid out at.
    pub rendered: Size,
}

/// State shared by the player, its handle, and its control callbacks.
struct Core<M> {
    native: MutRef<Option<M>>,
    last_volume: MutRef<f64>,
    playback_rate: MutRef<f64>,
    set_state: Setter<PlaybackState>,
    config: MediaConfig,
    video: ElementId,
}

impl<M> Clone for Core<M> {
    fn clone(&self) -> Self {
        Self {
            native: self.native.clone(),
            last_volume: self.last_volume.clone(),
            playback_rate: self.playback_rate.clone(),
            set_state: self.set_state.clone(),
            config: self.config,
            video: self.video,
        }
    }
}

impl<M: NativeMedia + 'static> Core<M> {
    fn native<R>(&self, f: impl FnOnce(&M) -> R) -> Result<R, MediaError> {
        self.native
            .with(|n| n.as_ref().map(f))
            .ok_or(MediaError::NotReady)
    }

    fn native_mut<R>(&self, f: impl FnOnce(&mut M) -> R) -> Result<R, MediaError> {
        self.native
            .with_mut(|n| n.as_mut().map(f))
            .ok_or(MediaError::NotReady)
    }

    fn play(&self) -> Result<(), MediaError> {
        self.native_mut(M::play)?;
        self.set_state.update(|s| s.is_playing = true);
        Ok(())
    }

    fn pause(&self) -> Result<(), MediaError> {
        self.native_mut(M::pause)?;
        self.set_state.update(|s| s.is_playing = false);
        Ok(())
    }

    fn seek(&self, percent: f64) -> Result<(), MediaError> {
        let duration = self.native(M::duration)?;
        if !(duration.is_finite() && duration > 0.0) {
            return Err(MediaError::UnknownDuration);
        }
        let seconds = sanitize_percent(percent) / 100.0 * duration;
        self.native_mut(|m| m.set_current_time(seconds))
    }

    fn set_volume(&self, volume: f64) -> Result<(), MediaError> {
        if volume.is_nan() {
            tracing::trace!("NaN volume ignored");
            return Ok(());
        }
        let volume = volume.clamp(0.0, 1.0);
        self.native_mut(|m| m.set_volume(volume))?;
        self.set_state.update(move |s| s.volume = volume);
        Ok(())
    }

    fn toggle_mute(&self) -> Result<f64, MediaError> {
        let current = self.native(M::volume)?;
        let next = if current > 0.0 {
            self.last_volume.set(current);
            0.0
        } else {
            let cached = self.last_volume.get();
            if cached.is_finite() && cached > 0.0 {
                cached.min(1.0)
            } else {
                self.config.fallback_volume
            }
        };
        self.set_volume(next)?;
        Ok(next)
    }

    fn set_playback_rate(&self, rate: f64) -> Result<(), MediaError> {
        if !(rate.is_finite() && rate > 0.0) {
            tracing::debug!(rate, "playback rate ignored");
            return Ok(());
        }
        self.native_mut(|m| m.set_playback_rate(rate))?;
        self.playback_rate.set(rate);
        Ok(())
    }

    fn dimensions(&self, doc: &Document) -> Result<Dimensions, MediaError> {
        let native = self.native(M::intrinsic_size)?;
        let rendered = doc.bounding_client_rect(self.video).size();
        Ok(Dimensions { native, rendered })
    }
}

fn report<T: Default>(result: Result<T, MediaError>, op: &'static str) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(%err, op, "media command ignored");
            T::default()
        }
    }
}

/// The player's command surface for its owner.
///
/// Obtained through the [`HandleCell`] passed to [`MediaPlayer::mount`]. Every
/// method reads the player's refs at call time. Once the player unmounts, the
/// methods do nothing and queries return zero values.
pub struct MediaHandle<M: NativeMedia + 'static> {
    core: Core<M>,
    is_playing: bool,
}

impl<M: NativeMedia + 'static> MediaHandle<M> {
    /// Start playback.
    pub fn play(&self) {
        report(self.core.play(), "play");
    }

    /// Pause playback.
    pub fn pause(&self) {
        report(self.core.pause(), "pause");
    }

    /// Pause if playing, play otherwise, judged by the render state this
    /// handle was built from.
    pub fn toggle_play(&self) {
        if self.is_playing { self.pause() } else { self.play() }
    }

    /// The `is_playing` value this handle was built from.
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Playback position in seconds; 0 once unmounted.
    pub fn current_time(&self) -> f64 {
        report(self.try_current_time(), "current_time")
    }

    /// Playback position in seconds.
    pub fn try_current_time(&self) -> Result<f64, MediaError> {
        self.core.native(M::current_time)
    }

    /// Jump to `seconds`. Progress updates when the element reports it.
    pub fn set_current_time(&self, seconds: f64) {
        report(
            self.core.native_mut(|m| m.set_current_time(seconds)),
            "set_current_time",
        );
    }

    /// Decoded and laid-out sizes of the video.
    pub fn dimensions(&self, doc: &Document) -> Option<Dimensions> {
        match self.core.dimensions(doc) {
            Ok(d) => Some(d),
            Err(err) => {
                tracing::debug!(%err, "dimensions unavailable");
                None
            }
        }
    }

    /// Present the video element fullscreen.
    pub fn enter_fullscreen(&self, doc: &mut Document) -> bool {
        doc.request_fullscreen(self.core.video)
    }

    /// Change playback speed. Does not re-render.
    pub fn set_playback_rate(&self, rate: f64) {
        report(self.core.set_playback_rate(rate), "set_playback_rate");
    }

    /// The last playback speed set through this player.
    pub fn playback_rate(&self) -> f64 {
        self.core.playback_rate.get()
    }

    /// Scoped read access to the media element.
    pub fn with_native<R>(&self, f: impl FnOnce(&M) -> R) -> Option<R> {
        self.core.native(f).ok()
    }
}

impl<M: NativeMedia + 'static> core::fmt::Debug for MediaHandle<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MediaHandle")
            .field("is_playing", &self.is_playing)
            .field("mounted", &self.core.native.with(Option::is_some))
            .finish_non_exhaustive()
    }
}

/// A video element with playback controls.
///
/// The media element is kept in a [`MutRef`]: it persists across renders and
/// touching it never causes one. What the user sees lives in
/// [`PlaybackState`], queued by commands and element events and applied by
/// [`MediaPlayer::render`]. The owner reaches the player through a
/// [`MediaHandle`], rebuilt whenever `is_playing` changes.
///
/// ```
/// use kurbo::Size;
/// use proscenium_dom::Document;
/// use proscenium_handle::HandleCell;
/// use proscenium_media::sim::SimulatedMedia;
/// use proscenium_media::{MediaPlayer, MediaProps};
///
/// let mut doc = Document::new();
/// let media = SimulatedMedia::new();
/// let handle = HandleCell::new();
/// let root = doc.root();
/// let mut player = MediaPlayer::mount(
///     &mut doc,
///     root,
///     MediaProps::new("clip.mp4"),
///     media.clone(),
///     &handle,
/// );
/// media.load_metadata(60.0, Size::new(640.0, 360.0));
///
/// handle.with(|h| h.play());
/// media.tick(15.0);
/// player.pump(&mut doc);
/// player.render(&mut doc);
///
/// assert!(player.state().is_playing);
/// assert_eq!(player.state().progress_percent, 25.0);
/// ```
pub struct MediaPlayer<M: NativeMedia + 'static> {
    core: Core<M>,
    state: State<PlaybackState>,
    deps: Deps<bool>,
    handle: HandleCell<MediaHandle<M>>,
    stopwatch: Stopwatch,
    controls: Controls,
    container: ElementId,
    src: String,
}

impl<M: NativeMedia + 'static> MediaPlayer<M> {
    /// Mount under `parent` with default settings and fill `handle`.
    pub fn mount(
        doc: &mut Document,
        parent: ElementId,
        props: MediaProps,
        native: M,
        handle: &HandleCell<MediaHandle<M>>,
    ) -> Self {
        Self::mount_with_config(doc, parent, props, native, handle, MediaConfig::default())
    }

    /// Mount under `parent` and fill `handle`.
    pub fn mount_with_config(
        doc: &mut Document,
        parent: ElementId,
        props: MediaProps,
        mut native: M,
        handle: &HandleCell<MediaHandle<M>>,
        config: MediaConfig,
    ) -> Self {
        let container = doc.create_element("div");
        let class = match &props.class {
            Some(extra) => format!("video-player-container {extra}"),
            None => String::from("video-player-container"),
        };
        doc.set_attribute(container, "class", class);
        let video = doc.create_element("video");
        doc.set_attribute(video, "class", "video-element");
        doc.set_attribute(video, "src", props.src.as_str());
        doc.append_child(container, video);
        doc.append_child(parent, container);

        native.set_source(&props.src);
        let volume = if config.initial_volume.is_finite() {
            config.initial_volume.clamp(0.0, 1.0)
        } else {
            config.fallback_volume
        };
        native.set_volume(volume);
        let rate = native.playback_rate();
        let playing = !native.is_paused();
        let state = State::new(PlaybackState {
            is_playing: playing,
            progress_percent: 0.0,
            volume,
        });

        let core = Core {
            native: MutRef::new(Some(native)),
            last_volume: MutRef::new(volume),
            playback_rate: MutRef::new(rate),
            set_state: state.setter(),
            config,
            video,
        };
        let controls = Controls::mount(doc, container, control_callbacks(&core, handle), config.seek_step);

        let mut player = Self {
            core,
            state,
            deps: Deps::new(),
            handle: handle.clone(),
            stopwatch: Stopwatch::new(config.stopwatch_tick_ms),
            controls,
            container,
            src: props.src,
        };
        if playing {
            player.stopwatch.start(doc);
        }
        player.render(doc);
        tracing::debug!(src = %player.src, container = ?container, "media player mounted");
        player
    }

    /// Apply queued state, refresh the handle if its dependencies changed,
    /// and update the controls. Returns whether the state changed.
    pub fn render(&mut self, doc: &mut Document) -> bool {
        let changed = self.state.flush();
        let snapshot = self.state.get();
        let core = self.core.clone();
        let rebuilt = self.handle.expose(&mut self.deps, snapshot.is_playing, || MediaHandle {
            core,
            is_playing: snapshot.is_playing,
        });
        if rebuilt {
            tracing::trace!(is_playing = snapshot.is_playing, "media handle rebuilt");
        }
        self.controls.render(
            doc,
            &ControlsProps {
                is_playing: snapshot.is_playing,
                progress: snapshot.progress_percent,
                volume: snapshot.volume,
            },
        );
        changed
    }

    /// React to a notification from the media element.
    pub fn handle_media_event(&self, doc: &mut Document, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate => {
                let Ok((current, duration)) =
                    self.core.native(|m| (m.current_time(), m.duration()))
                else {
                    return;
                };
                if !(duration.is_finite() && duration > 0.0 && current.is_finite()) {
                    tracing::trace!(duration, current, "progress update skipped");
                    return;
                }
                let progress = sanitize_percent(current / duration * 100.0);
                self.core
                    .set_state
                    .update(move |s| s.progress_percent = progress);
            }
            MediaEvent::Play => {
                self.core.set_state.update(|s| s.is_playing = true);
                self.stopwatch.start(doc);
            }
            MediaEvent::Pause | MediaEvent::Ended => {
                self.core.set_state.update(|s| s.is_playing = false);
                self.stopwatch.pause(doc);
            }
        }
    }

    /// Forward every notification the element has queued. Returns how many
    /// were handled.
    pub fn pump(&self, doc: &mut Document) -> usize {
        let mut handled = 0;
        while let Some(event) = self.core.native_mut(M::poll_event).ok().flatten() {
            self.handle_media_event(doc, event);
            handled += 1;
        }
        handled
    }

    /// Start playback.
    pub fn play(&self) -> Result<(), MediaError> {
        self.core.play()
    }

    /// Pause playback.
    pub fn pause(&self) -> Result<(), MediaError> {
        self.core.pause()
    }

    /// Jump to `percent` of the duration.
    pub fn seek(&self, percent: f64) -> Result<(), MediaError> {
        self.core.seek(percent)
    }

    /// Set the volume, clamped to `[0, 1]`.
    pub fn set_volume(&self, volume: f64) -> Result<(), MediaError> {
        self.core.set_volume(volume)
    }

    /// Mute, or restore the volume from before muting. Returns the new volume.
    pub fn toggle_mute(&self) -> Result<f64, MediaError> {
        self.core.toggle_mute()
    }

    /// Load a different source. Playback stops and progress resets.
    pub fn set_source(&mut self, doc: &mut Document, src: impl Into<String>) {
        let src = src.into();
        if src == self.src {
            return;
        }
        report(self.core.native_mut(|m| m.set_source(&src)), "set_source");
        doc.set_attribute(self.core.video, "src", src.as_str());
        self.stopwatch.reset(doc);
        self.core.set_state.update(|s| {
            s.is_playing = false;
            s.progress_percent = 0.0;
        });
        tracing::debug!(src = %src, "media source changed");
        self.src = src;
    }

    /// The committed render state.
    pub fn state(&self) -> PlaybackState {
        self.state.get()
    }

    /// Milliseconds of document time spent playing this source.
    pub fn watched_ms(&self) -> u64 {
        self.stopwatch.elapsed_ms()
    }

    /// The current source.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// The player's outer element.
    pub fn container(&self) -> ElementId {
        self.container
    }

    /// The video element.
    pub fn video(&self) -> ElementId {
        self.core.video
    }

    /// The mounted controls.
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Tear down: stop the stopwatch, empty the handle, remove the elements,
    /// and give the media element back.
    pub fn unmount(self, doc: &mut Document) -> Option<M> {
        self.stopwatch.reset(doc);
        self.handle.clear();
        self.controls.unmount(doc);
        doc.remove(self.container);
        tracing::debug!(src = %self.src, "media player unmounted");
        self.core.native.take()
    }
}

impl<M: NativeMedia + 'static> core::fmt::Debug for MediaPlayer<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MediaPlayer")
            .field("src", &self.src)
            .field("state", &self.state.get())
            .field("handle", &self.handle)
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

fn control_callbacks<M: NativeMedia + 'static>(
    core: &Core<M>,
    handle: &HandleCell<MediaHandle<M>>,
) -> ControlsCallbacks {
    let cell = handle.clone();
    let on_play_pause: ControlCallback = Rc::new(move |_: &mut Document| {
        cell.with(|h| h.toggle_play());
    });

    let c = core.clone();
    let on_seek: ValueCallback =
        Rc::new(move |_: &mut Document, percent: f64| report(c.seek(percent), "seek"));

    let c = core.clone();
    let on_volume_change: ValueCallback =
        Rc::new(move |_: &mut Document, volume: f64| report(c.set_volume(volume), "set_volume"));

    let c = core.clone();
    let on_toggle_mute: ControlCallback = Rc::new(move |_: &mut Document| {
        report(c.toggle_mute(), "toggle_mute");
    });

    let cell = handle.clone();
    let on_enter_fullscreen: ControlCallback = Rc::new(move |doc: &mut Document| {
        cell.with(|h| h.enter_fullscreen(doc));
    });

    ControlsCallbacks {
        on_play_pause,
        on_seek,
        on_volume_change,
        on_toggle_mute,
        on_enter_fullscreen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedMedia;
    use alloc::vec::Vec;
    use kurbo::{Point, Rect};
    use proscenium_dom::Key;

    type Cell = HandleCell<MediaHandle<SimulatedMedia>>;

    struct Fixture {
        doc: Document,
        media: SimulatedMedia,
        cell: Cell,
        player: MediaPlayer<SimulatedMedia>,
    }

    fn mounted_with(config: MediaConfig) -> Fixture {
        let mut doc = Document::new();
        let root = doc.root();
        let media = SimulatedMedia::new();
        let cell = Cell::new();
        let player = MediaPlayer::mount_with_config(
            &mut doc,
            root,
            MediaProps::new("clip.mp4"),
            media.clone(),
            &cell,
            config,
        );
        media.load_metadata(120.0, Size::new(640.0, 360.0));
        Fixture {
            doc,
            media,
            cell,
            player,
        }
    }

    fn mounted() -> Fixture {
        mounted_with(MediaConfig::default())
    }

    impl Fixture {
        fn settle(&mut self) {
            self.player.pump(&mut self.doc);
            self.player.render(&mut self.doc);
        }
    }

    #[test]
    fn mount_fills_handle_and_builds_elements() {
        let f = mounted();
        assert!(f.cell.is_ready());
        assert_eq!(f.cell.generation(), 1);
        assert_eq!(f.doc.attribute(f.player.video(), "src"), Some("clip.mp4"));
        assert_eq!(f.media.source(), "clip.mp4");
        assert_eq!(
            f.doc.parent_of(f.player.controls().parts().container),
            Some(f.player.container())
        );
        assert!(!f.player.state().is_playing);
    }

    #[test]
    fn handle_play_and_toggle_mirror_native_state() {
        let mut f = mounted();
        f.cell.with(|h| h.play());
        f.settle();
        assert!(f.player.state().is_playing);
        assert!(!f.media.is_paused());
        assert_eq!(f.cell.with(|h| h.is_playing()), Some(true));
        assert_eq!(f.cell.generation(), 2);

        f.cell.with(|h| h.toggle_play());
        f.settle();
        assert!(!f.player.state().is_playing);
        assert!(f.media.is_paused());
    }

    #[test]
    fn native_transitions_update_state_whoever_drove_them() {
        let mut f = mounted();
        let mut host = f.media.clone();
        host.play();
        f.settle();
        assert!(f.player.state().is_playing);
        host.pause();
        f.settle();
        assert!(!f.player.state().is_playing);
    }

    #[test]
    fn play_pause_button_goes_through_the_handle() {
        let mut f = mounted();
        let button = f.player.controls().parts().play_button;
        f.doc.click(button, Point::ZERO);
        f.settle();
        assert!(f.player.state().is_playing);
        assert_eq!(f.doc.attribute(button, "aria-label"), Some("Pause"));
        f.doc.click(button, Point::ZERO);
        f.settle();
        assert!(!f.player.state().is_playing);
        assert_eq!(f.doc.attribute(button, "aria-label"), Some("Play"));
    }

    #[test]
    fn ended_stops_playing_and_the_stopwatch() {
        let mut f = mounted();
        f.player.play().unwrap();
        f.settle();
        assert_eq!(f.doc.interval_count(), 1);
        f.media.tick(500.0);
        f.settle();
        let state = f.player.state();
        assert!(!state.is_playing);
        assert_eq!(state.progress_percent, 100.0);
        assert_eq!(f.doc.interval_count(), 0);
    }

    #[test]
    fn set_current_time_reads_back() {
        let f = mounted();
        f.cell.with(|h| h.set_current_time(42.0));
        assert_eq!(f.cell.with(|h| h.current_time()), Some(42.0));
    }

    #[test]
    fn time_update_sets_progress() {
        let mut f = mounted();
        f.cell.with(|h| h.set_current_time(30.0));
        f.settle();
        assert_eq!(f.player.state().progress_percent, 25.0);
        let bar = f.player.controls().parts().progress_bar;
        assert_eq!(f.doc.attribute(bar, "aria-valuenow"), Some("25"));
    }

    #[test]
    fn unknown_duration_leaves_progress_alone() {
        let mut f = mounted();
        f.player.set_source(&mut f.doc, "live.m3u8");
        f.cell.with(|h| h.set_current_time(5.0));
        f.settle();
        assert_eq!(f.player.state().progress_percent, 0.0);
        assert_eq!(f.player.seek(50.0), Err(MediaError::UnknownDuration));
    }

    #[test]
    fn toggle_mute_restores_previous_volume() {
        let mut f = mounted();
        f.player.set_volume(0.7).unwrap();
        f.settle();
        assert_eq!(f.player.toggle_mute(), Ok(0.0));
        f.settle();
        assert_eq!(f.player.state().volume, 0.0);
        assert_eq!(f.media.volume(), 0.0);
        let mute = f.player.controls().parts().mute_button;
        assert_eq!(f.doc.attribute(mute, "aria-label"), Some("Unmute"));

        assert_eq!(f.player.toggle_mute(), Ok(0.7));
        f.settle();
        assert_eq!(f.player.state().volume, 0.7);
        assert_eq!(f.media.volume(), 0.7);
    }

    #[test]
    fn unmute_without_cached_level_uses_fallback() {
        let mut f = mounted_with(
            MediaConfig::default()
                .with_initial_volume(0.0)
                .with_fallback_volume(0.8),
        );
        assert_eq!(f.player.toggle_mute(), Ok(0.8));
        f.settle();
        assert_eq!(f.player.state().volume, 0.8);
    }

    #[test]
    fn volume_is_clamped() {
        let mut f = mounted();
        f.player.set_volume(3.0).unwrap();
        f.settle();
        assert_eq!(f.player.state().volume, 1.0);
        let slider = f.player.controls().parts().volume_slider;
        f.doc.input(slider, "0.3");
        f.settle();
        assert_eq!(f.media.volume(), 0.3);
    }

    #[test]
    fn scrubber_click_seeks_the_element() {
        let mut f = mounted();
        let bar = f.player.controls().parts().progress_bar;
        f.doc.set_bounds(bar, Rect::new(0.0, 0.0, 200.0, 10.0));
        f.doc.click(bar, Point::new(100.0, 5.0));
        assert_eq!(f.media.current_time(), 60.0);
        f.settle();
        assert_eq!(f.player.state().progress_percent, 50.0);
    }

    #[test]
    fn arrow_keys_on_the_scrubber_clamp_at_the_start() {
        let mut f = mounted();
        f.cell.with(|h| h.set_current_time(2.4));
        f.settle();
        let bar = f.player.controls().parts().progress_bar;
        f.doc.focus(bar);
        let outcome = f.doc.key_down(Key::ArrowLeft);
        assert!(outcome.default_prevented);
        assert_eq!(f.media.current_time(), 0.0);
    }

    #[test]
    fn dimensions_report_native_and_rendered_size() {
        let mut f = mounted();
        let video = f.player.video();
        f.doc.set_bounds(video, Rect::new(0.0, 0.0, 320.0, 180.0));
        let dims = f.cell.with(|h| h.dimensions(&f.doc)).flatten();
        assert_eq!(
            dims,
            Some(Dimensions {
                native: Size::new(640.0, 360.0),
                rendered: Size::new(320.0, 180.0),
            })
        );
    }

    #[test]
    fn fullscreen_button_presents_the_video() {
        let mut f = mounted();
        let button = f.player.controls().parts().fullscreen_button;
        f.doc.click(button, Point::ZERO);
        assert_eq!(f.doc.fullscreen_element(), Some(f.player.video()));
    }

    #[test]
    fn playback_rate_changes_without_rendering() {
        let mut f = mounted();
        let generation = f.cell.generation();
        f.cell.with(|h| h.set_playback_rate(1.5));
        f.cell.with(|h| h.set_playback_rate(f64::NAN));
        assert_eq!(f.media.playback_rate(), 1.5);
        assert_eq!(f.cell.with(|h| h.playback_rate()), Some(1.5));
        assert!(!f.player.render(&mut f.doc));
        assert_eq!(f.cell.generation(), generation);
    }

    #[test]
    fn with_native_exposes_the_element_read_only() {
        let f = mounted();
        let src = f.cell.with(|h| h.with_native(SimulatedMedia::source)).flatten();
        assert_eq!(src.as_deref(), Some("clip.mp4"));
    }

    #[test]
    fn watched_time_accumulates_only_while_playing() {
        let mut f = mounted();
        f.player.play().unwrap();
        f.settle();
        f.doc.advance(100);
        f.player.pause().unwrap();
        f.settle();
        f.doc.advance(50);
        assert_eq!(f.player.watched_ms(), 100);
        assert_eq!(f.doc.interval_count(), 0);
    }

    #[test]
    fn set_source_resets_playback() {
        let mut f = mounted();
        f.player.play().unwrap();
        f.settle();
        f.player.set_source(&mut f.doc, "other.mp4");
        f.settle();
        assert_eq!(f.media.source(), "other.mp4");
        assert_eq!(f.doc.attribute(f.player.video(), "src"), Some("other.mp4"));
        assert!(!f.player.state().is_playing);
        assert_eq!(f.player.watched_ms(), 0);
        assert_eq!(f.doc.interval_count(), 0);
    }

    #[test]
    fn unmount_clears_handle_listeners_and_interval() {
        let mut f = mounted();
        f.player.play().unwrap();
        f.settle();
        let stale = f.cell.get().unwrap();
        assert_eq!(f.doc.interval_count(), 1);

        let Fixture {
            mut doc,
            cell,
            player,
            ..
        } = f;
        let container = player.container();
        assert!(player.unmount(&mut doc).is_some());
        assert!(!cell.is_ready());
        assert_eq!(cell.with(|h| h.current_time()), None);
        assert_eq!(doc.interval_count(), 0);
        assert_eq!(doc.element_listener_count(), 0);
        assert!(!doc.is_alive(container));

        stale.play();
        assert_eq!(stale.current_time(), 0.0);
        assert_eq!(stale.dimensions(&doc), None);
    }

    #[test]
    fn dropped_player_stops_its_stopwatch() {
        let mut f = mounted();
        f.player.play().unwrap();
        f.settle();
        assert_eq!(f.doc.interval_count(), 1);
        let Fixture { mut doc, player, .. } = f;
        drop(player);
        doc.advance(100);
        assert_eq!(doc.interval_count(), 0);
    }

    #[test]
    fn already_playing_element_counts_watch_time_from_mount() {
        let mut doc = Document::new();
        let root = doc.root();
        let media = SimulatedMedia::new();
        media.set_autoplay(true);
        let cell = Cell::new();
        let player =
            MediaPlayer::mount(&mut doc, root, MediaProps::new("clip.mp4"), media, &cell);
        assert!(player.state().is_playing);
        doc.advance(100);
        assert_eq!(player.watched_ms(), 100);
        player.pump(&mut doc);
        doc.advance(50);
        assert_eq!(player.watched_ms(), 150);
        assert_eq!(doc.interval_count(), 1);
    }

    #[test]
    fn rendered_playing_flag_follows_native_state_for_every_sequence() {
        #[derive(Copy, Clone, Debug)]
        enum Call {
            Play,
            Pause,
            Toggle,
        }
        const CALLS: [Call; 3] = [Call::Play, Call::Pause, Call::Toggle];
        const LEN: u32 = 5;

        for settle_each in [true, false] {
            for mut n in 0..3_usize.pow(LEN) {
                let mut f = mounted();
                let mut seq = Vec::new();
                for _ in 0..LEN {
                    let call = CALLS[n % 3];
                    n /= 3;
                    seq.push(call);
                    match call {
                        Call::Play => f.cell.with(|h| h.play()),
                        Call::Pause => f.cell.with(|h| h.pause()),
                        Call::Toggle => f.cell.with(|h| h.toggle_play()),
                    };
                    if settle_each {
                        f.settle();
                        assert_eq!(
                            f.player.state().is_playing,
                            !f.media.is_paused(),
                            "{seq:?}"
                        );
                    }
                }
                f.settle();
                assert_eq!(
                    f.player.state().is_playing,
                    !f.media.is_paused(),
                    "{seq:?} settle_each={settle_each}"
                );
            }
        }
    }
}
