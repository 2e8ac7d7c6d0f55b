//! Playback controller - core orchestration
//!
//! Translates user intents and element notifications into [`PlaybackState`]
//! transitions, and issues the matching commands to the media element.

use crate::{
    controls::ControlsVisibility,
    element::{FullscreenHost, MediaElement},
    error::{PlaybackError, Result},
    events::{MediaEvent, PlayerEvent},
    types::{format_timestamp, PlaybackState, PlayerConfig},
    volume::Volume,
};
use std::time::Duration;
use tracing::{debug, warn};

/// Callback invoked when playback reaches the end
pub type EndedListener = Box<dyn FnMut()>;

/// Controller for a single media element
///
/// Owns the transport state (play/pause, position, volume, fullscreen) and
/// the control-overlay visibility. `is_playing` and `is_fullscreen` are only
/// ever set from environment notifications, never from the request that
/// preceded them, so a refused request cannot desync the UI.
pub struct PlaybackController<E, F> {
    element: E,
    fullscreen: F,
    source: String,

    // Transport
    is_playing: bool,
    position_seconds: f64,
    duration_seconds: f64,
    // Set by `Ended`, cleared when playback moves again
    ended: bool,
    volume: Volume,

    // UI-only
    is_fullscreen: bool,
    is_buffering: bool,
    controls: ControlsVisibility,

    config: PlayerConfig,
    mounted: bool,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
    on_ended: Option<EndedListener>,
}

impl<E: MediaElement, F: FullscreenHost> PlaybackController<E, F> {
    /// Mount a controller on `element` playing `source`
    ///
    /// Applies the configured initial volume to the element.
    pub fn new(source: impl Into<String>, mut element: E, fullscreen: F, config: PlayerConfig) -> Self {
        let volume = Volume::new(config.initial_volume, config.unmute_fallback_volume);
        element.set_volume(volume.level());
        element.set_muted(volume.is_muted());

        let source = source.into();
        debug!(source = %source, "Player mounted");

        Self {
            is_fullscreen: fullscreen.is_fullscreen(),
            element,
            fullscreen,
            source,
            is_playing: false,
            position_seconds: 0.0,
            duration_seconds: 0.0,
            ended: false,
            volume,
            is_buffering: false,
            controls: ControlsVisibility::new(config.hide_controls_after()),
            config,
            mounted: true,
            pending_events: Vec::new(),
            on_ended: None,
        }
    }

    // ===== Transport =====

    /// Request play if paused, pause if playing
    ///
    /// Only the command is issued here. `is_playing` changes when the element
    /// reports `Play`/`Pause`.
    pub fn toggle_play(&mut self) -> Result<()> {
        self.ensure_mounted()?;

        if self.is_playing {
            self.element.pause();
            Ok(())
        } else {
            self.element.play().inspect_err(|e| {
                warn!(source = %self.source, error = %e, "Play request refused");
            })
        }
    }

    /// Seek to a percentage (0-100) of the duration
    ///
    /// The input is a completed slider gesture, so position and progress are
    /// updated immediately rather than waiting for the next time update.
    pub fn seek(&mut self, percent: f64) -> Result<()> {
        self.ensure_mounted()?;

        if self.duration_seconds <= 0.0 {
            return Err(PlaybackError::MetadataNotLoaded);
        }

        let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
        let target = percent / 100.0 * self.duration_seconds;

        self.element.set_current_time(target);
        self.position_seconds = target;
        self.ended = false;
        self.emit_position_changed();
        Ok(())
    }

    /// Move the position by `delta_seconds` (negative rewinds)
    ///
    /// No clamping here; the element clamps to `[0, duration]`.
    pub fn skip(&mut self, delta_seconds: f64) -> Result<()> {
        self.ensure_mounted()?;

        let target = self.element.current_time() + delta_seconds;
        self.element.set_current_time(target);
        self.ended = false;
        Ok(())
    }

    /// Skip forward by the configured step
    pub fn skip_forward(&mut self) -> Result<()> {
        self.skip(self.config.skip_seconds)
    }

    /// Skip backward by the configured step
    pub fn skip_backward(&mut self) -> Result<()> {
        self.skip(-self.config.skip_seconds)
    }

    // ===== Volume =====

    /// Set volume from a slider percentage (0-100)
    ///
    /// 0 mutes, anything else unmutes.
    pub fn set_volume(&mut self, percent: f64) -> Result<()> {
        self.ensure_mounted()?;

        self.volume.set_percent(percent);
        self.apply_volume();
        Ok(())
    }

    /// Toggle mute
    ///
    /// Unmuting at a stored volume of 0 restores the configured fallback.
    pub fn toggle_mute(&mut self) -> Result<()> {
        self.ensure_mounted()?;

        self.volume.toggle_mute();
        self.apply_volume();
        Ok(())
    }

    // ===== Fullscreen =====

    /// Enter fullscreen if not fullscreen, else leave
    ///
    /// `is_fullscreen` changes only when the environment reports a
    /// fullscreen change. A refusal is logged and leaves state untouched.
    pub fn toggle_fullscreen(&mut self) -> Result<()> {
        self.ensure_mounted()?;

        let result = if self.fullscreen.is_fullscreen() {
            self.fullscreen.exit_fullscreen()
        } else {
            self.fullscreen.request_fullscreen()
        };

        result.inspect_err(|e| warn!(error = %e, "Fullscreen request refused"))
    }

    // ===== Controls =====

    /// Pointer moved or clicked inside the player
    pub fn pointer_activity(&mut self, now: Duration) {
        if !self.mounted {
            return;
        }

        if self.controls.on_activity(now, self.is_playing) {
            self.emit_controls_changed();
        }
    }

    /// Advance the hide timer; the host calls this when the armed deadline elapses
    pub fn tick(&mut self, now: Duration) {
        if self.controls.tick(now) {
            debug!("Controls hidden after inactivity");
            self.emit_controls_changed();
        }
    }

    /// Deadline the host should schedule a [`tick`](Self::tick) for
    pub fn next_hide_deadline(&self) -> Option<Duration> {
        self.controls.pending_deadline()
    }

    // ===== Environment notifications =====

    /// Dispatch a notification from the element or the environment
    ///
    /// Notifications arriving after [`unmount`](Self::unmount) are ignored.
    pub fn handle_event(&mut self, event: MediaEvent) {
        if !self.mounted {
            debug!(?event, "Ignoring event after unmount");
            return;
        }

        match event {
            MediaEvent::LoadedMetadata { duration } => self.on_loaded_metadata(duration),
            MediaEvent::TimeUpdate { current_time } => self.on_time_update(current_time),
            MediaEvent::Play => self.set_playing(true),
            MediaEvent::Pause => self.set_playing(false),
            MediaEvent::Waiting => self.set_buffering(true),
            MediaEvent::Playing => {
                self.set_buffering(false);
                self.set_playing(true);
            }
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::FullscreenChange { is_fullscreen } => {
                if self.is_fullscreen != is_fullscreen {
                    self.is_fullscreen = is_fullscreen;
                    self.pending_events
                        .push(PlayerEvent::FullscreenChanged { is_fullscreen });
                }
            }
        }
    }

    fn on_loaded_metadata(&mut self, duration: f64) {
        // Live streams report an infinite duration
        self.duration_seconds = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        self.ended = false;
        debug!(source = %self.source, duration = self.duration_seconds, "Metadata loaded");
        self.pending_events.push(PlayerEvent::DurationChanged {
            duration_seconds: self.duration_seconds,
        });
    }

    fn on_time_update(&mut self, current_time: f64) {
        let mut position = if current_time.is_finite() { current_time.max(0.0) } else { 0.0 };
        if self.duration_seconds > 0.0 {
            position = position.min(self.duration_seconds);
        }
        self.position_seconds = position;
        self.emit_position_changed();
    }

    fn on_ended(&mut self) {
        self.set_playing(false);
        self.ended = true;
        if self.duration_seconds > 0.0 {
            self.position_seconds = self.duration_seconds;
        }
        self.emit_position_changed();
        self.pending_events.push(PlayerEvent::Ended);

        if let Some(listener) = self.on_ended.as_mut() {
            listener();
        }
    }

    fn set_playing(&mut self, is_playing: bool) {
        if self.is_playing == is_playing {
            return;
        }

        self.is_playing = is_playing;
        if is_playing {
            self.ended = false;
        }
        self.pending_events.push(PlayerEvent::StateChanged { is_playing });

        // Paused content always shows controls
        if !is_playing && self.controls.on_playback_stopped() {
            self.emit_controls_changed();
        }
    }

    fn set_buffering(&mut self, is_buffering: bool) {
        if self.is_buffering != is_buffering {
            self.is_buffering = is_buffering;
            self.pending_events
                .push(PlayerEvent::BufferingChanged { is_buffering });
        }
    }

    // ===== Lifecycle =====

    /// Register the "ended" collaborator
    pub fn set_on_ended(&mut self, listener: EndedListener) {
        self.on_ended = Some(listener);
    }

    /// Tear down: cancel the hide timer and drop listeners
    ///
    /// Later commands fail with [`PlaybackError::Unmounted`] and later
    /// notifications are ignored.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.controls.cancel();
        self.on_ended = None;
        self.pending_events.clear();
        debug!(source = %self.source, "Player unmounted");
    }

    /// Whether the controller is still mounted
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn ensure_mounted(&self) -> Result<()> {
        if self.mounted {
            Ok(())
        } else {
            Err(PlaybackError::Unmounted)
        }
    }

    // ===== State =====

    /// Snapshot of the current state
    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            is_playing: self.is_playing,
            position_seconds: self.position_seconds,
            duration_seconds: self.duration_seconds,
            progress_percent: self.progress_percent(),
            volume: self.volume.level(),
            is_muted: self.volume.is_muted(),
            is_fullscreen: self.is_fullscreen,
            controls_visible: self.controls.is_visible(),
            is_buffering: self.is_buffering,
        }
    }

    /// Media source URI
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position_seconds(&self) -> f64 {
        self.position_seconds
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Position as a percentage of duration, clamped to 0-100
    ///
    /// `None` until the duration is known, except that a finished video
    /// always reports 100.
    pub fn progress_percent(&self) -> Option<f64> {
        if self.ended {
            Some(100.0)
        } else if self.duration_seconds > 0.0 {
            Some((self.position_seconds / self.duration_seconds * 100.0).clamp(0.0, 100.0))
        } else {
            None
        }
    }

    /// Stored volume (0.0-1.0)
    pub fn volume(&self) -> f64 {
        self.volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Value the volume slider should show
    pub fn volume_display_percent(&self) -> f64 {
        self.volume.display_percent()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn is_buffering(&self) -> bool {
        self.is_buffering
    }

    /// Whether the auto-hide timer has not hidden the controls
    pub fn controls_visible(&self) -> bool {
        self.controls.is_visible()
    }

    /// Whether the overlay should be drawn (always while paused)
    pub fn controls_shown(&self) -> bool {
        self.controls.is_visible() || !self.is_playing
    }

    /// `m:ss / m:ss` label for the time display
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_timestamp(self.position_seconds),
            format_timestamp(self.duration_seconds)
        )
    }

    /// Underlying element
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Underlying fullscreen host
    pub fn fullscreen_host(&self) -> &F {
        &self.fullscreen
    }

    // ===== Events =====

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check for pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn apply_volume(&mut self) {
        self.element.set_volume(self.volume.level());
        self.element.set_muted(self.volume.is_muted());
        self.pending_events.push(PlayerEvent::VolumeChanged {
            volume: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    fn emit_position_changed(&mut self) {
        self.pending_events.push(PlayerEvent::PositionChanged {
            position_seconds: self.position_seconds,
            progress_percent: self.progress_percent(),
        });
    }

    fn emit_controls_changed(&mut self) {
        self.pending_events.push(PlayerEvent::ControlsVisibilityChanged {
            visible: self.controls.is_visible(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct NullElement {
        time: f64,
    }

    impl MediaElement for NullElement {
        fn play(&mut self) -> Result<()> {
            Ok(())
        }
        fn pause(&mut self) {}
        fn current_time(&self) -> f64 {
            self.time
        }
        fn set_current_time(&mut self, seconds: f64) {
            self.time = seconds;
        }
        fn set_volume(&mut self, _volume: f64) {}
        fn set_muted(&mut self, _muted: bool) {}
    }

    struct NoFullscreen;

    impl FullscreenHost for NoFullscreen {
        fn is_fullscreen(&self) -> bool {
            false
        }
        fn request_fullscreen(&mut self) -> Result<()> {
            Err(PlaybackError::environment("not allowed"))
        }
        fn exit_fullscreen(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn controller() -> PlaybackController<NullElement, NoFullscreen> {
        PlaybackController::new(
            "blob:video",
            NullElement::default(),
            NoFullscreen,
            PlayerConfig::default(),
        )
    }

    #[test]
    fn create_controller() {
        let player = controller();
        let state = player.state();

        assert!(!state.is_playing);
        assert_eq!(state.duration_seconds, 0.0);
        assert_eq!(state.progress_percent, None);
        assert_eq!(state.volume, 1.0);
        assert!(!state.is_muted);
        assert!(state.controls_visible);
        assert_eq!(player.source(), "blob:video");
    }

    #[test]
    fn seek_requires_metadata() {
        let mut player = controller();
        assert!(matches!(player.seek(50.0), Err(PlaybackError::MetadataNotLoaded)));
    }

    #[test]
    fn ended_reports_full_progress() {
        let mut player = controller();
        player.handle_event(MediaEvent::LoadedMetadata { duration: 120.0 });
        player.handle_event(MediaEvent::Play);
        player.handle_event(MediaEvent::TimeUpdate { current_time: 119.5 });
        player.handle_event(MediaEvent::Ended);

        assert!(!player.is_playing());
        assert_eq!(player.progress_percent(), Some(100.0));
        assert!(player.drain_events().contains(&PlayerEvent::Ended));
    }

    #[test]
    fn ended_without_duration_reports_full_progress() {
        let mut player = controller();
        player.handle_event(MediaEvent::Play);
        player.handle_event(MediaEvent::Ended);
        assert_eq!(player.duration_seconds(), 0.0);
        assert_eq!(player.progress_percent(), Some(100.0));
        assert!(player.drain_events().contains(&PlayerEvent::PositionChanged {
            position_seconds: 0.0,
            progress_percent: Some(100.0),
        }));

        // Replaying clears the finished state
        player.handle_event(MediaEvent::Play);
        assert_eq!(player.progress_percent(), None);
    }

    #[test]
    fn infinite_duration_is_unknown() {
        let mut player = controller();
        player.handle_event(MediaEvent::LoadedMetadata { duration: f64::INFINITY });
        assert_eq!(player.duration_seconds(), 0.0);
        assert_eq!(player.progress_percent(), None);
    }

    #[test]
    fn refused_fullscreen_keeps_state() {
        let mut player = controller();
        assert!(player.toggle_fullscreen().is_err());
        assert!(!player.is_fullscreen());
    }

    #[test]
    fn time_label_formats_both_sides() {
        let mut player = controller();
        player.handle_event(MediaEvent::LoadedMetadata { duration: 186.0 });
        player.handle_event(MediaEvent::TimeUpdate { current_time: 65.2 });
        assert_eq!(player.time_label(), "1:05 / 3:06");
    }
}
