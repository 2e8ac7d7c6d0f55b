//! Property-based tests for the playback controller
//!
//! Uses proptest to verify invariants across many random inputs.

use proptest::prelude::*;
use std::time::Duration;
use vidshare_playback::{
    FullscreenHost, MediaElement, MediaEvent, PlaybackController, PlayerConfig, Result,
};

// ===== Helpers =====

#[derive(Default)]
struct Element {
    time: f64,
}

impl MediaElement for Element {
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

struct Screen;

impl FullscreenHost for Screen {
    fn is_fullscreen(&self) -> bool {
        false
    }
    fn request_fullscreen(&mut self) -> Result<()> {
        Ok(())
    }
    fn exit_fullscreen(&mut self) -> Result<()> {
        Ok(())
    }
}

fn player_with_duration(duration: f64) -> PlaybackController<Element, Screen> {
    let mut player =
        PlaybackController::new("blob:clip", Element::default(), Screen, PlayerConfig::default());
    player.handle_event(MediaEvent::LoadedMetadata { duration });
    player
}

// ===== Property Tests =====

proptest! {
    /// Property: seek(p) lands at p% of the duration
    #[test]
    fn seek_lands_at_fraction_of_duration(
        duration in 0.1f64..36_000.0,
        percent in 0.0f64..=100.0,
    ) {
        let mut player = player_with_duration(duration);
        player.seek(percent).unwrap();

        let expected = percent / 100.0 * duration;
        prop_assert!((player.position_seconds() - expected).abs() < 1e-6);
        prop_assert!((player.element().time - expected).abs() < 1e-6);
        prop_assert!(player.position_seconds() <= player.duration_seconds());
    }

    /// Property: progress stays within 0-100 for any time update
    #[test]
    fn progress_is_always_bounded(
        duration in 0.1f64..10_000.0,
        reported in -1_000.0f64..20_000.0,
    ) {
        let mut player = player_with_duration(duration);
        player.handle_event(MediaEvent::TimeUpdate { current_time: reported });

        let progress = player.progress_percent().unwrap();
        prop_assert!((0.0..=100.0).contains(&progress));
    }

    /// Property: mute state is exactly "volume is zero" after set_volume
    #[test]
    fn set_volume_ties_mute_to_zero(percent in 0.0f64..=100.0) {
        let mut player = player_with_duration(10.0);
        player.set_volume(percent).unwrap();

        prop_assert_eq!(player.is_muted(), player.volume() == 0.0);
        if percent == 0.0 {
            prop_assert!(player.is_muted());
        }
        prop_assert!((player.volume() - percent / 100.0).abs() < 1e-9);
    }

    /// Property: unmuting is never silent
    #[test]
    fn unmute_is_never_silent(percent in 0.0f64..=100.0, toggles in 1usize..6) {
        let mut player = player_with_duration(10.0);
        player.set_volume(percent).unwrap();

        for _ in 0..toggles {
            player.toggle_mute().unwrap();
            if !player.is_muted() {
                prop_assert!(player.volume() > 0.0);
            }
        }
    }

    /// Property: at most one hide deadline, always the latest activity + delay
    #[test]
    fn hide_deadline_tracks_latest_activity(
        mut moments in prop::collection::vec(0u64..100_000, 1..20),
    ) {
        moments.sort_unstable();
        let mut player = player_with_duration(60.0);
        player.handle_event(MediaEvent::Play);

        for ms in &moments {
            player.pointer_activity(Duration::from_millis(*ms));
        }

        let last = Duration::from_millis(*moments.last().unwrap());
        prop_assert_eq!(player.next_hide_deadline(), Some(last + Duration::from_secs(3)));
    }
}
