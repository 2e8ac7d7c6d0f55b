//! Core types for playback control

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Snapshot of a player's transport and UI state
///
/// Produced by [`PlaybackController::state`](crate::PlaybackController::state);
/// only the controller mutates the underlying fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// Set from the element's play/pause/ended notifications only
    pub is_playing: bool,

    /// Current position in seconds
    pub position_seconds: f64,

    /// Total length in seconds (0 until metadata loads)
    pub duration_seconds: f64,

    /// `position / duration * 100`, absent while duration is unknown
    pub progress_percent: Option<f64>,

    /// Stored volume in `[0, 1]`, kept while muted
    pub volume: f64,

    /// Whether audible output is suppressed
    pub is_muted: bool,

    /// Mirrors the environment's fullscreen notifications
    pub is_fullscreen: bool,

    /// Whether the auto-hide timer has not yet hidden the controls
    pub controls_visible: bool,

    /// Element is waiting for data
    pub is_buffering: bool,
}

/// Configuration for a playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Volume applied on mount, in `[0, 1]` (default: 1.0)
    pub initial_volume: f64,

    /// Inactivity before controls hide while playing (default: 3000 ms)
    pub hide_controls_after_ms: u64,

    /// Step used by the skip buttons (default: 10 s)
    pub skip_seconds: f64,

    /// Volume restored when unmuting at zero volume (default: 0.5)
    pub unmute_fallback_volume: f64,
}

impl PlayerConfig {
    /// Auto-hide delay as a `Duration`
    pub fn hide_controls_after(&self) -> Duration {
        Duration::from_millis(self.hide_controls_after_ms)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            hide_controls_after_ms: 3000,
            skip_seconds: 10.0,
            unmute_fallback_volume: 0.5,
        }
    }
}

/// Render seconds as `m:ss`
///
/// Minutes are not wrapped into hours; negative or non-finite input renders as `0:00`.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.initial_volume, 1.0);
        assert_eq!(config.hide_controls_after(), Duration::from_secs(3));
        assert_eq!(config.skip_seconds, 10.0);
        assert_eq!(config.unmute_fallback_volume, 0.5);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: PlayerConfig = serde_json::from_str(r#"{"skip_seconds": 5.0}"#).unwrap();
        assert_eq!(config.skip_seconds, 5.0);
        assert_eq!(config.hide_controls_after_ms, 3000);
    }

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(0.0), "0:00");
        assert_eq!(format_timestamp(9.9), "0:09");
        assert_eq!(format_timestamp(65.0), "1:05");
        assert_eq!(format_timestamp(652.4), "10:52");
        assert_eq!(format_timestamp(3725.0), "62:05");
    }

    #[test]
    fn timestamp_of_unknown_duration() {
        assert_eq!(format_timestamp(f64::NAN), "0:00");
        assert_eq!(format_timestamp(-3.0), "0:00");
    }
}
