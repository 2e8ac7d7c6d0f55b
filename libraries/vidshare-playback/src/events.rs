//! Player Events
//!
//! Two directions:
//! - [`MediaEvent`]: notifications from the media element and environment,
//!   fed into the controller by the host
//! - [`PlayerEvent`]: state changes the controller emits for UI synchronization

use serde::{Deserialize, Serialize};

/// Notifications from the media element and the environment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Metadata loaded; duration is now known
    LoadedMetadata {
        /// Total length in seconds
        duration: f64,
    },

    /// Periodic position report
    TimeUpdate {
        /// Current position in seconds
        current_time: f64,
    },

    /// Element left the paused state
    Play,

    /// Element paused
    Pause,

    /// Element stalled waiting for data
    Waiting,

    /// Element is rendering frames again
    Playing,

    /// Playback reached the end
    Ended,

    /// Fullscreen entered or left
    FullscreenChange {
        /// Whether the document now has a fullscreen element
        is_fullscreen: bool,
    },
}

/// Events emitted by the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Transport state confirmed by the element
    StateChanged {
        /// Whether media is playing
        is_playing: bool,
    },

    /// Duration became known
    DurationChanged {
        /// Total length in seconds
        duration_seconds: f64,
    },

    /// Position moved (time update or seek)
    PositionChanged {
        /// Current position in seconds
        position_seconds: f64,
        /// Progress, absent while duration is unknown
        progress_percent: Option<f64>,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// Stored level (0.0-1.0)
        volume: f64,
        /// Whether output is muted
        is_muted: bool,
    },

    /// Fullscreen state confirmed by the environment
    FullscreenChanged {
        /// Whether the player is fullscreen
        is_fullscreen: bool,
    },

    /// Buffering started or stopped
    BufferingChanged {
        /// Whether the element is waiting for data
        is_buffering: bool,
    },

    /// Controls shown or hidden
    ControlsVisibilityChanged {
        /// Whether the overlay is shown
        visible: bool,
    },

    /// Playback reached the end
    Ended,
}
