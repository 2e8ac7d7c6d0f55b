//! Error types for playback control

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Duration is unknown until the element reports its metadata
    #[error("Media metadata not loaded")]
    MetadataNotLoaded,

    /// The hosting environment refused a request (autoplay policy, fullscreen denial, ...)
    #[error("Request denied by environment: {0}")]
    Environment(String),

    /// Controller has been unmounted
    #[error("Player is unmounted")]
    Unmounted,
}

impl PlaybackError {
    /// Create an environment denial
    pub fn environment(msg: impl Into<String>) -> Self {
        Self::Environment(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
