//! Upload pipeline error types

use crate::draft::DraftField;
use crate::validation::ValidationError;
use thiserror::Error;

/// Result alias for upload operations
pub type Result<T> = std::result::Result<T, UploadError>;

/// Errors raised by the upload pipeline
///
/// Every variant is recoverable: the draft is left as it was before the
/// failing call.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Please fill in all fields: missing {}", join_fields(.0))]
    MissingFields(Vec<DraftField>),

    #[error("You must be logged in to upload videos")]
    AuthRequired,

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("An upload is already in progress")]
    UploadInProgress,

    #[error("No video selected")]
    NoVideo,

    #[error("No video frame source attached")]
    NoFrameSource,

    #[error("Thumbnail capture failed: {0}")]
    Capture(#[from] CaptureError),
}

/// Errors from seeking, drawing or encoding a video frame
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Seek to {seconds}s failed: {reason}")]
    Seek { seconds: f64, reason: String },

    #[error("Frame draw failed: {0}")]
    Draw(String),

    #[error("Frame buffer has {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    InvalidFrame {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Encoder task failed: {0}")]
    Task(String),
}

impl UploadError {
    /// Whether the draft was rejected before any side effect
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::MissingFields(_)
                | Self::AuthRequired
                | Self::UploadInProgress
                | Self::NoVideo
                | Self::NoFrameSource
        )
    }
}

fn join_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::MediaKind;

    #[test]
    fn missing_fields_lists_every_field() {
        let err = UploadError::MissingFields(vec![DraftField::Title, DraftField::Thumbnail]);
        assert_eq!(
            err.to_string(),
            "Please fill in all fields: missing title, thumbnail"
        );
        assert!(err.is_rejection());
    }

    #[test]
    fn validation_is_transparent() {
        let err: UploadError = ValidationError::TooLarge {
            kind: MediaKind::Video,
            size: 2,
            max: 1,
        }
        .into();
        assert_eq!(err.to_string(), "File too large: 2 bytes (max: 1 bytes)");
    }

    #[test]
    fn upload_failure_is_not_a_rejection() {
        assert!(!UploadError::UploadFailed("boom".into()).is_rejection());
    }
}
