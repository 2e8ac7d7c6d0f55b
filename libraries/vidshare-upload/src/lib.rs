//! Vidshare - Upload Pipeline
//!
//! Client-side half of publishing a video.
//!
//! This crate provides:
//! - File validation (type before size) for videos and thumbnail images
//! - Preview URL handles that are revoked when replaced or dropped
//! - Thumbnail capture from a video frame, encoded as JPEG
//! - Simulated upload progress running alongside the real service call
//! - Submission gated on a complete draft and a signed-in user
//!
//! # Architecture
//!
//! The video service and auth state come from `vidshare-core` traits, the
//! preview URL backend from [`PreviewUrls`] and the preview video element
//! from [`FrameSource`]. [`UploadPipeline`] owns the [`UploadDraft`] and
//! reports user-visible outcomes as [`UploadEvent`]s.
//!
//! # Example
//!
//! ```rust
//! use vidshare_upload::{FileRules, UploadConfig, ValidationError, MIB};
//! use vidshare_core::MediaFile;
//!
//! let rules = UploadConfig::default().video_rules();
//!
//! let clip = MediaFile::new("clip.mp4", "video/mp4", vec![0u8; 1024]);
//! assert!(rules.validate(&clip).is_ok());
//!
//! let flash = MediaFile::new("clip.flv", "video/x-flv", vec![0u8; 1024]);
//! assert!(matches!(
//!     rules.validate(&flash),
//!     Err(ValidationError::UnsupportedType { .. })
//! ));
//!
//! assert_eq!(FileRules::thumbnail(5 * MIB).max_bytes(), 5 * MIB);
//! ```

mod config;
mod draft;
mod error;
mod pipeline;
mod preview;
mod progress;
mod thumbnail;
mod validation;

// Public exports
pub use config::UploadConfig;
pub use draft::{DraftField, DraftMedia, ThumbnailSource, UploadDraft};
pub use error::{CaptureError, Result, UploadError};
pub use pipeline::{CaptureOutcome, UploadEvent, UploadPipeline};
pub use preview::{LocalPreviewUrls, PreviewHandle, PreviewUrls};
pub use progress::{ProgressHandle, ProgressSimulator, UploadPhase};
pub use thumbnail::{Frame, FrameSource, ThumbnailEncoder, THUMBNAIL_FILE_NAME, THUMBNAIL_MIME_TYPE};
pub use validation::{
    validate_title, FileRules, MediaKind, ValidationError, IMAGE_MIME_TYPES, MIB,
    VIDEO_MIME_TYPES,
};
