//! Vidshare Core
//!
//! Platform-agnostic domain types, collaborator traits, and error handling
//! shared by the playback and upload libraries.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Video`, `MediaFile`, `VideoUpload`
//! - **Collaborator Traits**: `AuthProvider`, `VideoService`
//! - **Error Handling**: Unified `VidshareError` and `Result` types
//!
//! Collaborators are injected as trait objects rather than reached through
//! process-wide singletons, so hosts and tests can substitute their own.
//!
//! # Example
//!
//! ```rust
//! use vidshare_core::{MediaFile, User, UserId};
//!
//! let user = User::new(UserId::new("1"), "johnsmith", "john@example.com");
//! let file = MediaFile::new("clip.mp4", "video/mp4", vec![0u8; 16]);
//!
//! assert_eq!(user.username, "johnsmith");
//! assert_eq!(file.size(), 16);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, VidshareError};
pub use traits::{require_user, AuthProvider, VideoService};
pub use types::{MediaFile, User, UserId, Video, VideoId, VideoUpload};
