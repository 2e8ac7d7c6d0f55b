//! Collaborator traits for Vidshare
//!
//! These are the black boxes the playback and upload libraries depend on.
//! Hosts inject implementations; nothing here reaches for global state.

use crate::error::{Result, VidshareError};
use crate::types::{User, Video, VideoUpload};
use async_trait::async_trait;

/// Session lookup
///
/// Implementers report who (if anyone) is signed in. The libraries never
/// authenticate on their own; they only gate actions on this answer.
pub trait AuthProvider: Send + Sync {
    /// The signed-in user, if any
    fn current_user(&self) -> Option<User>;

    /// Whether a session token is present
    fn is_logged_in(&self) -> bool;
}

/// Video backend
///
/// The only network-like boundary the upload pipeline depends on.
#[async_trait]
pub trait VideoService: Send + Sync {
    /// Publish a new video
    ///
    /// # Errors
    /// Fails with [`VidshareError::AuthRequired`] when no user is signed in,
    /// or with any backend error when the upload does not complete.
    async fn upload_video(&self, upload: VideoUpload) -> Result<Video>;
}

/// Resolve the signed-in user or fail with an authentication error
///
/// # Errors
/// Returns [`VidshareError::AuthRequired`] naming `action` when nobody is signed in.
pub fn require_user(auth: &dyn AuthProvider, action: &str) -> Result<User> {
    auth.current_user()
        .ok_or_else(|| VidshareError::auth_required(action))
}
