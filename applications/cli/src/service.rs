/// Local collaborators for running the upload pipeline without a backend
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use vidshare_core::{
    require_user, AuthProvider, Result, User, UserId, Video, VideoId, VideoService, VideoUpload,
};

/// Fixed session for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct SessionAuth {
    user: Option<User>,
}

impl SessionAuth {
    pub fn signed_in(username: &str) -> Self {
        Self {
            user: Some(User::new(
                UserId::new("1"),
                username,
                format!("{username}@localhost"),
            )),
        }
    }

    pub fn signed_out() -> Self {
        Self { user: None }
    }
}

impl AuthProvider for SessionAuth {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }

    fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Video service that "publishes" after a fixed delay
///
/// Ids are assigned sequentially starting at 1; media URLs point at the
/// local file names.
pub struct LocalVideoService<A> {
    auth: A,
    latency: Duration,
    next_id: AtomicU64,
}

impl<A: AuthProvider> LocalVideoService<A> {
    pub fn new(auth: A, latency: Duration) -> Self {
        Self {
            auth,
            latency,
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl<A: AuthProvider> VideoService for LocalVideoService<A> {
    async fn upload_video(&self, upload: VideoUpload) -> Result<Video> {
        let user = require_user(&self.auth, "upload videos")?;

        tokio::time::sleep(self.latency).await;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        tracing::debug!(id, title = %upload.title, "Stored upload locally");

        Ok(Video {
            id: VideoId::new(id.to_string()),
            title: upload.title,
            description: upload.description,
            thumbnail: format!("file://{}", upload.thumbnail_file.name),
            video_url: format!("file://{}", upload.video_file.name),
            duration: 0,
            views: 0,
            likes: 0,
            user_id: user.id.clone(),
            user: Some(user),
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidshare_core::MediaFile;

    fn upload() -> VideoUpload {
        VideoUpload {
            title: "Title".to_string(),
            description: "Description".to_string(),
            video_file: MediaFile::new("clip.mp4", "video/mp4", vec![0u8; 8]),
            thumbnail_file: MediaFile::new("thumb.png", "image/png", vec![0u8; 8]),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn assigns_sequential_ids() {
        let service = LocalVideoService::new(SessionAuth::signed_in("alice"), Duration::from_secs(1));
        let first = service.upload_video(upload()).await.unwrap();
        let second = service.upload_video(upload()).await.unwrap();

        assert_eq!(first.id.as_str(), "1");
        assert_eq!(second.id.as_str(), "2");
        assert_eq!(first.video_url, "file://clip.mp4");
        assert_eq!(first.user.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn requires_signed_in_user() {
        let service = LocalVideoService::new(SessionAuth::signed_out(), Duration::ZERO);
        let err = service.upload_video(upload()).await.unwrap_err();
        assert!(err.is_auth_required());
    }
}
