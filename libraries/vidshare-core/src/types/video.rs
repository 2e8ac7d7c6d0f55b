//! Video records and upload requests

use super::ids::{UserId, VideoId};
use super::media::MediaFile;
use super::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published video as returned by the video service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Unique video identifier
    pub id: VideoId,

    /// Display title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Thumbnail URL
    pub thumbnail: String,

    /// Playable media URL
    pub video_url: String,

    /// Length in whole seconds
    pub duration: u32,

    /// View count
    pub views: u64,

    /// Like count
    pub likes: u64,

    /// Uploader
    pub user_id: UserId,

    /// Uploader profile, when the service embeds it
    pub user: Option<User>,

    /// Publication time
    pub created_at: DateTime<Utc>,

    /// Last metadata update
    pub updated_at: DateTime<Utc>,
}

/// Everything the video service needs to publish a new video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUpload {
    /// Title, already validated
    pub title: String,
    /// Description
    pub description: String,
    /// Selected video
    pub video_file: MediaFile,
    /// Selected or captured thumbnail
    pub thumbnail_file: MediaFile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_serializes_camel_case() {
        let now = Utc::now();
        let video = Video {
            id: VideoId::new("1"),
            title: "Creating a Beautiful UI Design".to_string(),
            description: "Minimalist principles".to_string(),
            thumbnail: "blob:thumb".to_string(),
            video_url: "blob:video".to_string(),
            duration: 186,
            views: 1205,
            likes: 78,
            user_id: UserId::new("1"),
            user: None,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(json["videoUrl"], "blob:video");
        assert_eq!(json["userId"], "1");
        assert_eq!(json["duration"], 186);
    }
}
