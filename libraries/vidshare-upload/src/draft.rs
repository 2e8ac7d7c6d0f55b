//! The in-progress upload form
//!
//! Each media slot holds the file together with its preview handle, so a
//! slot can never have a file without a live preview or vice versa. Slots are
//! always emptied before a replacement handle is allocated.

use crate::config::UploadConfig;
use crate::error::UploadError;
use crate::preview::{PreviewHandle, PreviewUrls};
use crate::validation::{validate_title, FileRules, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use vidshare_core::{MediaFile, VideoUpload};

/// Where the current thumbnail came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailSource {
    /// Captured from a frame of the selected video
    Auto,
    /// Picked by the user
    Manual,
}

/// Fields required before submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftField {
    Title,
    Description,
    Video,
    Thumbnail,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Video => "video",
            Self::Thumbnail => "thumbnail",
        };
        f.write_str(name)
    }
}

/// A selected file and its live preview URL
#[derive(Debug)]
pub struct DraftMedia {
    file: MediaFile,
    preview: PreviewHandle,
}

impl DraftMedia {
    pub fn file(&self) -> &MediaFile {
        &self.file
    }

    pub fn preview_url(&self) -> &str {
        self.preview.url()
    }
}

/// Upload form state
#[derive(Debug)]
pub struct UploadDraft {
    title: String,
    description: String,
    video: Option<DraftMedia>,
    thumbnail: Option<DraftMedia>,
    thumbnail_source: Option<ThumbnailSource>,
    frame_time: f64,
    video_rules: FileRules,
    thumbnail_rules: FileRules,
    max_title_chars: usize,
    urls: Arc<dyn PreviewUrls>,
}

impl UploadDraft {
    /// Create an empty draft
    pub fn new(urls: Arc<dyn PreviewUrls>, config: &UploadConfig) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            video: None,
            thumbnail: None,
            thumbnail_source: None,
            frame_time: 0.0,
            video_rules: config.video_rules(),
            thumbnail_rules: config.thumbnail_rules(),
            max_title_chars: config.max_title_chars,
            urls,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        let title = title.into();
        validate_title(&title, self.max_title_chars)?;
        self.title = title;
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Validate and store a video, replacing any previous one
    ///
    /// The thumbnail slot is left alone.
    pub fn set_video(&mut self, file: MediaFile) -> Result<(), ValidationError> {
        self.video_rules.validate(&file)?;

        self.video = None;
        self.frame_time = 0.0;
        let preview = PreviewHandle::allocate(&self.urls, &file);
        debug!(file = %file.name, size = file.size(), "Video selected");
        self.video = Some(DraftMedia { file, preview });
        Ok(())
    }

    /// Validate and store a user-picked thumbnail
    pub fn set_thumbnail(&mut self, file: MediaFile) -> Result<(), ValidationError> {
        self.thumbnail_rules.validate(&file)?;
        self.install_thumbnail(file, ThumbnailSource::Manual);
        Ok(())
    }

    /// Store a thumbnail captured from the video
    pub(crate) fn install_auto_thumbnail(&mut self, file: MediaFile) {
        self.install_thumbnail(file, ThumbnailSource::Auto);
    }

    fn install_thumbnail(&mut self, file: MediaFile, source: ThumbnailSource) {
        self.clear_thumbnail();
        let preview = PreviewHandle::allocate(&self.urls, &file);
        debug!(file = %file.name, size = file.size(), ?source, "Thumbnail set");
        self.thumbnail = Some(DraftMedia { file, preview });
        self.thumbnail_source = Some(source);
    }

    /// Drop the video; an auto thumbnail goes with it
    pub fn clear_video(&mut self) {
        self.video = None;
        self.frame_time = 0.0;
        if self.thumbnail_source == Some(ThumbnailSource::Auto) {
            self.clear_thumbnail();
        }
    }

    pub fn clear_thumbnail(&mut self) {
        self.thumbnail = None;
        self.thumbnail_source = None;
    }

    /// Reset every field and release both previews
    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
        self.video = None;
        self.clear_thumbnail();
        self.frame_time = 0.0;
    }

    /// Required fields that are still empty, in form order
    pub fn missing_fields(&self) -> Vec<DraftField> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push(DraftField::Title);
        }
        if self.description.trim().is_empty() {
            missing.push(DraftField::Description);
        }
        if self.video.is_none() {
            missing.push(DraftField::Video);
        }
        if self.thumbnail.is_none() {
            missing.push(DraftField::Thumbnail);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Build the service request; payloads are shared, not copied
    pub fn to_upload(&self) -> Result<VideoUpload, UploadError> {
        match (&self.video, &self.thumbnail) {
            (Some(video), Some(thumbnail)) if self.is_complete() => Ok(VideoUpload {
                title: self.title.clone(),
                description: self.description.clone(),
                video_file: video.file.clone(),
                thumbnail_file: thumbnail.file.clone(),
            }),
            _ => Err(UploadError::MissingFields(self.missing_fields())),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn video(&self) -> Option<&DraftMedia> {
        self.video.as_ref()
    }

    pub fn thumbnail(&self) -> Option<&DraftMedia> {
        self.thumbnail.as_ref()
    }

    pub fn thumbnail_source(&self) -> Option<ThumbnailSource> {
        self.thumbnail_source
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    pub fn video_preview_url(&self) -> Option<&str> {
        self.video.as_ref().map(DraftMedia::preview_url)
    }

    pub fn thumbnail_preview_url(&self) -> Option<&str> {
        self.thumbnail.as_ref().map(DraftMedia::preview_url)
    }

    /// Capture time picked on the frame slider, in seconds
    pub fn frame_time(&self) -> f64 {
        self.frame_time
    }

    pub(crate) fn set_frame_time(&mut self, seconds: f64) {
        self.frame_time = seconds;
    }
}
