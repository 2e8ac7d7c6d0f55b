/// Command implementations
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::service::{LocalVideoService, SessionAuth};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use vidshare_core::{MediaFile, Video};
use vidshare_upload::{
    CaptureError, FileRules, Frame, FrameSource, LocalPreviewUrls, MediaKind, PreviewUrls,
    ThumbnailEncoder, UploadEvent, UploadPipeline, MIB,
};

/// Outcome of `vidshare check`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub mime_type: String,
    pub size: u64,
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: valid {} ({}, {:.1} MiB)",
            self.path.display(),
            self.kind,
            self.mime_type,
            self.size as f64 / MIB as f64
        )
    }
}

/// Guess a file's MIME type from its extension
pub fn guess_mime(path: &Path) -> Result<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .ok_or_else(|| CliError::UnknownType(path.display().to_string()))
}

/// Read a file from disk as a draft candidate
pub async fn load_media(path: &Path) -> Result<MediaFile> {
    let mime_type = guess_mime(path)?;
    let data = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(MediaFile::new(name, mime_type, data))
}

/// Validate a file against the upload rules without reading it
pub fn check_file(path: &Path, kind: MediaKind, config: &AppConfig) -> Result<FileReport> {
    let max_bytes = match kind {
        MediaKind::Video => config.upload.max_video_bytes,
        MediaKind::Thumbnail => config.upload.max_thumbnail_bytes,
    };
    let rules = FileRules::for_kind(kind, max_bytes);

    let mime_type = guess_mime(path)?;
    let size = std::fs::metadata(path)?.len();
    rules.check(&mime_type, size)?;

    Ok(FileReport {
        path: path.to_path_buf(),
        kind,
        mime_type,
        size,
    })
}

/// Encode any readable image as a JPEG thumbnail
pub fn make_thumbnail(input: &Path, output: &Path, quality: u8) -> Result<MediaFile> {
    let image = image::open(input)?;
    let frame = Frame::from_image(&image)?;
    let file = ThumbnailEncoder::new(quality).encode(&frame)?;
    std::fs::write(output, &file.data)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        width = frame.width(),
        height = frame.height(),
        bytes = file.size(),
        "Thumbnail written"
    );
    Ok(file)
}

/// A still image standing in for the preview video element
///
/// Every position shows the same picture.
pub struct StillFrames {
    frame: Frame,
    duration: f64,
}

impl StillFrames {
    pub fn open(path: &Path, duration: f64) -> Result<Self> {
        let image = image::open(path)?;
        Ok(Self {
            frame: Frame::from_image(&image)?,
            duration,
        })
    }
}

#[async_trait]
impl FrameSource for StillFrames {
    fn duration(&self) -> f64 {
        self.duration
    }

    async fn seek(&mut self, seconds: f64) -> std::result::Result<(), CaptureError> {
        if !(0.0..=self.duration).contains(&seconds) {
            return Err(CaptureError::Seek {
                seconds,
                reason: format!("outside 0-{}s", self.duration),
            });
        }
        Ok(())
    }

    fn capture_frame(&mut self) -> std::result::Result<Frame, CaptureError> {
        Ok(self.frame.clone())
    }
}

/// Where the simulated upload gets its thumbnail
#[derive(Debug, Clone)]
pub enum ThumbnailInput {
    /// A picked image file
    File(PathBuf),
    /// A frame captured from a still "video" at the given time
    Frame { poster: PathBuf, at_seconds: f64 },
}

/// Arguments for `vidshare upload`
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub video: PathBuf,
    pub thumbnail: ThumbnailInput,
    pub title: String,
    pub description: String,
    pub username: Option<String>,
    pub latency: Duration,
}

/// Run the upload pipeline end to end against the local video service
pub async fn simulate_upload(config: &AppConfig, request: UploadRequest) -> Result<Video> {
    let auth = match &request.username {
        Some(name) => SessionAuth::signed_in(name),
        None => SessionAuth::signed_out(),
    };
    let service = LocalVideoService::new(auth.clone(), request.latency);
    let urls: Arc<dyn PreviewUrls> = Arc::new(LocalPreviewUrls::new());
    let (pipeline, mut events) =
        UploadPipeline::new(&config.upload, Arc::new(service), Arc::new(auth), urls);

    pipeline.set_title(request.title)?;
    pipeline.set_description(request.description)?;
    pipeline.set_video(load_media(&request.video).await?)?;

    match request.thumbnail {
        ThumbnailInput::File(path) => pipeline.set_thumbnail(load_media(&path).await?)?,
        ThumbnailInput::Frame { poster, at_seconds } => {
            let frames = StillFrames::open(&poster, at_seconds.max(1.0))?;
            pipeline.attach_frame_source(Box::new(frames)).await;
            pipeline.generate_thumbnail_at(at_seconds).await?;
        }
    }

    let mut progress = pipeline.subscribe_progress();
    let submit = pipeline.submit();
    tokio::pin!(submit);
    let result = loop {
        tokio::select! {
            result = &mut submit => break result,
            changed = progress.changed() => {
                if changed.is_err() {
                    break (&mut submit).await;
                }
                let percent = *progress.borrow_and_update();
                if percent > 0 {
                    info!(percent, phase = ?pipeline.progress_phase(), "Uploading");
                }
            }
        }
    };

    while let Ok(event) = events.try_recv() {
        match event {
            UploadEvent::NavigateToVideo { path, .. } => info!(path = %path, "Open video page"),
            UploadEvent::Rejected { reason } | UploadEvent::UploadFailed { reason } => {
                warn!(reason = %reason, "Upload notice");
            }
            UploadEvent::Uploaded { video } => info!(id = %video.id, "Upload complete"),
            UploadEvent::ThumbnailGenerated => info!("Thumbnail captured from video frame"),
        }
    }

    Ok(result?)
}
