//! Upload pipeline
//!
//! Owns the draft and coordinates validation, frame capture, simulated
//! progress and the call to the video service. Outcomes the user should see
//! are sent on an event channel as well as returned, so a UI can render
//! notices and navigate without inspecting every `Result`.

use crate::config::UploadConfig;
use crate::draft::UploadDraft;
use crate::error::{CaptureError, Result, UploadError};
use crate::preview::PreviewUrls;
use crate::progress::{ProgressSimulator, UploadPhase};
use crate::thumbnail::{FrameSource, ThumbnailEncoder};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use vidshare_core::{AuthProvider, MediaFile, Video, VideoId, VideoService};

/// Notifications for the hosting UI
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// An action was refused; `reason` is user-facing
    Rejected { reason: String },
    /// A frame was captured and installed as the thumbnail
    ThumbnailGenerated,
    /// The service accepted the upload
    Uploaded { video: Video },
    /// Show the new video's page
    NavigateToVideo { id: VideoId, path: String },
    /// The service call failed; the draft is intact
    UploadFailed { reason: String },
}

/// Result of a thumbnail capture request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The captured frame is now the thumbnail
    Installed,
    /// A later request (or a video change) made this one obsolete
    Superseded,
}

/// Client-side upload pipeline
pub struct UploadPipeline {
    // Never held across an await
    draft: Mutex<UploadDraft>,
    frame_source: tokio::sync::Mutex<Option<Box<dyn FrameSource>>>,
    capture_generation: AtomicU64,
    video_service: Arc<dyn VideoService>,
    auth: Arc<dyn AuthProvider>,
    encoder: ThumbnailEncoder,
    simulator: ProgressSimulator,
    progress: Arc<watch::Sender<u8>>,
    in_flight: AtomicBool,
    events: mpsc::UnboundedSender<UploadEvent>,
}

/// Releases the in-flight flag and zeroes progress, even if the submit
/// future is dropped mid-call
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    progress: &'a watch::Sender<u8>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.progress.send_replace(0);
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl UploadPipeline {
    /// Create a pipeline with an empty draft
    ///
    /// Returns the pipeline and the receiving end of its event channel.
    pub fn new(
        config: &UploadConfig,
        video_service: Arc<dyn VideoService>,
        auth: Arc<dyn AuthProvider>,
        preview_urls: Arc<dyn PreviewUrls>,
    ) -> (Self, mpsc::UnboundedReceiver<UploadEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let (progress, _) = watch::channel(0u8);

        let pipeline = Self {
            draft: Mutex::new(UploadDraft::new(preview_urls, config)),
            frame_source: tokio::sync::Mutex::new(None),
            capture_generation: AtomicU64::new(0),
            video_service,
            auth,
            encoder: ThumbnailEncoder::new(config.thumbnail_quality),
            simulator: ProgressSimulator::new(config.progress_tick(), config.progress_max_step),
            progress: Arc::new(progress),
            in_flight: AtomicBool::new(false),
            events,
        };

        (pipeline, receiver)
    }

    // ===== Draft Fields =====

    pub fn set_title(&self, title: impl Into<String>) -> Result<()> {
        self.ensure_idle()?;
        let result = self.lock_draft().set_title(title);
        result.or_else(|e| self.reject(e.into()))
    }

    pub fn set_description(&self, description: impl Into<String>) -> Result<()> {
        self.ensure_idle()?;
        self.lock_draft().set_description(description);
        Ok(())
    }

    /// Validate and select a video
    ///
    /// Any capture in progress for the previous video is superseded.
    pub fn set_video(&self, file: MediaFile) -> Result<()> {
        self.ensure_idle()?;
        let result = {
            let mut draft = self.lock_draft();
            let result = draft.set_video(file);
            if result.is_ok() {
                self.capture_generation.fetch_add(1, Ordering::SeqCst);
            }
            result
        };
        result.or_else(|e| self.reject(e.into()))
    }

    /// Validate and select a thumbnail image
    pub fn set_thumbnail(&self, file: MediaFile) -> Result<()> {
        self.ensure_idle()?;
        let result = self.lock_draft().set_thumbnail(file);
        result.or_else(|e| self.reject(e.into()))
    }

    /// Drop the selected video (and an auto thumbnail)
    ///
    /// Any capture in progress is superseded at once. The frame source is
    /// detached after that capture releases it; the next video needs a new
    /// one.
    pub async fn clear_video(&self) -> Result<()> {
        self.ensure_idle()?;
        {
            let mut draft = self.lock_draft();
            draft.clear_video();
            self.capture_generation.fetch_add(1, Ordering::SeqCst);
        }
        self.frame_source.lock().await.take();
        debug!("Video cleared");
        Ok(())
    }

    pub fn clear_thumbnail(&self) -> Result<()> {
        self.ensure_idle()?;
        self.lock_draft().clear_thumbnail();
        Ok(())
    }

    /// Read the draft
    pub fn with_draft<R>(&self, f: impl FnOnce(&UploadDraft) -> R) -> R {
        f(&self.lock_draft())
    }

    // ===== Thumbnail Capture =====

    /// Attach the preview video element once it has rendered
    pub async fn attach_frame_source(&self, source: Box<dyn FrameSource>) {
        *self.frame_source.lock().await = Some(source);
        debug!("Frame source attached");
    }

    pub async fn detach_frame_source(&self) {
        self.frame_source.lock().await.take();
        debug!("Frame source detached");
    }

    /// Move the preview to `percent` (0-100) of the video and remember the
    /// position as the capture time
    pub async fn scrub_to_percent(&self, percent: f64) -> Result<f64> {
        self.ensure_idle()?;
        let mut source = self.frame_source.lock().await;
        let Some(source) = source.as_mut() else {
            return self.reject(UploadError::NoFrameSource);
        };

        let percent = if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let seconds = percent / 100.0 * source.duration().max(0.0);
        if let Err(e) = source.seek(seconds).await {
            return self.reject(e.into());
        }

        self.lock_draft().set_frame_time(seconds);
        Ok(seconds)
    }

    /// Capture the frame at the last scrubbed position
    pub async fn generate_thumbnail(&self) -> Result<CaptureOutcome> {
        let seconds = self.lock_draft().frame_time();
        self.generate_thumbnail_at(seconds).await
    }

    /// Seek to `seconds`, capture the frame and install it as an auto
    /// thumbnail
    ///
    /// Requests are serialized on the frame source. When calls overlap, only
    /// the latest one installs a thumbnail; earlier ones return
    /// [`CaptureOutcome::Superseded`] without encoding. A submit that starts
    /// while a capture is pending supersedes it as well.
    pub async fn generate_thumbnail_at(&self, seconds: f64) -> Result<CaptureOutcome> {
        self.ensure_idle()?;
        if !self.lock_draft().has_video() {
            return self.reject(UploadError::NoVideo);
        }

        let generation = self.capture_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let frame = {
            let mut source = self.frame_source.lock().await;
            if self.is_superseded(generation) {
                return Ok(self.superseded(generation));
            }
            let Some(source) = source.as_mut() else {
                return self.reject(UploadError::NoFrameSource);
            };

            if let Err(e) = source.seek(seconds).await {
                return self.reject(e.into());
            }
            if self.is_superseded(generation) {
                return Ok(self.superseded(generation));
            }
            match source.capture_frame() {
                Ok(frame) => frame,
                Err(e) => return self.reject(e.into()),
            }
        };

        let encoder = self.encoder;
        let encoded = tokio::task::spawn_blocking(move || encoder.encode(&frame))
            .await
            .map_err(|e| CaptureError::Task(e.to_string()))
            .and_then(|encoded| encoded);
        let file = match encoded {
            Ok(file) => file,
            Err(e) => return self.reject(e.into()),
        };

        {
            let mut draft = self.lock_draft();
            if self.is_superseded(generation) || self.is_uploading() || !draft.has_video() {
                return Ok(self.superseded(generation));
            }
            draft.set_frame_time(seconds);
            draft.install_auto_thumbnail(file);
        }

        info!(seconds, "Thumbnail generated from video frame");
        self.emit(UploadEvent::ThumbnailGenerated);
        Ok(CaptureOutcome::Installed)
    }

    // ===== Submission =====

    /// Upload the draft
    ///
    /// On success the draft is cleared and a navigation event is emitted.
    /// On failure the draft is left untouched for a retry.
    pub async fn submit(&self) -> Result<Video> {
        let (upload, _guard) = {
            let draft = self.lock_draft();
            if self.in_flight.load(Ordering::SeqCst) {
                return self.reject(UploadError::UploadInProgress);
            }
            let missing = draft.missing_fields();
            if !missing.is_empty() {
                return self.reject(UploadError::MissingFields(missing));
            }
            if !self.auth.is_logged_in() {
                return self.reject(UploadError::AuthRequired);
            }
            let upload = draft.to_upload()?;

            // Checked and claimed under the draft lock. Captures started
            // before the claim must not touch the draft being uploaded.
            self.in_flight.store(true, Ordering::SeqCst);
            self.capture_generation.fetch_add(1, Ordering::SeqCst);
            let guard = InFlightGuard {
                flag: &self.in_flight,
                progress: &self.progress,
            };
            (upload, guard)
        };

        info!(
            title = %upload.title,
            video_bytes = upload.video_file.size(),
            thumbnail_bytes = upload.thumbnail_file.size(),
            "Uploading video"
        );

        self.progress.send_replace(0);
        let progress = self
            .simulator
            .start(StdRng::from_entropy(), Arc::clone(&self.progress));

        let result = self.video_service.upload_video(upload).await;
        progress.stop();

        match result {
            Ok(video) => {
                {
                    let mut draft = self.lock_draft();
                    draft.clear();
                    self.capture_generation.fetch_add(1, Ordering::SeqCst);
                }
                self.frame_source.lock().await.take();

                info!(video_id = %video.id, "Video uploaded");
                self.emit(UploadEvent::Uploaded {
                    video: video.clone(),
                });
                self.emit(UploadEvent::NavigateToVideo {
                    id: video.id.clone(),
                    path: video.id.watch_path(),
                });
                Ok(video)
            }
            Err(e) => {
                warn!(error = %e, "Upload failed");
                let error = if e.is_auth_required() {
                    UploadError::AuthRequired
                } else {
                    UploadError::UploadFailed(e.to_string())
                };
                self.emit(UploadEvent::UploadFailed {
                    reason: error.to_string(),
                });
                Err(error)
            }
        }
    }

    // ===== Progress =====

    /// Simulated progress, 0-100
    pub fn progress(&self) -> u8 {
        *self.progress.borrow()
    }

    /// Watch progress changes
    pub fn subscribe_progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn progress_phase(&self) -> UploadPhase {
        UploadPhase::from_progress(self.is_uploading(), self.progress())
    }

    // ===== Internals =====

    fn lock_draft(&self) -> MutexGuard<'_, UploadDraft> {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_uploading() {
            return self.reject(UploadError::UploadInProgress);
        }
        Ok(())
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.capture_generation.load(Ordering::SeqCst) != generation
    }

    fn superseded(&self, generation: u64) -> CaptureOutcome {
        debug!(generation, "Thumbnail capture superseded");
        CaptureOutcome::Superseded
    }

    fn reject<T>(&self, error: UploadError) -> Result<T> {
        warn!(error = %error, "Upload action rejected");
        self.emit(UploadEvent::Rejected {
            reason: error.to_string(),
        });
        Err(error)
    }

    fn emit(&self, event: UploadEvent) {
        // The UI may have gone away; events are best-effort
        let _ = self.events.send(event);
    }
}

impl std::fmt::Debug for UploadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadPipeline")
            .field("draft", &*self.lock_draft())
            .field("progress", &self.progress())
            .field("in_flight", &self.is_uploading())
            .finish_non_exhaustive()
    }
}
