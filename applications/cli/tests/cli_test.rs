//! Integration tests for the CLI commands against real files

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use vidshare_cli::commands::{self, ThumbnailInput, UploadRequest};
use vidshare_cli::{AppConfig, CliError};
use vidshare_upload::{MediaKind, UploadError, ValidationError};

// ===== Test Helpers =====

fn write_file(dir: &TempDir, name: &str, size: usize) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, vec![0u8; size]).unwrap();
    path
}

fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.path().join(name);
    image::RgbImage::from_pixel(width, height, image::Rgb([30, 120, 200]))
        .save(&path)
        .unwrap();
    path
}

/// Log sink shared with a scoped subscriber
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn request(video: &Path, thumbnail: ThumbnailInput, user: Option<&str>) -> UploadRequest {
    UploadRequest {
        video: video.to_path_buf(),
        thumbnail,
        title: "Creating a Beautiful UI Design".to_string(),
        description: "Minimalist principles".to_string(),
        username: user.map(str::to_string),
        latency: Duration::from_millis(10),
    }
}

// ===== Check =====

#[test]
fn check_accepts_small_mp4() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "clip.mp4", 1024);

    let report = commands::check_file(&path, MediaKind::Video, &AppConfig::default()).unwrap();
    assert_eq!(report.mime_type, "video/mp4");
    assert_eq!(report.size, 1024);
    assert!(report.to_string().contains("valid video"));
}

#[test]
fn check_rejects_flash_video() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "clip.flv", 16);

    let err = commands::check_file(&path, MediaKind::Video, &AppConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        CliError::Validation(ValidationError::UnsupportedType { .. })
    ));
}

#[test]
fn check_uses_configured_limit() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "thumb.png", 2048);
    let mut config = AppConfig::default();
    config.upload.max_thumbnail_bytes = 1024;

    let err = commands::check_file(&path, MediaKind::Thumbnail, &config).unwrap_err();
    assert!(matches!(
        err,
        CliError::Validation(ValidationError::TooLarge {
            size: 2048,
            max: 1024,
            ..
        })
    ));
}

#[test]
fn check_reports_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "mystery", 16);

    let err = commands::check_file(&path, MediaKind::Video, &AppConfig::default()).unwrap_err();
    assert!(matches!(err, CliError::UnknownType(_)));
}

// ===== Thumbnail =====

#[test]
fn thumbnail_writes_jpeg() {
    let dir = TempDir::new().unwrap();
    let input = write_png(&dir, "frame.png", 32, 18);
    let output = dir.path().join("thumb.jpg");

    let file = commands::make_thumbnail(&input, &output, 80).unwrap();
    assert_eq!(file.mime_type, "image/jpeg");

    let decoded = image::open(&output).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (32, 18));
}

// ===== Config =====

#[test]
fn config_loads_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vidshare.toml");
    std::fs::write(
        &path,
        "[upload]\nmax_title_chars = 60\n\n[player]\nskip_seconds = 5.0\n",
    )
    .unwrap();

    let config = AppConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(config.upload.max_title_chars, 60);
    assert_eq!(config.player.skip_seconds, 5.0);
    // Unspecified values keep their defaults
    assert_eq!(config.upload.thumbnail_quality, 95);
}

#[test]
fn config_rejects_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vidshare.toml");
    std::fs::write(&path, "[upload]\nthumbnail_quality = 0\n").unwrap();

    assert!(matches!(
        AppConfig::load(Some(path.as_path())),
        Err(CliError::Config(_))
    ));
}

#[test]
fn config_requires_explicit_file_to_exist() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        AppConfig::load(Some(missing.as_path())),
        Err(CliError::Config(_))
    ));
}

// ===== Upload =====

#[tokio::test]
async fn upload_with_thumbnail_file() {
    let dir = TempDir::new().unwrap();
    let video = write_file(&dir, "clip.webm", 4096);
    let thumb = write_png(&dir, "thumb.png", 16, 9);

    let uploaded = commands::simulate_upload(
        &AppConfig::default(),
        request(&video, ThumbnailInput::File(thumb), Some("johnsmith")),
    )
    .await
    .unwrap();

    assert_eq!(uploaded.id.as_str(), "1");
    assert_eq!(uploaded.video_url, "file://clip.webm");
    assert_eq!(uploaded.thumbnail, "file://thumb.png");
}

#[tokio::test]
async fn upload_with_captured_frame() {
    let dir = TempDir::new().unwrap();
    let video = write_file(&dir, "clip.mp4", 4096);
    let poster = write_png(&dir, "poster.png", 64, 36);

    let uploaded = commands::simulate_upload(
        &AppConfig::default(),
        request(
            &video,
            ThumbnailInput::Frame {
                poster,
                at_seconds: 2.0,
            },
            Some("johnsmith"),
        ),
    )
    .await
    .unwrap();

    assert_eq!(uploaded.thumbnail, "file://thumbnail.jpg");
}

#[tokio::test]
async fn upload_signed_out_is_refused() {
    let dir = TempDir::new().unwrap();
    let video = write_file(&dir, "clip.mp4", 4096);
    let thumb = write_png(&dir, "thumb.png", 16, 9);

    let err = commands::simulate_upload(
        &AppConfig::default(),
        request(&video, ThumbnailInput::File(thumb), None),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CliError::Upload(UploadError::AuthRequired)));
}

#[tokio::test]
async fn upload_rejects_unsupported_video() {
    let dir = TempDir::new().unwrap();
    let video = write_file(&dir, "clip.flv", 4096);
    let thumb = write_png(&dir, "thumb.png", 16, 9);

    let err = commands::simulate_upload(
        &AppConfig::default(),
        request(&video, ThumbnailInput::File(thumb), Some("johnsmith")),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        CliError::Upload(UploadError::Validation(ValidationError::UnsupportedType { .. }))
    ));
}

#[tokio::test]
async fn failed_upload_still_reports_notices() {
    let dir = TempDir::new().unwrap();
    let video = write_file(&dir, "clip.mp4", 4096);
    let thumb = write_png(&dir, "thumb.png", 16, 9);

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let result = commands::simulate_upload(
        &AppConfig::default(),
        request(&video, ThumbnailInput::File(thumb), None),
    )
    .await;

    assert!(matches!(result, Err(CliError::Upload(UploadError::AuthRequired))));
    let text = logs.text();
    assert!(text.contains("Upload notice"), "missing notice in:\n{text}");
}
