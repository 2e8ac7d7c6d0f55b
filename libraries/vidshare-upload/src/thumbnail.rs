//! Video frame capture and JPEG encoding

use crate::error::CaptureError;
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use vidshare_core::MediaFile;

/// File name given to captured thumbnails
pub const THUMBNAIL_FILE_NAME: &str = "thumbnail.jpg";

/// MIME type of captured thumbnails
pub const THUMBNAIL_MIME_TYPE: &str = "image/jpeg";

/// A decoded video frame in RGBA8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Frame {
    /// Wrap a raw RGBA8 buffer, checking its length against the dimensions
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, CaptureError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected || expected == 0 {
            return Err(CaptureError::InvalidFrame {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Build a frame from a decoded image
    pub fn from_image(image: &DynamicImage) -> Result<Self, CaptureError> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new(width, height, rgba.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

/// The preview video element, seen as a source of frames
///
/// Implementations resolve [`seek`](FrameSource::seek) only after the
/// element reports the seek has completed, so the next
/// [`capture_frame`](FrameSource::capture_frame) draws the requested frame.
#[async_trait]
pub trait FrameSource: Send {
    /// Length of the loaded video in seconds (0 before metadata)
    fn duration(&self) -> f64;

    /// Move to `seconds` and wait for the seek to complete
    async fn seek(&mut self, seconds: f64) -> Result<(), CaptureError>;

    /// Draw the current frame
    fn capture_frame(&mut self) -> Result<Frame, CaptureError>;
}

/// Encodes captured frames as JPEG thumbnails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailEncoder {
    quality: u8,
}

impl ThumbnailEncoder {
    /// Create an encoder; quality is clamped to 1..=100
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode a frame as `thumbnail.jpg`
    pub fn encode(&self, frame: &Frame) -> Result<MediaFile, CaptureError> {
        let image = RgbaImage::from_raw(frame.width, frame.height, frame.rgba.clone()).ok_or(
            CaptureError::InvalidFrame {
                width: frame.width,
                height: frame.height,
                expected: frame.width as usize * frame.height as usize * 4,
                actual: frame.rgba.len(),
            },
        )?;

        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgba8(image).to_rgb8();

        let mut buffer = Vec::new();
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, self.quality))?;

        Ok(MediaFile::new(THUMBNAIL_FILE_NAME, THUMBNAIL_MIME_TYPE, buffer))
    }
}

impl Default for ThumbnailEncoder {
    fn default() -> Self {
        Self::new(95)
    }
}
