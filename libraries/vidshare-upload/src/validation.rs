//! File and field validation for the upload draft
//!
//! Checks run in a fixed order: declared MIME type first, then size. A file
//! failing either check never reaches the draft.

use serde::{Deserialize, Serialize};
use std::fmt;
use vidshare_core::MediaFile;

/// One mebibyte
pub const MIB: u64 = 1024 * 1024;

/// MIME types accepted for the video slot
pub const VIDEO_MIME_TYPES: &[&str] = &["video/mp4", "video/webm", "video/ogg"];

/// MIME types accepted for the thumbnail slot
pub const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Which draft slot a file is destined for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Thumbnail,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Thumbnail => write!(f, "thumbnail"),
        }
    }
}

/// Validation errors surfaced to the user as rejection notices
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid file type: {mime_type} is not an accepted {kind} type (allowed: {allowed})")]
    UnsupportedType {
        kind: MediaKind,
        mime_type: String,
        allowed: String,
    },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge { kind: MediaKind, size: u64, max: u64 },

    #[error("Title too long: {chars} characters (max: {max})")]
    TitleTooLong { chars: usize, max: usize },
}

/// Type and size rules for one draft slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRules {
    kind: MediaKind,
    max_bytes: u64,
    accepted: &'static [&'static str],
}

impl FileRules {
    /// Rules for the video slot
    pub fn video(max_bytes: u64) -> Self {
        Self {
            kind: MediaKind::Video,
            max_bytes,
            accepted: VIDEO_MIME_TYPES,
        }
    }

    /// Rules for the thumbnail slot
    pub fn thumbnail(max_bytes: u64) -> Self {
        Self {
            kind: MediaKind::Thumbnail,
            max_bytes,
            accepted: IMAGE_MIME_TYPES,
        }
    }

    /// Rules for the given slot
    pub fn for_kind(kind: MediaKind, max_bytes: u64) -> Self {
        match kind {
            MediaKind::Video => Self::video(max_bytes),
            MediaKind::Thumbnail => Self::thumbnail(max_bytes),
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn accepted_types(&self) -> &'static [&'static str] {
        self.accepted
    }

    /// Whether a declared MIME type is accepted
    ///
    /// Comparison ignores case and any parameters (`video/mp4; codecs=...`).
    pub fn accepts_type(&self, mime_type: &str) -> bool {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.accepted.iter().any(|accepted| *accepted == essence)
    }

    /// Validate a declared type and size without needing the payload
    pub fn check(&self, mime_type: &str, size: u64) -> Result<(), ValidationError> {
        if !self.accepts_type(mime_type) {
            return Err(ValidationError::UnsupportedType {
                kind: self.kind,
                mime_type: mime_type.to_string(),
                allowed: self.accepted.join(", "),
            });
        }

        if size > self.max_bytes {
            return Err(ValidationError::TooLarge {
                kind: self.kind,
                size,
                max: self.max_bytes,
            });
        }

        Ok(())
    }

    /// Validate a selected file
    pub fn validate(&self, file: &MediaFile) -> Result<(), ValidationError> {
        self.check(&file.mime_type, file.size())
    }
}

/// Validate a title length in characters (not bytes)
pub fn validate_title(title: &str, max_chars: usize) -> Result<(), ValidationError> {
    let chars = title.chars().count();
    if chars > max_chars {
        return Err(ValidationError::TitleTooLong {
            chars,
            max: max_chars,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_of(mime: &str, size: usize) -> MediaFile {
        MediaFile::new("clip", mime, vec![0u8; size])
    }

    #[test]
    fn accepts_listed_video_types() {
        let rules = FileRules::video(100 * MIB);
        for mime in VIDEO_MIME_TYPES {
            assert!(rules.accepts_type(mime), "{mime} should be accepted");
        }
        assert!(rules.accepts_type("VIDEO/MP4"));
        assert!(rules.accepts_type("video/webm; codecs=vp9"));
        assert!(!rules.accepts_type("video/x-flv"));
        assert!(!rules.accepts_type("image/png"));
    }

    #[test]
    fn accepts_listed_image_types() {
        let rules = FileRules::thumbnail(5 * MIB);
        for mime in IMAGE_MIME_TYPES {
            assert!(rules.accepts_type(mime));
        }
        assert!(!rules.accepts_type("image/gif"));
        assert!(!rules.accepts_type("video/mp4"));
    }

    #[test]
    fn size_limit_is_inclusive() {
        let rules = FileRules::thumbnail(4);
        assert!(rules.validate(&video_of("image/png", 4)).is_ok());
        assert_eq!(
            rules.validate(&video_of("image/png", 5)),
            Err(ValidationError::TooLarge {
                kind: MediaKind::Thumbnail,
                size: 5,
                max: 4
            })
        );
    }

    #[test]
    fn type_is_checked_before_size() {
        let rules = FileRules::video(1);
        let err = rules.validate(&video_of("video/x-flv", 10)).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedType { .. }));
        assert!(err.to_string().contains("video/x-flv"));
    }

    #[test]
    fn empty_type_is_rejected() {
        let rules = FileRules::video(MIB);
        assert!(matches!(
            rules.check("", 10),
            Err(ValidationError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn title_counts_characters() {
        assert!(validate_title("", 100).is_ok());
        assert!(validate_title(&"é".repeat(100), 100).is_ok());
        assert_eq!(
            validate_title(&"a".repeat(101), 100),
            Err(ValidationError::TitleTooLong {
                chars: 101,
                max: 100
            })
        );
    }
}
