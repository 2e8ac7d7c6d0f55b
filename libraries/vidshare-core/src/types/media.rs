//! In-memory media payloads selected by the user

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A user-selected (or locally produced) binary file
///
/// The payload is reference-counted, so cloning a `MediaFile` to build an
/// upload request does not copy the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    /// File name as reported by the picker
    pub name: String,

    /// Declared MIME type (e.g. `video/mp4`)
    pub mime_type: String,

    /// File contents
    pub data: Bytes,
}

impl MediaFile {
    /// Create a media file from raw contents
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}
