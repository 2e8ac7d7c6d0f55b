//! Upload limits and timings

use crate::validation::{FileRules, MIB};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the upload pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted video (default: 100 MiB)
    pub max_video_bytes: u64,

    /// Largest accepted thumbnail image (default: 5 MiB)
    pub max_thumbnail_bytes: u64,

    /// Longest accepted title in characters (default: 100)
    pub max_title_chars: usize,

    /// JPEG quality for captured thumbnails, 1-100 (default: 95)
    pub thumbnail_quality: u8,

    /// Interval between simulated progress steps (default: 500 ms)
    pub progress_tick_ms: u64,

    /// Largest simulated progress step in percent (default: 10)
    pub progress_max_step: f64,
}

impl UploadConfig {
    /// Rules applied to the video slot
    pub fn video_rules(&self) -> FileRules {
        FileRules::video(self.max_video_bytes)
    }

    /// Rules applied to the thumbnail slot
    pub fn thumbnail_rules(&self) -> FileRules {
        FileRules::thumbnail(self.max_thumbnail_bytes)
    }

    /// Progress step interval as a `Duration`
    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_video_bytes: 100 * MIB,
            max_thumbnail_bytes: 5 * MIB,
            max_title_chars: 100,
            thumbnail_quality: 95,
            progress_tick_ms: 500,
            progress_max_step: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        let config = UploadConfig::default();
        assert_eq!(config.max_video_bytes, 104_857_600);
        assert_eq!(config.max_thumbnail_bytes, 5_242_880);
        assert_eq!(config.max_title_chars, 100);
        assert_eq!(config.thumbnail_quality, 95);
        assert_eq!(config.progress_tick(), Duration::from_millis(500));
    }

    #[test]
    fn rules_follow_limits() {
        let mut config = UploadConfig::default();
        config.max_video_bytes = 10;
        assert_eq!(config.video_rules().max_bytes(), 10);
        assert_eq!(config.thumbnail_rules().max_bytes(), 5 * MIB);
    }
}
