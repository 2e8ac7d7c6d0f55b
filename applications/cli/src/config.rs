/// Application configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vidshare_playback::PlayerConfig;
use vidshare_upload::UploadConfig;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "vidshare.toml";

/// Prefix for environment overrides, e.g. `VIDSHARE_UPLOAD__MAX_VIDEO_BYTES`
pub const ENV_PREFIX: &str = "VIDSHARE";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub upload: UploadConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `vidshare.toml` is read when
    /// present. Environment variables override file values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Double underscore separates sections, since keys contain underscores
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let upload = &self.upload;
        if upload.max_video_bytes == 0 || upload.max_thumbnail_bytes == 0 {
            return Err(CliError::Config(
                "upload size limits must be greater than zero".to_string(),
            ));
        }
        if upload.max_title_chars == 0 {
            return Err(CliError::Config(
                "upload.max_title_chars must be greater than zero".to_string(),
            ));
        }
        if !(1..=100).contains(&upload.thumbnail_quality) {
            return Err(CliError::Config(format!(
                "upload.thumbnail_quality must be 1-100, got {}",
                upload.thumbnail_quality
            )));
        }
        if upload.progress_tick_ms == 0 {
            return Err(CliError::Config(
                "upload.progress_tick_ms must be greater than zero".to_string(),
            ));
        }
        if !upload.progress_max_step.is_finite() || upload.progress_max_step < 0.0 {
            return Err(CliError::Config(
                "upload.progress_max_step must be a non-negative number".to_string(),
            ));
        }

        let player = &self.player;
        if !(0.0..=1.0).contains(&player.initial_volume) {
            return Err(CliError::Config(format!(
                "player.initial_volume must be within 0-1, got {}",
                player.initial_volume
            )));
        }
        if !(player.unmute_fallback_volume > 0.0 && player.unmute_fallback_volume <= 1.0) {
            return Err(CliError::Config(format!(
                "player.unmute_fallback_volume must be within (0, 1], got {}",
                player.unmute_fallback_volume
            )));
        }
        if player.hide_controls_after_ms == 0 {
            return Err(CliError::Config(
                "player.hide_controls_after_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Render as TOML, e.g. to seed a `vidshare.toml`
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_limit_rejected() {
        let mut config = AppConfig::default();
        config.upload.max_video_bytes = 0;
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }

    #[test]
    fn quality_out_of_range_rejected() {
        let mut config = AppConfig::default();
        config.upload.thumbnail_quality = 0;
        assert!(config.validate().is_err());
        config.upload.thumbnail_quality = 101;
        assert!(config.validate().is_err());
        config.upload.thumbnail_quality = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn silent_unmute_fallback_rejected() {
        let mut config = AppConfig::default();
        config.player.unmute_fallback_volume = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_round_trips() {
        let config = AppConfig::default();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[upload]"));
        assert!(rendered.contains("max_video_bytes = 104857600"));

        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
