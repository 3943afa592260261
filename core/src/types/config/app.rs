use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// User-facing configuration, persisted as stories.toml.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoriesConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub image: ImageConfig,
}

impl StoriesConfig {
    /// Returns the config file path within the given data directory.
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join("stories.toml")
    }

    /// Loads config from a TOML file. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates config values and returns list of validation errors.
    /// Returns empty vec if config is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.storage.slot_key.trim().is_empty() {
            errors.push("slot_key must not be empty".to_string());
        }
        if self.lifecycle.expiry_hours == 0 {
            errors.push("expiry_hours must be at least 1".to_string());
        }
        if self.lifecycle.sweep_interval_secs == 0 {
            errors.push("sweep_interval_secs must be at least 1".to_string());
        }
        if self.viewer.auto_advance_secs == 0 {
            errors.push("auto_advance_secs must be at least 1".to_string());
        }
        if !self.viewer.swipe_threshold_px.is_finite() || self.viewer.swipe_threshold_px < 0.0 {
            errors.push("swipe_threshold_px must be a non-negative number".to_string());
        }
        if !(self.viewer.tap_zone_fraction > 0.0 && self.viewer.tap_zone_fraction < 0.5) {
            errors.push("tap_zone_fraction must be between 0 and 0.5".to_string());
        }
        if self.image.max_width == 0 || self.image.max_height == 0 {
            errors.push("max_width and max_height must be at least 1".to_string());
        }
        if !(1..=100).contains(&self.image.jpeg_quality) {
            errors.push("jpeg_quality must be between 1 and 100".to_string());
        }

        errors
    }

    /// Returns a validated config, replacing invalid values with defaults.
    pub fn with_defaults_for_invalid(&self) -> Self {
        let defaults = Self::default();
        let pick = |value: u64, default: u64| if value == 0 { default } else { value };

        Self {
            storage: StorageConfig {
                slot_key: if self.storage.slot_key.trim().is_empty() {
                    defaults.storage.slot_key
                } else {
                    self.storage.slot_key.clone()
                },
            },
            lifecycle: LifecycleConfig {
                expiry_hours: pick(self.lifecycle.expiry_hours, defaults.lifecycle.expiry_hours),
                sweep_interval_secs: pick(
                    self.lifecycle.sweep_interval_secs,
                    defaults.lifecycle.sweep_interval_secs,
                ),
            },
            viewer: ViewerConfig {
                auto_advance_secs: pick(
                    self.viewer.auto_advance_secs,
                    defaults.viewer.auto_advance_secs,
                ),
                swipe_threshold_px: if self.viewer.swipe_threshold_px.is_finite()
                    && self.viewer.swipe_threshold_px >= 0.0
                {
                    self.viewer.swipe_threshold_px
                } else {
                    defaults.viewer.swipe_threshold_px
                },
                tap_zone_fraction: if self.viewer.tap_zone_fraction > 0.0
                    && self.viewer.tap_zone_fraction < 0.5
                {
                    self.viewer.tap_zone_fraction
                } else {
                    defaults.viewer.tap_zone_fraction
                },
            },
            image: ImageConfig {
                max_width: if self.image.max_width == 0 {
                    defaults.image.max_width
                } else {
                    self.image.max_width
                },
                max_height: if self.image.max_height == 0 {
                    defaults.image.max_height
                } else {
                    self.image.max_height
                },
                jpeg_quality: if (1..=100).contains(&self.image.jpeg_quality) {
                    self.image.jpeg_quality
                } else {
                    defaults.image.jpeg_quality
                },
            },
        }
    }
}

/// Where the story collection is persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_slot_key")]
    pub slot_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            slot_key: default_slot_key(),
        }
    }
}

fn default_slot_key() -> String {
    "stories_data".to_string()
}

/// Expiry settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            expiry_hours: default_expiry_hours(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_expiry_hours() -> u64 {
    24
}

fn default_sweep_interval_secs() -> u64 {
    60
}

/// Full-screen viewer settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_auto_advance_secs")]
    pub auto_advance_secs: u64,
    #[serde(default = "default_swipe_threshold_px")]
    pub swipe_threshold_px: f32,
    /// Width fraction of each side tap zone; the middle stays inert.
    #[serde(default = "default_tap_zone_fraction")]
    pub tap_zone_fraction: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            auto_advance_secs: default_auto_advance_secs(),
            swipe_threshold_px: default_swipe_threshold_px(),
            tap_zone_fraction: default_tap_zone_fraction(),
        }
    }
}

fn default_auto_advance_secs() -> u64 {
    5
}

fn default_swipe_threshold_px() -> f32 {
    50.0
}

fn default_tap_zone_fraction() -> f32 {
    0.3
}

/// Image intake bounds and encoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    #[serde(default = "default_max_height")]
    pub max_height: u32,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            max_height: default_max_height(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

fn default_max_width() -> u32 {
    1080
}

fn default_max_height() -> u32 {
    1920
}

fn default_jpeg_quality() -> u8 {
    90
}

/// Errors that can occur when loading or saving config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let temp = tempdir().unwrap();
        let config = StoriesConfig::load(&StoriesConfig::path(temp.path())).unwrap();

        assert_eq!(config, StoriesConfig::default());
        assert_eq!(config.storage.slot_key, "stories_data");
        assert_eq!(config.lifecycle.expiry_hours, 24);
        assert_eq!(config.lifecycle.sweep_interval_secs, 60);
        assert_eq!(config.viewer.auto_advance_secs, 5);
        assert_eq!(config.image.max_width, 1080);
        assert_eq!(config.image.max_height, 1920);
        assert_eq!(config.image.jpeg_quality, 90);
    }

    #[test]
    fn save_then_load() {
        let temp = tempdir().unwrap();
        let path = StoriesConfig::path(temp.path());

        let mut config = StoriesConfig::default();
        config.viewer.auto_advance_secs = 8;
        config.image.jpeg_quality = 75;
        config.save(&path).unwrap();

        assert_eq!(StoriesConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempdir().unwrap();
        let path = StoriesConfig::path(temp.path());
        std::fs::write(&path, "[viewer]\nauto_advance_secs = 3\n").unwrap();

        let config = StoriesConfig::load(&path).unwrap();
        assert_eq!(config.viewer.auto_advance_secs, 3);
        assert_eq!(config.viewer.swipe_threshold_px, 50.0);
        assert_eq!(config.lifecycle, LifecycleConfig::default());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let temp = tempdir().unwrap();
        let path = StoriesConfig::path(temp.path());
        std::fs::write(&path, "viewer = [").unwrap();

        assert!(matches!(
            StoriesConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(StoriesConfig::default().validate().is_empty());
    }

    #[test]
    fn invalid_values_are_reported_and_replaced() {
        let mut config = StoriesConfig::default();
        config.storage.slot_key = "  ".to_string();
        config.lifecycle.expiry_hours = 0;
        config.viewer.tap_zone_fraction = 0.7;
        config.image.jpeg_quality = 0;

        assert_eq!(config.validate().len(), 4);

        let fixed = config.with_defaults_for_invalid();
        assert!(fixed.validate().is_empty());
        assert_eq!(fixed, StoriesConfig::default());
    }
}
