//! Rune style configuration system
//!
//! This crate provides configuration for the style engine, loading settings
//! from `rune-style.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default file name looked up by [`StyleConfig::load_or_default`].
pub const CONFIG_FILE_NAME: &str = "rune-style.toml";

/// Default distance-per-millisecond divisor for implicit transition durations.
pub const DEFAULT_SPEED: f64 = 1.7;

/// Default duration of `scale_to` when the caller gives none.
pub const DEFAULT_SCALE_DURATION_MS: u64 = 200;

/// Errors raised while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for a style engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Write style text straight into the attached render target instead of
    /// notifying the observer. The two modes are mutually exclusive.
    pub mutate_target: bool,
    /// Distance units per millisecond used to derive transition durations.
    pub speed: f64,
    /// Per-property unit overrides, keyed by property name (`x`, `rotation`, ...).
    pub units: BTreeMap<String, String>,
    /// Duration used by `scale_to` when none is given.
    pub scale_duration_ms: u64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            mutate_target: false,
            speed: DEFAULT_SPEED,
            units: BTreeMap::new(),
            scale_duration_ms: DEFAULT_SCALE_DURATION_MS,
        }
    }
}

impl StyleConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `rune-style.toml` in the current directory,
    /// or return the default configuration if it is missing or malformed.
    pub fn load_or_default() -> Self {
        Self::load_from_file(CONFIG_FILE_NAME).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Unparseable values are ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("RUNE_STYLE_SPEED") {
            if let Ok(speed) = val.parse::<f64>() {
                if speed.is_finite() && speed > 0.0 {
                    self.speed = speed;
                }
            }
        }
        if let Ok(val) = std::env::var("RUNE_STYLE_MUTATE_TARGET") {
            self.mutate_target = val == "1" || val.eq_ignore_ascii_case("true");
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune-style.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "speed must be a positive number, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = StyleConfig::default();
        assert!(!config.mutate_target);
        assert_eq!(config.speed, 1.7);
        assert!(config.units.is_empty());
        assert_eq!(config.scale_duration_ms, 200);
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = StyleConfig::default();
        config.units.insert("rotation".to_string(), "deg".to_string());
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: StyleConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mutate_target = true\n\n[units]\nx = \"em\"").unwrap();

        let config = StyleConfig::load_from_file(file.path()).unwrap();
        assert!(config.mutate_target);
        assert_eq!(config.speed, DEFAULT_SPEED);
        assert_eq!(config.units.get("x").map(String::as_str), Some("em"));
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "speed = 0.0").unwrap();

        let err = StyleConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StyleConfig::load_from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if rune-style.toml doesn't exist
        let config = StyleConfig::load_or_default();
        assert!(config.speed > 0.0);
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("RUNE_STYLE_SPEED", "3.4");
            std::env::set_var("RUNE_STYLE_MUTATE_TARGET", "true");
        }

        let mut config = StyleConfig::default();
        config.merge_with_env();

        assert_eq!(config.speed, 3.4);
        assert!(config.mutate_target);

        unsafe {
            std::env::remove_var("RUNE_STYLE_SPEED");
            std::env::remove_var("RUNE_STYLE_MUTATE_TARGET");
        }
    }
}
