//! Configuration loading for synctrack.
//!
//! Configuration is read from an optional TOML file passed with
//! `--config`. Every field has a default, so an empty file (or no file)
//! is valid. Command-line flags override the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration for synctrack.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Trace replay configuration.
    #[serde(default)]
    pub replay: ReplayConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Trace replay configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayConfig {
    /// Harvest changes after this many events (default: 0 = only at the end).
    #[serde(default = "default_harvest_every")]
    pub harvest_every: usize,
    /// Print indented JSON instead of one record per line (default: false).
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directives used when neither an env var nor a flag sets one
    /// (default: "warn").
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_harvest_every() -> usize {
    0
}

fn default_pretty() -> bool {
    false
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            harvest_every: default_harvest_every(),
            pretty: default_pretty(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load from `path` if one was given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
