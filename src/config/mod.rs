//! Configuration management for harvester.
//!
//! Configuration is read from `--config PATH`, or from
//! `~/.config/harvester/config.toml` when that file exists. Without either,
//! built-in defaults matching the VnExpress markup are used. Missing fields
//! in a config file fall back to their defaults.

pub mod browser;
pub mod fetch;

pub use browser::{BrowserBackend, BrowserConfig, DEFAULT_ENDPOINT, ENDPOINT_ENV};
pub use fetch::{ExpanderConfig, FetchConfig};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserConfig,
    pub fetch: FetchConfig,
    pub expander: ExpanderConfig,
}

impl Config {
    /// Load configuration and apply environment overrides.
    ///
    /// An explicit path must exist. Without one, the default path is read
    /// if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Ok(default_path) if default_path.exists() => Self::from_file(&default_path)?,
                _ => Self::default(),
            },
        };

        config.browser.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/harvester/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("harvester").join("config.toml"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
