// src/config.rs

//! Configuration file
//!
//! ```toml
//! [export]
//! format = "yaml"
//! layout = "default"
//!
//! [import]
//! format = "yaml"
//! ```
//!
//! Every key is optional. Command line flags take precedence.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::adapter::{Format, Layout};

/// Default path of the configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "envtree.toml";

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Export defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    #[serde(default)]
    pub format: Format,

    #[serde(default)]
    pub layout: Layout,
}

/// Import defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    #[serde(default)]
    pub format: Format,
}

/// Parsed `envtree.toml`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvtreeConfig {
    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub import: ImportConfig,
}

impl EnvtreeConfig {
    /// Parse configuration text
    pub fn parse(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a configuration file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Load configuration from an explicit path or the default location
///
/// An explicit path must exist. A missing file at the default location
/// yields the defaults.
pub fn load_config(path: Option<&Path>) -> ConfigResult<EnvtreeConfig> {
    match path {
        Some(path) => EnvtreeConfig::from_file(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                EnvtreeConfig::from_file(default)
            } else {
                Ok(EnvtreeConfig::default())
            }
        }
    }
}
