//! TOML-based office configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{OfficeConfig, DEFAULT_NEIGHBOR_CAPACITY, MAX_LEASE_DURATION_SECS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {error}")]
    Io { path: String, error: String },

    #[error("Malformed config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    office: OfficeConfig,
}

/// Loads `OfficeConfig` from the `[office]` table of a TOML document.
///
/// # Config File Format
///
/// ```toml
/// [office]
/// k = 3
/// settling_delay_ms = 3000
/// lease_duration_secs = 60
/// lease_sweep_interval_secs = 10
/// delivery_timeout_ms = 5000
/// max_delivery_failures = 3
/// ```
///
/// Missing keys, or a missing `[office]` table, fall back to the defaults.
/// Other tables in the same document are ignored.
#[derive(Debug, Clone)]
pub struct TomlConfigProvider {
    config: OfficeConfig,
}

impl TomlConfigProvider {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        validate(&file.office)?;
        Ok(Self {
            config: file.office,
        })
    }

    pub fn config(&self) -> &OfficeConfig {
        &self.config
    }

    pub fn into_config(self) -> OfficeConfig {
        self.config
    }
}

fn validate(config: &OfficeConfig) -> Result<(), ConfigError> {
    if config.k == 0 || config.k > DEFAULT_NEIGHBOR_CAPACITY {
        return Err(ConfigError::Invalid(format!(
            "k must be between 1 and {DEFAULT_NEIGHBOR_CAPACITY}"
        )));
    }
    if config.lease_duration_secs == 0 || config.lease_duration_secs > MAX_LEASE_DURATION_SECS {
        return Err(ConfigError::Invalid(format!(
            "lease_duration_secs must be between 1 and {MAX_LEASE_DURATION_SECS}"
        )));
    }
    if config.lease_sweep_interval_secs == 0 {
        return Err(ConfigError::Invalid(
            "lease_sweep_interval_secs must be positive".to_string(),
        ));
    }
    if config.max_delivery_failures == 0 {
        return Err(ConfigError::Invalid(
            "max_delivery_failures must be positive".to_string(),
        ));
    }
    Ok(())
}
