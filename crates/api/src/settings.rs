//! Service Configuration
//!
//! Loaded from a TOML file layered with `DATA_DESK__*` environment variables,
//! e.g. `DATA_DESK__SERVER__BIND_ADDR=127.0.0.1:9000`.

use config::{Config, Environment, File};
use data_cleaner::{CleaningConfig, CleaningError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use track_explorer::RegistryConfig;

use crate::rate_limit::RateLimitConfig;

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "data-desk.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "DATA_DESK";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Invalid cleaning configuration: {0}")]
    Cleaning(#[from] CleaningError),
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, `host:port`
    pub bind_addr: String,
    /// Largest accepted upload body in bytes
    pub max_upload_bytes: usize,
    /// How often idle explorer sessions are swept (seconds)
    pub sweep_interval_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            max_upload_bytes: 64 * 1024 * 1024,
            sweep_interval_seconds: 60,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub cleaning: CleaningConfig,
    pub explorer: RegistryConfig,
}

impl ApiConfig {
    /// Load from `path` (or [`DEFAULT_CONFIG_FILE`]) plus the environment
    ///
    /// An explicitly given file must exist. The default file is optional since
    /// every field has a default.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let required = path.is_some();
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let config: ApiConfig = Config::builder()
            .add_source(File::from(path).required(required))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        config.cleaning.validate()?;
        Ok(config)
    }
}
