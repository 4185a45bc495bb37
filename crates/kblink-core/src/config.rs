//! kblink Configuration Management
//!
//! Handles configuration from environment variables and config files
//! with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{KblinkError, Result};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Entity-linker behavior
    pub linker: LinkerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("KBLINK_LEMMATIZE") {
            config.linker.lemmatize = parse_bool("KBLINK_LEMMATIZE", &value)?;
        }
        if let Ok(value) = std::env::var("KBLINK_FILTER_IMPLAUSIBLE") {
            config.linker.filter_implausible = parse_bool("KBLINK_FILTER_IMPLAUSIBLE", &value)?;
        }
        if let Ok(value) = std::env::var("KBLINK_VERBOSE_LOGGING") {
            config.linker.verbose_logging = parse_bool("KBLINK_VERBOSE_LOGGING", &value)?;
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| KblinkError::Config(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&content)
            .map_err(|e| KblinkError::Config(format!("failed to parse {}: {e}", path.display())))
    }
}

/// Entity-linker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkerConfig {
    /// Expand tier-1 lookups with per-token lemma variants
    pub lemmatize: bool,

    /// Prune human-typed candidates for definitional questions
    pub filter_implausible: bool,

    /// Log the top candidate identifiers per resolve call
    /// (diagnostics only, no behavioral effect)
    pub verbose_logging: bool,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            lemmatize: true,
            filter_implausible: true,
            verbose_logging: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(KblinkError::Config(format!(
            "invalid value for {key}: {value}"
        ))),
    }
}
