//! Engine configuration.
//!
//! # Responsibility
//! - Hold the timing windows used by the snapshot update policy.
//! - Hold logging bootstrap settings.
//! - Parse JSON configuration with defaults for missing fields.
//!
//! # Invariants
//! - `debounce_ms` and `input_recency_ms` are strictly positive.
//! - `logging.level` is one of `trace|debug|info|warn|error`.

use crate::logging::{default_log_level, normalize_level};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default quiet window before a structural edit triggers reconciliation.
pub const DEFAULT_DEBOUNCE_MS: i64 = 300;
/// Default window in which user input counts as recent.
pub const DEFAULT_INPUT_RECENCY_MS: i64 = 1_000;

/// Configuration parse/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Json(err) => write!(f, "invalid config json: {err}"),
            Self::InvalidValue { field, message } => write!(f, "invalid `{field}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Logging bootstrap settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `trace|debug|info|warn|error`, case-insensitive.
    pub level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Quiet window after the latest structural edit, in milliseconds.
    pub debounce_ms: i64,
    /// Window in which user input counts as recent, in milliseconds.
    pub input_recency_ms: i64,
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            input_recency_ms: DEFAULT_INPUT_RECENCY_MS,
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates configuration from JSON text.
    pub fn from_json_str(value: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Validates configuration invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "debounceMs",
                message: format!("must be > 0, got {}", self.debounce_ms),
            });
        }
        if self.input_recency_ms <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "inputRecencyMs",
                message: format!("must be > 0, got {}", self.input_recency_ms),
            });
        }
        normalize_level(&self.logging.level).map_err(|err| ConfigError::InvalidValue {
            field: "logging.level",
            message: err.to_string(),
        })?;
        Ok(())
    }
}
