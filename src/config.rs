//! Search configuration
//!
//! Loaded from an optional JSON file. Every field has a default, so `{}` is
//! a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::Severity;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config value '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "AERO_CONFIG_READ",
            ConfigError::Parse(_) => "AERO_CONFIG_PARSE",
            ConfigError::Invalid { .. } => "AERO_CONFIG_INVALID",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// How long resolving a named collection may block (default: 5000)
    #[serde(default = "default_collection_timeout_ms")]
    pub collection_timeout_ms: u64,

    /// Reuse join indexes across queries on an unchanged snapshot (default: false)
    #[serde(default)]
    pub index_cache_enabled: bool,

    /// Maximum cached join indexes (default: 64)
    #[serde(default = "default_index_cache_capacity")]
    pub index_cache_capacity: usize,

    /// Documents or values between cancellation checks (default: 1024)
    #[serde(default = "default_cancel_check_interval")]
    pub cancel_check_interval: usize,

    /// Rows returned when the request has no `rows` (default: 10)
    #[serde(default = "default_rows")]
    pub default_rows: usize,

    /// Largest accepted `rows` (default: 1000)
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    /// Wall-clock limit per search; unlimited when absent
    #[serde(default)]
    pub query_time_limit_ms: Option<u64>,
}

fn default_collection_timeout_ms() -> u64 {
    5000
}

fn default_index_cache_capacity() -> usize {
    64
}

fn default_cancel_check_interval() -> usize {
    1024
}

fn default_rows() -> usize {
    10
}

fn default_max_rows() -> usize {
    1000
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            collection_timeout_ms: default_collection_timeout_ms(),
            index_cache_enabled: false,
            index_cache_capacity: default_index_cache_capacity(),
            cancel_check_interval: default_cancel_check_interval(),
            default_rows: default_rows(),
            max_rows: default_max_rows(),
            query_time_limit_ms: None,
        }
    }
}

impl SearchConfig {
    /// Loads and validates configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: SearchConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.collection_timeout_ms == 0 {
            return Err(ConfigError::invalid("collection_timeout_ms", "must be > 0"));
        }
        if self.index_cache_enabled && self.index_cache_capacity == 0 {
            return Err(ConfigError::invalid(
                "index_cache_capacity",
                "must be > 0 when the index cache is enabled",
            ));
        }
        if self.cancel_check_interval == 0 {
            return Err(ConfigError::invalid("cancel_check_interval", "must be > 0"));
        }
        if self.default_rows > self.max_rows {
            return Err(ConfigError::invalid(
                "default_rows",
                format!("must not exceed max_rows ({})", self.max_rows),
            ));
        }
        if self.query_time_limit_ms == Some(0) {
            return Err(ConfigError::invalid("query_time_limit_ms", "must be > 0"));
        }
        Ok(())
    }
}
