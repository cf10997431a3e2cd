//! Engine configuration.
//!
//! Configuration is read from environment variables and may then be
//! overridden by command-line flags.
//!
//! # Environment Variables
//!
//! - `BTREE_DEFAULT_DEGREE`: degree used by `init` when none is given (default: `3`)
//! - `BTREE_STATE_FILE`: snapshot file restored before and saved after each command
//! - `BTREE_PRETTY`: `1`/`true` to indent JSON output (default: compact)
//! - `BTREE_LOG`: tracing filter directive (default: `warn`)

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{DEFAULT_DEGREE, MIN_DEGREE};

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Degree used by `init` when no degree is given.
    pub default_degree: usize,
    /// Snapshot file the CLI restores from and saves to.
    pub state_file: Option<PathBuf>,
    /// Indent JSON output.
    pub pretty: bool,
    /// Tracing filter directive.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_degree: DEFAULT_DEGREE,
            state_file: None,
            pretty: false,
            log_filter: Self::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineConfig {
    pub const DEFAULT_LOG_FILTER: &'static str = "warn";

    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `BTREE_DEFAULT_DEGREE` is not an integer ≥ 2 or
    /// `BTREE_PRETTY` is not a recognized boolean.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("BTREE_DEFAULT_DEGREE") {
            config.default_degree = Self::parse_degree(&raw)?;
        }
        if let Some(raw) = lookup("BTREE_STATE_FILE").filter(|raw| !raw.is_empty()) {
            config.state_file = Some(PathBuf::from(raw));
        }
        if let Some(raw) = lookup("BTREE_PRETTY") {
            config.pretty = Self::parse_bool("BTREE_PRETTY", &raw)?;
        }
        if let Some(raw) = lookup("BTREE_LOG").filter(|raw| !raw.is_empty()) {
            config.log_filter = raw;
        }

        Ok(config)
    }

    fn parse_degree(raw: &str) -> Result<usize, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            name: "BTREE_DEFAULT_DEGREE".to_string(),
            message,
        };
        let degree = raw
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid(format!("'{}' is not a degree: {}", raw, e)))?;
        if degree < MIN_DEGREE {
            return Err(invalid(format!("must be at least {}", MIN_DEGREE)));
        }
        Ok(degree)
    }

    fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                name: name.to_string(),
                message: format!("'{}' is not a boolean", raw),
            }),
        }
    }
}
