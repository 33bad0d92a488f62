//! Monitor process configuration.
//!
//! Loaded from environment variables; the config service URL is the one
//! required piece.

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::duration::{parse_duration, DurationError};
use crate::probe::DEFAULT_PROBE_TIMEOUT;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),
    #[error("parse {var}: {source}")]
    InvalidDuration {
        var: &'static str,
        #[source]
        source: DurationError,
    },
}

/// Monitor configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Base URL of the config service serving `/endpoints`.
    pub config_url: String,
    /// Webhook for alert-class events; alerts stay log-only when unset.
    pub webhook_url: Option<String>,
    /// Bound on a single check (default: 10s).
    pub probe_timeout: Duration,
}

impl MonitorConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MEOW_CONFIG_URL`: config service base URL (required)
    /// - `MEOW_WEBHOOK_URL`: alert webhook URL (optional)
    /// - `MEOW_PROBE_TIMEOUT`: per-check timeout, e.g. `"10s"` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let config_url =
            env::var("MEOW_CONFIG_URL").map_err(|_| ConfigError::Missing("MEOW_CONFIG_URL"))?;
        let webhook_url = env::var("MEOW_WEBHOOK_URL").ok();
        let probe_timeout = match env::var("MEOW_PROBE_TIMEOUT") {
            Ok(raw) => parse_duration(&raw).map_err(|source| ConfigError::InvalidDuration {
                var: "MEOW_PROBE_TIMEOUT",
                source,
            })?,
            Err(_) => DEFAULT_PROBE_TIMEOUT,
        };
        Ok(Self {
            config_url,
            webhook_url,
            probe_timeout,
        })
    }
}
