//! Run settings and the event config document loader.

pub mod loader;

pub use loader::{load_config, parse_config, validate_entry, DocumentFormat, EventEntry, LoadedConfig};

use crate::common::constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::common::error::{Result, ScraperError};
use std::time::Duration;

/// Settings that apply to every fetch in a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub timeout: Duration,
}

impl Settings {
    pub fn new(base_url: impl Into<String>, timeout_secs: f64) -> Result<Self> {
        let base_url = base_url.into().trim().to_string();
        if base_url.is_empty() {
            return Err(ScraperError::config("base URL must not be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ScraperError::config(format!(
                "base URL '{base_url}' must start with http:// or https://"
            )));
        }
        if !timeout_secs.is_finite() || timeout_secs <= 0.0 {
            return Err(ScraperError::config(format!(
                "timeout must be a positive number of seconds, got {timeout_secs}"
            )));
        }
        let timeout = Duration::try_from_secs_f64(timeout_secs).map_err(|e| {
            ScraperError::config(format!("timeout of {timeout_secs} seconds is out of range: {e}"))
        })?;
        Ok(Self { base_url, timeout })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
        }
    }
}
