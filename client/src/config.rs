//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_DISMISS_SECS: u64 = 5;
pub const DEFAULT_SESSION_FILE: &str = ".ponto-session.json";

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} (expected whole seconds)")]
    InvalidSeconds { var: &'static str, value: String },
    #[error("invalid base URL {0:?}: expected http:// or https://")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// How long a capture notice stays up before the screen resets.
    pub dismiss_after: Duration,
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            dismiss_after: Duration::from_secs(DEFAULT_DISMISS_SECS),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `PONTO_BASE_URL`: default `http://localhost:5000`
    /// - `PONTO_TIMEOUT_SECS`: default 10
    /// - `PONTO_CONNECT_TIMEOUT_SECS`: default 5
    /// - `PONTO_DISMISS_SECS`: default 5
    /// - `PONTO_SESSION_FILE`: default `.ponto-session.json`
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or the base URL
    /// has no http(s) scheme.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(
            &std::env::var("PONTO_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
        )?;
        let request_timeout = env_seconds("PONTO_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let connect_timeout = env_seconds("PONTO_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;
        let dismiss_after = env_seconds("PONTO_DISMISS_SECS", DEFAULT_DISMISS_SECS)?;
        let session_file = std::env::var("PONTO_SESSION_FILE")
            .map_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        Ok(Self { base_url, request_timeout, connect_timeout, dismiss_after, session_file })
    }

    /// Replace the base URL, applying the same normalization as `from_env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL has no http(s) scheme.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(raw)?;
        Ok(self)
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn env_seconds(var: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidSeconds { var, value }),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
