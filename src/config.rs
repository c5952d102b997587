//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://languageboostergo.fly.dev";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const TOKEN_FILE_NAME: &str = "token.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API URL '{0}': expected http:// or https://")]
    InvalidApiUrl(String),
    #[error("invalid {key}: '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without a trailing slash.
    pub api_url: String,
    /// Where the persisted session token lives.
    pub token_file: PathBuf,
    pub timeouts: HttpTimeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `LANGUAGEBOOSTER_API_URL`: default `https://languageboostergo.fly.dev`
    /// - `LANGUAGEBOOSTER_TOKEN_FILE`: default `$HOME/.languagebooster/token.json`
    /// - `LANGUAGEBOOSTER_REQUEST_TIMEOUT_SECS`: default 30
    /// - `LANGUAGEBOOSTER_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a malformed URL or timeout value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = parse_api_url(std::env::var("LANGUAGEBOOSTER_API_URL").ok().as_deref())?;
        let token_file = std::env::var("LANGUAGEBOOSTER_TOKEN_FILE")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map_or_else(|| default_token_file(std::env::var("HOME").ok().as_deref()), PathBuf::from);
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64("LANGUAGEBOOSTER_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_u64("LANGUAGEBOOSTER_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { api_url, token_file, timeouts })
    }

    /// Replace the API URL, applying the same validation as [`Self::from_env`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] for a non-HTTP URL.
    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_api_url(Some(raw))?;
        Ok(self)
    }
}

fn env_parse_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        Err(_) => Ok(default),
    }
}

fn parse_api_url(raw: Option<&str>) -> Result<String, ConfigError> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(DEFAULT_API_URL);
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl(raw.to_owned()));
    }
    Ok(raw.trim_end_matches('/').to_owned())
}

fn default_token_file(home: Option<&str>) -> PathBuf {
    match home.filter(|h| !h.is_empty()) {
        Some(home) => PathBuf::from(home).join(".languagebooster").join(TOKEN_FILE_NAME),
        None => PathBuf::from(".languagebooster-token.json"),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
