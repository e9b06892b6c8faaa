//! Probe configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! The browser client read its API base URL and fetch defaults from ambient
//! globals. Here they are an explicit value handed to the probe so tests can
//! point it at a mock backend without touching process state.

use std::time::Duration;

use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

pub const DEFAULT_USER_CHECK_PATH: &str = "/user/check";
pub const DEFAULT_FACE_CHECK_PATH: &str = "/faceAuth/verify-auth";
pub const DEFAULT_MIN_VERIFY_MS: u64 = 2000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    MissingVar(&'static str),
    #[error("invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid default header '{0}'")]
    InvalidHeader(String),
}

/// Where and how the auth probe talks to the backend.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Base URL without a trailing slash.
    pub api_url: String,
    /// Password-session check endpoint, relative to `api_url`.
    pub user_check_path: String,
    /// Biometric-session check endpoint, relative to `api_url`.
    pub face_check_path: String,
    /// Headers attached to every probe request.
    pub default_headers: HeaderMap,
    /// Minimum time the protected guard keeps its loading view up.
    pub min_verify_delay: Duration,
}

impl ProbeConfig {
    /// Build a config with default endpoints and headers for `api_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `api_url` is not an absolute
    /// http(s) URL.
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_api_url(api_url)?,
            user_check_path: DEFAULT_USER_CHECK_PATH.to_owned(),
            face_check_path: DEFAULT_FACE_CHECK_PATH.to_owned(),
            default_headers: default_headers(),
            min_verify_delay: Duration::from_millis(DEFAULT_MIN_VERIFY_MS),
        })
    }

    /// Build typed probe config from environment variables.
    ///
    /// Required:
    /// - `API_URL`
    ///
    /// Optional:
    /// - `AUTH_USER_CHECK_PATH`: default `/user/check`
    /// - `AUTH_FACE_CHECK_PATH`: default `/faceAuth/verify-auth`
    /// - `AUTH_MIN_VERIFY_MS`: default 2000
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `API_URL` is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var("API_URL").map_err(|_| ConfigError::MissingVar("API_URL"))?;
        Self::from_env_with_api_url(&api_url)
    }

    /// Like [`ProbeConfig::from_env`], with the base URL supplied by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `api_url` is malformed.
    pub fn from_env_with_api_url(api_url: &str) -> Result<Self, ConfigError> {
        let mut config = Self::new(api_url)?;

        if let Ok(path) = std::env::var("AUTH_USER_CHECK_PATH") {
            config.user_check_path = normalize_path(&path);
        }
        if let Ok(path) = std::env::var("AUTH_FACE_CHECK_PATH") {
            config.face_check_path = normalize_path(&path);
        }
        config.min_verify_delay = Duration::from_millis(env_parse("AUTH_MIN_VERIFY_MS", DEFAULT_MIN_VERIFY_MS));

        Ok(config)
    }

    /// Add (or override) a header sent with every probe request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHeader`] if the name or value is not a
    /// legal HTTP header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ConfigError> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| ConfigError::InvalidHeader(name.to_owned()))?;
        let value = HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader(name.to_string()))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    #[must_use]
    pub fn user_check_url(&self) -> String {
        format!("{}{}", self.api_url, self.user_check_path)
    }

    #[must_use]
    pub fn face_check_url(&self) -> String {
        format!("{}{}", self.api_url, self.face_check_path)
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidUrl { url: raw.to_owned(), reason: e.to_string() })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl { url: raw.to_owned(), reason: "scheme must be http or https".into() });
    }
    Ok(trimmed.to_owned())
}

fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('/') { trimmed.to_owned() } else { format!("/{trimmed}") }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
