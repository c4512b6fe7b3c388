use std::path::PathBuf;

use http::Uri;
use serde::Deserialize;

use crate::errors::{NewsApiError, Result};
use crate::utils::constants::{
    DEFAULT_ENDPOINT, ENV_CACHE_DIR, ENV_DEVELOPER_KEY, ENV_ENDPOINT, ENV_INSECURE, PAYLOAD_FILE_NAME,
};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub client: ClientConfig,
    pub logging: Option<LoggingConfig>,
}

/// ================================
/// Client
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub developer_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// no cache directory: every call re-authenticates
    #[serde(default, deserialize_with = "empty_path_as_none")]
    pub cache_dir: Option<PathBuf>,
    /// disables TLS certificate verification
    #[serde(default)]
    pub accept_invalid_certs: bool,
    pub timeout_seconds: Option<u64>,
}

impl ClientConfig {
    pub fn new(developer_key: impl Into<String>) -> Self {
        Self {
            developer_key: developer_key.into(),
            endpoint: default_endpoint(),
            cache_dir: None,
            accept_invalid_certs: false,
            timeout_seconds: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        let cache_dir = cache_dir.into();
        self.cache_dir = if cache_dir.as_os_str().is_empty() { None } else { Some(cache_dir) };
        self
    }

    /// `<cache_dir>/payload.json`, or `None` when caching is disabled
    pub fn cache_file(&self) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| dir.join(PAYLOAD_FILE_NAME))
    }

    /// Read the configuration from `NEWS_API_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let developer_key = std::env::var(ENV_DEVELOPER_KEY)
            .map_err(|_| NewsApiError::InvalidConfig(format!("{} is not set", ENV_DEVELOPER_KEY)))?;

        let mut config = Self::new(developer_key);
        if let Some(endpoint) = non_empty_env(ENV_ENDPOINT) {
            config = config.with_endpoint(endpoint);
        }
        if let Some(cache_dir) = non_empty_env(ENV_CACHE_DIR) {
            config = config.with_cache_dir(cache_dir);
        }
        config.accept_invalid_certs = non_empty_env(ENV_INSECURE)
            .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.developer_key.trim().is_empty() {
            return Err(NewsApiError::InvalidConfig("developer_key must not be empty".to_owned()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(NewsApiError::InvalidConfig("endpoint must not be empty".to_owned()));
        }
        let uri: Uri = self
            .endpoint
            .parse()
            .map_err(|err| NewsApiError::InvalidConfig(format!("endpoint '{}' is not a valid URL: {}", self.endpoint, err)))?;
        match uri.scheme_str() {
            Some("http") | Some("https") if uri.host().is_some() => Ok(()),
            _ => Err(NewsApiError::InvalidConfig(format!(
                "endpoint '{}' must be an absolute http(s) URL",
                self.endpoint
            ))),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn empty_path_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()).map(PathBuf::from))
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}
