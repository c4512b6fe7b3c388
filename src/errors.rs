use std::path::PathBuf;

use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, NewsApiError>;

/// Failures surfaced to callers of the client.
///
/// Cache read problems never show up here: an unreadable or malformed
/// `payload.json` is treated as "no cached token" and triggers a refresh.
#[derive(Error, Debug)]
pub enum NewsApiError {
    /// Cache directory or file could not be created or written
    #[error("cache storage failed at {path}: {reason}")]
    Storage { path: PathBuf, reason: String },

    /// Network level failure talking to the API
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Token endpoint rejected the developer key or answered with garbage
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Resource request answered with a non-200 status
    #[error("request failed with HTTP status {0}")]
    RequestFailed(u16),

    /// Resource request answered 200 with a body that is not JSON
    #[error("invalid response body: {0}")]
    InvalidResponse(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl NewsApiError {
    pub fn storage(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Storage {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// HTTP status of a failed resource request
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed(status) => Some(*status),
            _ => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}
