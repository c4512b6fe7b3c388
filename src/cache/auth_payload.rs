use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::helpers::url::issuer_matches;

/// Auth payload as returned in the token response `data` object and
/// stored verbatim in `payload.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    /// UNIX TIMESTAMP
    #[serde(rename = "exp")]
    pub expires_at: i64,
    #[serde(rename = "iss")]
    pub issuer: String,
    /// any other fields the token endpoint sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthPayload {
    pub fn new(token: impl Into<String>, expires_at: i64, issuer: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at,
            issuer: issuer.into(),
            extra: Map::new(),
        }
    }

    pub fn seconds_left(&self, now: i64) -> i64 {
        self.expires_at.saturating_sub(now)
    }

    /// Usable iff the token is set, more than `buffer_seconds` remain and it
    /// was minted by `expected_issuer`.
    pub fn is_usable(&self, now: i64, buffer_seconds: i64, expected_issuer: &str) -> bool {
        !self.token.is_empty()
            && self.seconds_left(now) > buffer_seconds
            && issuer_matches(&self.issuer, expected_issuer)
    }
}
