use std::collections::HashMap;

use http::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::cache::auth_payload::AuthPayload;
use crate::cache::token_store::TokenStore;
use crate::config::settings::ClientConfig;
use crate::errors::{NewsApiError, Result};
use crate::helpers::time::now_i64;
use crate::helpers::url::{issuer_matches, resource_url, token_url};
use crate::transport::{HttpGet, ReqwestTransport};
use crate::utils::constants::{BUFFER_SECONDS, DEVELOPER_KEY_PARAM, ID_PARAM};

/// `data` object of a successful token response
#[derive(Debug, Deserialize)]
struct TokenData {
    token: String,
    exp: i64,
    iss: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Keeps a usable bearer token around and gates every API call on it.
///
/// Each call to [`TokenManager::ensure_valid_token`] consults the on-disk
/// cache first and only goes to the token endpoint when the cached payload
/// is absent, expires within `BUFFER_SECONDS` or was minted by a different
/// endpoint. A fresh payload is persisted before it is adopted.
pub struct TokenManager<T = ReqwestTransport> {
    config: ClientConfig,
    store: TokenStore,
    transport: T,
    current: RwLock<Option<AuthPayload>>,
}

impl TokenManager<ReqwestTransport> {
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, transport).await
    }
}

impl<T: HttpGet> TokenManager<T> {
    /// Validate the config and prepare the token cache.
    pub async fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let store = TokenStore::new(config.cache_file());
        store.initialize().await?;
        Ok(Self {
            config,
            store,
            transport,
            current: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issuer expected on tokens for the configured endpoint
    pub fn token_url(&self) -> String {
        token_url(&self.config.endpoint)
    }

    /// Payload adopted by the last successful `ensure_valid_token`
    pub async fn current_payload(&self) -> Option<AuthPayload> {
        self.current.read().await.clone()
    }

    pub async fn ensure_valid_token(&self) -> Result<AuthPayload> {
        let result = self.resolve_payload().await;
        let mut current = self.current.write().await;
        match result {
            Ok(payload) => {
                *current = Some(payload.clone());
                Ok(payload)
            }
            Err(err) => {
                *current = None;
                Err(err)
            }
        }
    }

    async fn resolve_payload(&self) -> Result<AuthPayload> {
        let now = now_i64();
        let expected_issuer = self.token_url();

        match self.store.load().await {
            Some(cached) if cached.is_usable(now, BUFFER_SECONDS, &expected_issuer) => {
                debug!("cached token valid for {} more seconds", cached.seconds_left(now));
                return Ok(cached);
            }
            Some(cached) => info!(
                "cached token unusable (expires in {}s, issuer '{}'), refreshing",
                cached.seconds_left(now),
                cached.issuer
            ),
            None => info!("no cached token, authenticating"),
        }

        let fresh = self.fetch_payload(&expected_issuer).await?;
        self.store.save(&fresh).await?;
        info!("token refreshed, expires in {}s", fresh.seconds_left(now));
        Ok(fresh)
    }

    async fn fetch_payload(&self, token_url: &str) -> Result<AuthPayload> {
        let query = [(DEVELOPER_KEY_PARAM.to_owned(), self.config.developer_key.clone())];
        let response = self
            .transport
            .get(token_url, &[], &query)
            .await
            .inspect_err(|err| error!("token request to {} failed: {}", token_url, err))?;

        let body: Option<Value> = serde_json::from_slice(&response.body).ok();
        if let Some(errors) = body.as_ref().and_then(|body| body.get("errors")).filter(|e| !e.is_null()) {
            let detail = error_detail(errors);
            error!("token request rejected with status {}: {}", response.status, detail);
            return Err(NewsApiError::Authentication(detail));
        }
        if !response.is_ok() {
            error!("token request rejected with status {}", response.status);
            return Err(NewsApiError::Authentication(format!("HTTP {}", response.status)));
        }

        let data = body
            .ok_or_else(|| NewsApiError::Authentication("token response is not valid JSON".to_owned()))?
            .get_mut("data")
            .map(Value::take)
            .ok_or_else(|| NewsApiError::Authentication("token response has no data object".to_owned()))?;
        let data: TokenData = serde_json::from_value(data)
            .map_err(|err| NewsApiError::Authentication(format!("malformed token data: {}", err)))?;
        if data.token.is_empty() {
            return Err(NewsApiError::Authentication("token response carries an empty token".to_owned()));
        }

        let issuer = data
            .iss
            .filter(|iss| !iss.is_empty())
            .unwrap_or_else(|| token_url.to_owned());
        if !issuer_matches(&issuer, token_url) {
            warn!("token issued by '{}' instead of '{}', it will not be reused", issuer, token_url);
        }

        Ok(AuthPayload {
            token: data.token,
            expires_at: data.exp,
            issuer,
            extra: data.extra,
        })
    }

    /// GET `{endpoint}{resource_path}` with the bearer token attached.
    ///
    /// An `id` parameter selects a single resource by path instead of being
    /// sent as a query filter. A 200 body is returned as-is, even when it
    /// carries an `errors` field.
    pub async fn authorized_get(&self, resource_path: &str, params: &HashMap<String, String>) -> Result<Value> {
        let payload = self.ensure_valid_token().await?;

        let id = params.get(ID_PARAM).map(String::as_str);
        let mut query: Vec<(String, String)> = params
            .iter()
            .filter(|(key, _)| key.as_str() != ID_PARAM)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        query.sort();

        let url = resource_url(&self.config.endpoint, resource_path, id);
        let headers = [(AUTHORIZATION.as_str().to_owned(), format!("Bearer {}", payload.token))];
        let response = self
            .transport
            .get(&url, &headers, &query)
            .await
            .inspect_err(|err| error!("request to {} failed: {}", url, err))?;

        if !response.is_ok() {
            warn!("request to {} answered with status {}", url, response.status);
            return Err(NewsApiError::RequestFailed(response.status));
        }

        let body: Value = serde_json::from_slice(&response.body)
            .map_err(|err| NewsApiError::InvalidResponse(format!("{}: {}", url, err)))?;
        if let Some(errors) = body.get("errors").filter(|e| !e.is_null()) {
            warn!("request to {} returned errors: {}", url, error_detail(errors));
        }
        Ok(body)
    }
}

/// Human readable rendering of an API `errors` field
fn error_detail(errors: &Value) -> String {
    match errors {
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(|item| match item {
                Value::String(message) => message.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}
