// tests/common/mod.rs
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::cache::auth_payload::AuthPayload;
use crate::cache::token_store::TokenStore;
use crate::config::settings::ClientConfig;
use crate::helpers::time::now_i64;
use crate::transport::{HttpGet, HttpResponse, TransportError};
use crate::TokenManager;

pub const ENDPOINT: &str = "https://x/api/";
pub const TOKEN_URL: &str = "https://x/api/auth/token/";
pub const ISSUER: &str = "https://x/api/auth/token";
pub const DEVELOPER_KEY: &str = "dev-key";

/// One GET as seen by the fake transport
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

/// Scripted transport: answers calls in order and records them.
#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_json(self, status: u16, body: Value) -> Self {
        self.push_raw(status, &body.to_string())
    }

    pub fn push_raw(self, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse::new(status, body.as_bytes())));
        self
    }

    pub fn push_error(self, message: &str) -> Self {
        self.responses.lock().unwrap().push_back(Err(TransportError::new(message)));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl HttpGet for FakeTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        query: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_owned(),
            headers: headers.to_vec(),
            query: query.to_vec(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted response")))
    }
}

pub fn token_body(token: &str, exp: i64) -> Value {
    json!({"data": {"token": token, "exp": exp, "iss": ISSUER}})
}

pub fn in_an_hour() -> i64 {
    now_i64() + 3600
}

pub fn config(cache_dir: &Path) -> ClientConfig {
    ClientConfig::new(DEVELOPER_KEY)
        .with_endpoint(ENDPOINT)
        .with_cache_dir(cache_dir)
}

pub async fn manager(config: ClientConfig, transport: FakeTransport) -> TokenManager<FakeTransport> {
    TokenManager::with_transport(config, transport).await.expect("manager")
}

pub async fn seed_cache(cache_dir: &Path, payload: &AuthPayload) {
    let store = TokenStore::new(config(cache_dir).cache_file());
    store.initialize().await.expect("initialize cache");
    store.save(payload).await.expect("seed cache");
}

pub fn cache_content(cache_dir: &Path) -> String {
    std::fs::read_to_string(cache_dir.join("payload.json")).expect("read cache")
}

pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}
