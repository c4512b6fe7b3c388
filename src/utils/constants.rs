//! Shared constants and invariants

/// Production API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://news.wayne.edu/api/v1/";

/// A cached token expiring within this many seconds is refreshed
pub const BUFFER_SECONDS: i64 = 60;

pub const PAYLOAD_FILE_NAME: &str = "payload.json";
pub const TOKEN_PATH: &str = "auth/token";
pub const DEVELOPER_KEY_PARAM: &str = "developer_key";
pub const ID_PARAM: &str = "id";

// Environment variables read at the wiring boundary
pub const ENV_DEVELOPER_KEY: &str = "NEWS_API_KEY";
pub const ENV_ENDPOINT: &str = "NEWS_API_ENDPOINT";
pub const ENV_CACHE_DIR: &str = "NEWS_API_CACHE";
pub const ENV_INSECURE: &str = "NEWS_API_INSECURE";
