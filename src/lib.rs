//! # News API Client Library
//!
//! Exchanges a developer key for a short-lived bearer token, keeps that
//! token in an on-disk cache and forwards read requests to the API
//! resource endpoints with the token attached.
//!
//! Modules:
//! - `config` — client configuration and YAML / environment loading
//! - `cache` — the cached auth payload and its on-disk store
//! - `auth` — token lifecycle manager and authorized requests
//! - `transport` — the HTTP GET collaborator (reqwest-backed)

pub mod auth;
pub mod cache;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::auth::token_manager::TokenManager;
pub use crate::cache::auth_payload::AuthPayload;
pub use crate::cache::token_store::TokenStore;
pub use crate::config::settings::{ClientConfig, ServiceConfig};
pub use crate::errors::{NewsApiError, Result};
pub use crate::transport::{HttpGet, HttpResponse, TransportError};
