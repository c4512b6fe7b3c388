//! Transport module
//!
//! The single HTTP capability the client needs: a GET with headers and
//! query parameters returning the raw status and body.

use thiserror::Error;

pub mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;

/// Status code and raw body of a completed GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Connection, TLS, timeout or body read failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

pub trait HttpGet {
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        query: &[(String, String)],
    ) -> impl std::future::Future<Output = Result<HttpResponse, TransportError>> + Send;
}
