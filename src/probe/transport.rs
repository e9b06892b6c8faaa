//! HTTP transport used by the auth probe.
//!
//! A request that produced any HTTP response is `Ok`, whatever its status;
//! only network-level failures (connect refused, reset, unreadable body) are
//! errors. Status interpretation belongs to the probe.

use async_trait::async_trait;
use reqwest::header::HeaderMap;

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// True for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// A response arrived but its body could not be read.
    #[error("response body read failed: {0}")]
    Body(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

/// Issues a GET request. Enables mocking in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `GET url` with exactly `headers` attached.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response could be obtained.
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<RawResponse, TransportError>;
}

/// Production transport over a shared `reqwest` client.
///
/// No request timeout is configured: the probe waits for both endpoints to
/// settle however long that takes. Dropping the future aborts the request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the TLS backend fails to
    /// initialize.
    pub fn new() -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        Ok(Self { http })
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<RawResponse, TransportError> {
        let response = self
            .http
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
