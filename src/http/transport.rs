//! Request/response transport
//!
//! The fetcher only sees status, the `Retry-After` header and the body text;
//! everything else about the wire stays behind [`Transport`].

use super::request::PageRequest;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// What the fetcher needs from an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw `Retry-After` header value, if sent
    pub retry_after: Option<String>,
    /// Response body text
    pub body: String,
}

impl RawResponse {
    /// Create a response with a status and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }

    /// Set the `Retry-After` header value
    #[must_use]
    pub fn with_retry_after(mut self, value: impl Into<String>) -> Self {
        self.retry_after = Some(value.into());
        self
    }
}

/// Black-box GET primitive.
///
/// Connectivity problems (connect, DNS, timeout, body read) are reported as
/// [`Error::Transport`]; any HTTP status is a successful transport call.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one GET request
    async fn get(&self, request: &PageRequest, timeout: Duration) -> Result<RawResponse>;
}

/// Transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client with the given user agent
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &PageRequest, timeout: Duration) -> Result<RawResponse> {
        let mut req = self
            .client
            .get(&request.url)
            .query(&request.query_pairs())
            .timeout(timeout);

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(transport_error)?;

        debug!("HTTP {status} {}", request.url);
        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}

/// Map a reqwest failure; malformed requests are not worth retrying
fn transport_error(e: reqwest::Error) -> Error {
    if e.is_builder() {
        return Error::config(format!("Invalid request: {e}"));
    }
    Error::Transport {
        message: e.to_string(),
        timed_out: e.is_timeout(),
    }
}
