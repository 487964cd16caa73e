//! HTTP transport seam and its reqwest implementation.

use std::sync::Arc;
use std::time::Duration;

use sheet_intent_core::EndpointSettings;
use thiserror::Error;
use tracing::debug;

/// Raw HTTP reply: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Body text
    pub body: String,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The request never produced a response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    /// Connection, TLS, timeout or body read failure
    #[error("Request to {url} failed: {reason}")]
    Request {
        /// Target URL
        url: String,
        /// Underlying failure
        reason: String,
    },
}

/// Sends a JSON body with POST and returns whatever came back.
///
/// Non-2xx statuses are responses, not transport errors.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    /// POST `body` as `application/json` to `url`.
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport> HttpTransport for Arc<T> {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError> {
        (**self).post_json(url, body).await
    }
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport; `None` leaves requests without a client-side timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Create a transport from endpoint settings (`timeout_secs = 0` means none).
    pub fn from_settings(settings: &EndpointSettings) -> Result<Self, TransportError> {
        let timeout = (settings.timeout_secs > 0).then(|| Duration::from_secs(settings.timeout_secs));
        Self::new(timeout)
    }
}

impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError> {
        let request_error = |e: reqwest::Error| TransportError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        };

        debug!(url, bytes = body.len(), "POST");
        let resp = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(request_error)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(request_error)?;
        Ok(HttpResponse { status, body })
    }
}
