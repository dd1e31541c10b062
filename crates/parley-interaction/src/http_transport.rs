//! `TransportClient` backed by `reqwest`.

use async_trait::async_trait;
use parley_core::error::TransportError;
use parley_core::transport::{HttpMethod, TransportClient, TransportRequest, TransportResponse};
use reqwest::Client;
use std::time::Duration;

/// Per-request timeout; a single hung exchange must not stall a poll loop.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport using a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidRequest` if the TLS backend cannot be
    /// initialised.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::InvalidRequest(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client, keeping its connection pool.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TransportClient for ReqwestTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(
            "[ReqwestTransport] {:?} {}",
            request.method,
            request.url
        );

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        tracing::debug!("[ReqwestTransport] {} -> {}", request.url, status);
        Ok(TransportResponse::new(status, body))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::InvalidRequest(err.to_string())
    } else {
        TransportError::Connection(err.to_string())
    }
}
