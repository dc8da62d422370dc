//! Batch HTTP transport
//!
//! All requests of a batch are dispatched together and all responses
//! awaited together; the result vector is index-aligned with the input.
//! Providers report errors in-band, so non-2xx bodies are returned as
//! bodies and left for the result parser to classify.

use crate::error::{Result, RuntimeError};
use crate::provider::{HttpMethod, RequestSpec};
use async_trait::async_trait;

/// Batch fetch collaborator
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch every request, returning one result per request in order
    async fn fetch_all(&self, requests: &[RequestSpec]) -> Vec<Result<String>>;
}

/// HTTP transport backed by reqwest
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a timeout sized for slow audit endpoints
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| RuntimeError::Transport(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    async fn fetch_one(&self, request: &RequestSpec) -> Result<String> {
        tracing::debug!(url = %request.url, "dispatching request");

        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => {
                let mut builder = self.client.post(&request.url);
                if let Some(body) = &request.body {
                    builder = builder
                        .header("Content-Type", "application/json")
                        .body(body.clone());
                }
                builder
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| RuntimeError::Transport(format!("HTTP request failed: {}", e)))?;

        response
            .text()
            .await
            .map_err(|e| RuntimeError::Transport(format!("failed to read response body: {}", e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_all(&self, requests: &[RequestSpec]) -> Vec<Result<String>> {
        futures::future::join_all(requests.iter().map(|request| self.fetch_one(request))).await
    }
}
