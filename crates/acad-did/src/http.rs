//! # HTTP Fetch Capability
//!
//! [`HttpFetcher`] implements [`Fetch`] over `reqwest`. Non-2xx answers are
//! returned as responses for the caller to interpret; only transport
//! failures are errors. There is one request per call and no retry.

use std::time::Duration;

use acad_core::{Fetch, FetchError, FetchResponse};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// reqwest-backed fetcher for DID documents and status lists.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("acad-did/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport {
                url: String::new(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let transport = |e: reqwest::Error| {
            tracing::warn!(url, error = %e, "fetch failed");
            FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            }
        };

        let resp = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(transport)?;
        tracing::debug!(url, status, bytes = body.len(), "fetched");
        Ok(FetchResponse {
            status,
            body: body.to_vec(),
        })
    }
}
