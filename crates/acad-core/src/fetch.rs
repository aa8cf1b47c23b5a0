//! # Fetch Capability
//!
//! DID-web resolution and revocation-list retrieval need to read documents
//! from the network. The core never does that itself: callers inject a
//! [`Fetch`] implementation and own its timeout, cancellation and retry
//! policy.
//!
//! [`MemoryFetcher`] is an in-process table of URL → document, used for
//! offline verification, pinned documents, and tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::FetchError;

/// A raw response from a fetch capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// A `200 OK` response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Injected network-fetch capability: `(url) -> document`.
///
/// Implementations must not retry on their own; a non-2xx status is
/// returned as a response, and only transport failures are `Err`.
pub trait Fetch: Send + Sync {
    /// Retrieve the document at `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send;
}

impl<T: Fetch> Fetch for &T {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send {
        (**self).fetch(url)
    }
}

impl<T: Fetch> Fetch for Arc<T> {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send {
        (**self).fetch(url)
    }
}

/// In-memory URL → response table.
///
/// Unknown URLs answer `404` with an empty body, mirroring an HTTP origin.
/// Interior mutability lets a test or a cache refresh a document (e.g. a
/// status list after a revocation) while verifiers hold a shared reference.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    documents: RwLock<HashMap<String, FetchResponse>>,
}

impl MemoryFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 at `url`, replacing any previous entry.
    pub fn insert(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.documents
            .write()
            .insert(url.into(), FetchResponse::ok(body));
    }

    /// Serve a JSON document with status 200 at `url`.
    pub fn insert_json(
        &self,
        url: impl Into<String>,
        doc: &impl serde::Serialize,
    ) -> Result<(), serde_json::Error> {
        let body = serde_json::to_vec(doc)?;
        self.insert(url, body);
        Ok(())
    }

    /// Serve an arbitrary response at `url`.
    pub fn insert_response(&self, url: impl Into<String>, response: FetchResponse) {
        self.documents.write().insert(url.into(), response);
    }

    /// Stop serving `url`.
    pub fn remove(&self, url: &str) {
        self.documents.write().remove(url);
    }

    fn lookup(&self, url: &str) -> FetchResponse {
        self.documents
            .read()
            .get(url)
            .cloned()
            .unwrap_or(FetchResponse {
                status: 404,
                body: Vec::new(),
            })
    }
}

impl Fetch for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        Ok(self.lookup(url))
    }
}
