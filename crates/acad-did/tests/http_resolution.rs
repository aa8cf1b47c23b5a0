//! # did:web Resolution over HTTP
//!
//! Serves DID documents from a wiremock origin through [`HttpFetcher`].
//! `did_web_to_url` always yields `https://`, so a small wrapper routes
//! `https://uni.example` to the mock server.

use std::time::Duration;

use acad_core::{Fetch, FetchError, FetchResponse};
use acad_crypto::Ed25519KeyPair;
use acad_did::{
    resolve_any, DidDocument, DidError, DidKeyResolver, HttpFetcher, KeyPurpose, KeyResolver,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Routes `https://uni.example/...` to the mock server.
struct Rewrite {
    inner: HttpFetcher,
    origin: String,
}

impl Fetch for Rewrite {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let local = url.replacen("https://uni.example", &self.origin, 1);
        self.inner.fetch(&local).await
    }
}

fn fetcher(server: &MockServer) -> Rewrite {
    Rewrite {
        inner: HttpFetcher::new(Duration::from_secs(5)).expect("client"),
        origin: server.uri(),
    }
}

#[tokio::test]
async fn http_fetcher_returns_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
    let resp = fetcher.fetch(&format!("{}/doc", server.uri())).await.unwrap();
    assert!(resp.is_success());
    assert_eq!(resp.body, b"{\"ok\":true}");
}

#[tokio::test]
async fn http_fetcher_passes_through_not_found() {
    let server = MockServer::start().await;
    let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
    let resp = fetcher.fetch(&format!("{}/missing", server.uri())).await.unwrap();
    assert_eq!(resp.status, 404);
}

#[tokio::test]
async fn http_fetcher_transport_failure() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
    let err = fetcher.fetch(&format!("{uri}/doc")).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
}

#[tokio::test]
async fn resolves_registrar_document_and_key() {
    let server = MockServer::start().await;
    let key = Ed25519KeyPair::from_seed(&[21u8; 32]).public_key();
    let doc = DidDocument::for_ed25519("did:web:uni.example:registrar", "key-1", &key);

    Mock::given(method("GET"))
        .and(path("/registrar/did.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&doc))
        .mount(&server)
        .await;

    let fetcher = fetcher(&server);
    let resolved = resolve_any("did:web:uni.example:registrar", &fetcher).await.unwrap();
    assert_eq!(resolved, doc);

    let resolver = DidKeyResolver::new(fetcher);
    let resolved_key = resolver
        .resolve_key(
            "did:web:uni.example:registrar",
            "did:web:uni.example:registrar#key-1",
            KeyPurpose::AssertionMethod,
        )
        .await
        .unwrap();
    assert_eq!(resolved_key, key);
}

#[tokio::test]
async fn server_error_surfaces_as_resolution_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/did.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = resolve_any("did:web:uni.example", &fetcher(&server)).await.unwrap_err();
    match err {
        DidError::Resolution { url, status } => {
            assert_eq!(status, 500);
            assert_eq!(url, "https://uni.example/.well-known/did.json");
        }
        other => panic!("expected Resolution, got {other:?}"),
    }
}
