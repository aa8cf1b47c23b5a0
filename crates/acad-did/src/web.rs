//! # did:web Resolution
//!
//! `did:web:<domain>` maps to `https://<domain>/.well-known/did.json`;
//! `did:web:<domain>:<seg1>:…:<segN>` maps to
//! `https://<domain>/<seg1>/…/<segN>/did.json`. Every colon-delimited part
//! is percent-decoded, so a port is written `uni.example%3A8443`.
//!
//! Resolution goes through the injected [`Fetch`] capability; this module
//! performs no I/O of its own and never retries.

use acad_core::Fetch;

use crate::document::DidDocument;
use crate::error::DidError;
use crate::key::strip_fragment;

/// Scheme prefix of web-derived identifiers.
pub const DID_WEB_PREFIX: &str = "did:web:";

/// Map a `did:web` identifier to its document URL.
pub fn did_web_to_url(did: &str) -> Result<String, DidError> {
    let did = strip_fragment(did);
    let Some(identifier) = did.strip_prefix(DID_WEB_PREFIX) else {
        return Err(DidError::InvalidDid(format!("{did:?} is not a did:web")));
    };

    let mut parts = identifier.split(':').map(decode_part);
    let domain = match parts.next() {
        Some(domain) => domain?,
        None => return Err(DidError::InvalidDid("did:web has no domain".into())),
    };
    if domain.is_empty() || domain.contains(['/', '?', '#', '@']) {
        return Err(DidError::InvalidDid(format!(
            "did:web domain {domain:?} is not a host"
        )));
    }
    let segments = parts.collect::<Result<Vec<_>, _>>()?;
    if segments
        .iter()
        .any(|s| s.is_empty() || s.contains(['/', '?', '#']))
    {
        return Err(DidError::InvalidDid(format!(
            "did:web {did:?} has an empty or reserved path segment"
        )));
    }

    let url = if segments.is_empty() {
        format!("https://{domain}/.well-known/did.json")
    } else {
        format!("https://{domain}/{}/did.json", segments.join("/"))
    };

    let parsed = url::Url::parse(&url)
        .map_err(|e| DidError::InvalidDid(format!("did:web maps to invalid URL {url:?}: {e}")))?;
    Ok(parsed.into())
}

/// Resolve a `did:web` identifier through `fetcher`.
///
/// Fails on a transport error, a non-2xx status, an unparsable body, or a
/// document whose `id` differs from the requested DID.
pub async fn resolve_did_web<F: Fetch>(did: &str, fetcher: &F) -> Result<DidDocument, DidError> {
    let did = strip_fragment(did);
    let url = did_web_to_url(did)?;
    let response = fetcher.fetch(&url).await?;
    if !response.is_success() {
        return Err(DidError::Resolution {
            url,
            status: response.status,
        });
    }

    let document: DidDocument = response
        .json()
        .map_err(|e| DidError::MalformedDocument(format!("{url}: {e}")))?;
    if document.id != did {
        return Err(DidError::MalformedDocument(format!(
            "document at {url} describes {:?}, expected {did:?}",
            document.id
        )));
    }
    Ok(document)
}

fn decode_part(part: &str) -> Result<String, DidError> {
    urlencoding::decode(part)
        .map(|s| s.into_owned())
        .map_err(|e| DidError::InvalidDid(format!("bad percent-encoding in {part:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use acad_core::{FetchResponse, MemoryFetcher};
    use acad_crypto::Ed25519KeyPair;

    #[test]
    fn bare_domain_uses_well_known() {
        assert_eq!(
            did_web_to_url("did:web:uni.example").unwrap(),
            "https://uni.example/.well-known/did.json"
        );
    }

    #[test]
    fn path_segments_map_to_path() {
        assert_eq!(
            did_web_to_url("did:web:uni.example:registrar:2026").unwrap(),
            "https://uni.example/registrar/2026/did.json"
        );
    }

    #[test]
    fn port_is_percent_decoded() {
        assert_eq!(
            did_web_to_url("did:web:localhost%3A8443").unwrap(),
            "https://localhost:8443/.well-known/did.json"
        );
    }

    #[test]
    fn segments_are_percent_decoded() {
        assert_eq!(
            did_web_to_url("did:web:uni.example:faculty%20of%20law").unwrap(),
            "https://uni.example/faculty%20of%20law/did.json"
        );
    }

    #[test]
    fn fragment_is_ignored() {
        assert_eq!(
            did_web_to_url("did:web:uni.example#key-1").unwrap(),
            "https://uni.example/.well-known/did.json"
        );
    }

    #[test]
    fn rejects_malformed() {
        assert!(did_web_to_url("did:web:").is_err());
        assert!(did_web_to_url("did:web:uni.example::x").is_err());
        assert!(did_web_to_url("did:key:zabc").is_err());
        assert!(did_web_to_url("did:web:uni.example%2Fevil").is_err());
        assert!(did_web_to_url("did:web:uni.example:a%2Fb").is_err());
    }

    fn hosted() -> (MemoryFetcher, DidDocument) {
        let key = Ed25519KeyPair::from_seed(&[4u8; 32]).public_key();
        let doc = DidDocument::for_ed25519("did:web:uni.example", "key-1", &key);
        let fetcher = MemoryFetcher::new();
        fetcher
            .insert_json("https://uni.example/.well-known/did.json", &doc)
            .unwrap();
        (fetcher, doc)
    }

    #[tokio::test]
    async fn resolves_hosted_document() {
        let (fetcher, doc) = hosted();
        let resolved = resolve_did_web("did:web:uni.example", &fetcher).await.unwrap();
        assert_eq!(resolved, doc);
    }

    #[tokio::test]
    async fn missing_document_is_resolution_error() {
        let fetcher = MemoryFetcher::new();
        let err = resolve_did_web("did:web:uni.example", &fetcher).await.unwrap_err();
        assert!(matches!(err, DidError::Resolution { status: 404, .. }));
    }

    #[tokio::test]
    async fn unparsable_body_is_malformed() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_response(
            "https://uni.example/.well-known/did.json",
            FetchResponse::ok(b"<html>".to_vec()),
        );
        let err = resolve_did_web("did:web:uni.example", &fetcher).await.unwrap_err();
        assert!(matches!(err, DidError::MalformedDocument(_)));
    }

    #[tokio::test]
    async fn id_mismatch_is_rejected() {
        let (fetcher, doc) = hosted();
        fetcher
            .insert_json("https://other.example/.well-known/did.json", &doc)
            .unwrap();
        let err = resolve_did_web("did:web:other.example", &fetcher).await.unwrap_err();
        assert!(matches!(err, DidError::MalformedDocument(_)));
    }
}
