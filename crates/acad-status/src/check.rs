//! Revocation lookup through a credential's status pointer.

use acad_core::Fetch;
use acad_vc::{RevocationCheck, VcError, VerifiableCredential};

use crate::bitstring::get_bit;
use crate::error::StatusError;
use crate::list::encoded_list_of;

/// Whether `credential` is revoked according to the list it points at.
///
/// A credential without `credentialStatus` is not revocable: returns
/// `Ok(false)` and never calls `fetcher`.
///
/// The fetched list credential is read as served. Its proof is not checked
/// and its issuer is not compared with the credential's issuer. Callers that
/// need either should fetch the list themselves and run it through
/// `acad_vc::CredentialVerifier` before trusting the bit.
pub async fn is_revoked<F: Fetch>(
    credential: &VerifiableCredential,
    fetcher: &F,
) -> Result<bool, StatusError> {
    let Some(status) = &credential.credential_status else {
        return Ok(false);
    };
    let index = status.index()?;
    let url = status.status_list_credential.as_str();

    let response = fetcher.fetch(url).await?;
    if !response.is_success() {
        return Err(StatusError::ListUnavailable {
            url: url.to_string(),
            status: response.status,
        });
    }
    let list: VerifiableCredential = response
        .json()
        .map_err(|e| StatusError::MalformedListCredential(e.to_string()))?;

    let revoked = get_bit(encoded_list_of(&list, &status.status_purpose)?, index)?;
    tracing::debug!(list = url, index, revoked, "status bit read");
    Ok(revoked)
}

/// [`RevocationCheck`] backed by fetched status list credentials.
///
/// Reads lists the way [`is_revoked`] does, without verifying them.
#[derive(Debug, Clone)]
pub struct StatusListChecker<F> {
    fetcher: F,
}

impl<F: Fetch> StatusListChecker<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
}

impl<F: Fetch> RevocationCheck for StatusListChecker<F> {
    async fn is_revoked(&self, credential: &VerifiableCredential) -> Result<bool, VcError> {
        is_revoked(credential, &self.fetcher)
            .await
            .map_err(|e| VcError::Revocation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use acad_core::{FetchError, FetchResponse, MemoryFetcher};
    use acad_vc::CredentialStatus;
    use serde_json::{json, Map};

    use crate::bitstring::{create_list, set_bit};
    use crate::list::{build_list_credential, ListCredentialOptions};

    const LIST: &str = "https://registrar.uni.example/status/3";

    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
    }

    impl Fetch for CountingFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::Transport {
                url: url.to_string(),
                reason: "unexpected fetch".into(),
            })
        }
    }

    fn credential(status: Option<CredentialStatus>) -> VerifiableCredential {
        VerifiableCredential {
            context: vec![],
            id: Some("urn:uuid:1".into()),
            types: vec!["VerifiableCredential".into()],
            issuer: "did:key:zissuer".into(),
            issuance_date: "2026-01-01T00:00:00Z".into(),
            expiration_date: None,
            credential_status: status,
            credential_subject: json!({ "id": "did:key:zstudent" }),
            proof: None,
            extra: Map::new(),
        }
    }

    fn publish(fetcher: &MemoryFetcher, encoded: &str) {
        let vc = build_list_credential(&ListCredentialOptions::new(LIST, "did:key:zissuer"), encoded);
        fetcher.insert_json(LIST, &vc).unwrap();
    }

    #[tokio::test]
    async fn no_status_means_not_revoked_without_fetch() {
        let fetcher = CountingFetcher::default();
        assert!(!is_revoked(&credential(None), &fetcher).await.unwrap());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn reads_the_pointed_bit() {
        let fetcher = MemoryFetcher::new();
        let fresh = create_list(1024).unwrap().encoded_list;
        let vc = credential(Some(CredentialStatus::revocation(LIST, 42)));

        publish(&fetcher, &fresh);
        assert!(!is_revoked(&vc, &fetcher).await.unwrap());

        publish(&fetcher, &set_bit(&fresh, 42, true).unwrap());
        assert!(is_revoked(&vc, &fetcher).await.unwrap());

        publish(&fetcher, &set_bit(&fresh, 42, false).unwrap());
        assert!(!is_revoked(&vc, &fetcher).await.unwrap());
    }

    #[tokio::test]
    async fn list_is_read_without_verifying_it() {
        let fetcher = MemoryFetcher::new();
        let revoked = set_bit(&create_list(64).unwrap().encoded_list, 5, true).unwrap();
        let list = build_list_credential(&ListCredentialOptions::new(LIST, "did:key:zsomeoneelse"), &revoked);
        assert!(list.proof.is_none());
        fetcher.insert_json(LIST, &list).unwrap();

        let vc = credential(Some(CredentialStatus::revocation(LIST, 5)));
        assert!(is_revoked(&vc, &fetcher).await.unwrap());
    }

    #[tokio::test]
    async fn missing_list_is_an_error() {
        let vc = credential(Some(CredentialStatus::revocation(LIST, 1)));
        let err = is_revoked(&vc, &MemoryFetcher::new()).await.unwrap_err();
        assert!(matches!(err, StatusError::ListUnavailable { status: 404, .. }));
    }

    #[tokio::test]
    async fn non_numeric_index_is_an_error() {
        let mut status = CredentialStatus::revocation(LIST, 1);
        status.status_list_index = "one".into();
        let err = is_revoked(&credential(Some(status)), &CountingFetcher::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StatusError::Credential(_)));
    }

    #[tokio::test]
    async fn unparsable_list_is_an_error() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert(LIST, "<html>maintenance</html>");
        let vc = credential(Some(CredentialStatus::revocation(LIST, 1)));
        assert!(matches!(
            is_revoked(&vc, &fetcher).await,
            Err(StatusError::MalformedListCredential(_))
        ));
    }

    #[tokio::test]
    async fn checker_maps_errors_to_revocation_failures() {
        let vc = credential(Some(CredentialStatus::revocation(LIST, 1)));
        let err = StatusListChecker::new(MemoryFetcher::new())
            .is_revoked(&vc)
            .await
            .unwrap_err();
        assert!(matches!(err, VcError::Revocation(_)));
    }
}
