//! # DID Resolution Dispatch and Issuer Key Resolution
//!
//! [`resolve_any`] routes an identifier to the `did:key` codec or the
//! `did:web` resolver by its method. [`KeyResolver`] is the capability a
//! credential verifier consumes: `(issuer, verificationMethod) -> key`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use acad_core::Fetch;
use acad_crypto::Ed25519PublicKey;

use crate::document::{DidDocument, KeyPurpose};
use crate::error::DidError;
use crate::key::{resolve_did_key, strip_fragment};
use crate::web::resolve_did_web;

/// Supported DID methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DidMethod {
    /// `did:key`, resolved locally.
    Key,
    /// `did:web`, resolved over the fetch capability.
    Web,
}

impl DidMethod {
    /// Determine the method of `did`.
    pub fn of(did: &str) -> Result<Self, DidError> {
        let Some(rest) = did.strip_prefix("did:") else {
            return Err(DidError::InvalidDid(format!("{did:?} does not start with did:")));
        };
        let Some((method, id)) = rest.split_once(':') else {
            return Err(DidError::InvalidDid(format!("{did:?} has no method-specific id")));
        };
        if id.is_empty() {
            return Err(DidError::InvalidDid(format!("{did:?} has no method-specific id")));
        }
        match method {
            "key" => Ok(Self::Key),
            "web" => Ok(Self::Web),
            other => Err(DidError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Resolve any supported DID to its document.
///
/// `did:key` never touches `fetcher`.
pub async fn resolve_any<F: Fetch>(did: &str, fetcher: &F) -> Result<DidDocument, DidError> {
    match DidMethod::of(did)? {
        DidMethod::Key => resolve_did_key(did),
        DidMethod::Web => resolve_did_web(did, fetcher).await,
    }
}

/// Injected issuer-key resolution capability.
pub trait KeyResolver: Send + Sync {
    /// Resolve the Ed25519 key that `controller` publishes under
    /// `verification_method` for proofs of kind `purpose`.
    fn resolve_key(
        &self,
        controller: &str,
        verification_method: &str,
        purpose: KeyPurpose,
    ) -> impl Future<Output = Result<Ed25519PublicKey, DidError>> + Send;
}

impl<T: KeyResolver> KeyResolver for &T {
    fn resolve_key(
        &self,
        controller: &str,
        verification_method: &str,
        purpose: KeyPurpose,
    ) -> impl Future<Output = Result<Ed25519PublicKey, DidError>> + Send {
        (**self).resolve_key(controller, verification_method, purpose)
    }
}

impl<T: KeyResolver> KeyResolver for Arc<T> {
    fn resolve_key(
        &self,
        controller: &str,
        verification_method: &str,
        purpose: KeyPurpose,
    ) -> impl Future<Output = Result<Ed25519PublicKey, DidError>> + Send {
        (**self).resolve_key(controller, verification_method, purpose)
    }
}

/// Resolves issuer keys through DID documents.
///
/// The method is looked up in the controller's own document. If it is not
/// there but names a DID the document lists under `alsoKnownAs`, the alias
/// document is consulted instead; this is how a `did:web` registrar signs
/// with its `did:key` alias. Whichever document holds the method must list
/// it under the relationship the proof purpose requires.
#[derive(Debug, Clone)]
pub struct DidKeyResolver<F> {
    fetcher: F,
}

impl<F: Fetch> DidKeyResolver<F> {
    /// Resolve through `fetcher`.
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
}

impl<F: Fetch> KeyResolver for DidKeyResolver<F> {
    async fn resolve_key(
        &self,
        controller: &str,
        verification_method: &str,
        purpose: KeyPurpose,
    ) -> Result<Ed25519PublicKey, DidError> {
        let document = resolve_any(controller, &self.fetcher).await?;
        if document.find_method(verification_method).is_some() {
            return document.key_for_purpose(verification_method, purpose);
        }

        let alias = strip_fragment(verification_method);
        if document.also_known_as.iter().any(|a| a == alias) {
            tracing::debug!(controller, alias, %purpose, "resolving verification method via alias");
            let alias_document = resolve_any(alias, &self.fetcher).await?;
            return alias_document.key_for_purpose(verification_method, purpose);
        }

        Err(DidError::VerificationMethodNotFound {
            did: document.id,
            method: verification_method.to_string(),
        })
    }
}

/// Pinned verification-method keys, for offline verification.
///
/// A pinned key is trusted for every proof purpose.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyResolver {
    keys: HashMap<String, Ed25519PublicKey>,
}

impl StaticKeyResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `key` for the absolute method id `verification_method`.
    pub fn with_key(mut self, verification_method: impl Into<String>, key: Ed25519PublicKey) -> Self {
        self.keys.insert(verification_method.into(), key);
        self
    }
}

impl KeyResolver for StaticKeyResolver {
    async fn resolve_key(
        &self,
        controller: &str,
        verification_method: &str,
        _purpose: KeyPurpose,
    ) -> Result<Ed25519PublicKey, DidError> {
        let absolute = if verification_method.starts_with('#') {
            format!("{controller}{verification_method}")
        } else {
            verification_method.to_string()
        };
        self.keys
            .get(&absolute)
            .copied()
            .ok_or_else(|| DidError::VerificationMethodNotFound {
                did: controller.to_string(),
                method: verification_method.to_string(),
            })
    }
}
