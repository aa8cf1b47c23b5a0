//! # Credential Verification Pipeline
//!
//! [`CredentialVerifier`] runs an ordered series of checks and stops at
//! the first failure, recording why in [`VerifyResult::error`]:
//!
//! 1. a proof is present;
//! 2. the proof type is `Ed25519Signature2020` and its purpose is
//!    `assertionMethod`;
//! 3. `issuanceDate` is not in the future;
//! 4. `expirationDate`, if present, has not passed (`isExpired`);
//! 5. the issuer key is the pinned key or comes from the key resolver,
//!    which only accepts methods the issuer lists under `assertionMethod`;
//! 6. the signature verifies over the canonical form without `proof`;
//! 7. if a revocation check is wired in and reports revoked, the result is
//!    `isValid = true, isRevoked = true` with a revocation error;
//! 8. otherwise the credential is valid.
//!
//! Every failure, including resolver and verifier errors, is reported in
//! the result. The pipeline itself never returns `Err`, so a batch of
//! credentials can be checked without one failure aborting the rest.
//!
//! Optional capabilities are type parameters defaulting to no-op markers
//! ([`NoKeyResolver`], [`NoRevocationCheck`]) so a verifier with only a
//! pinned key needs no annotations.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use acad_core::Timestamp;
use acad_crypto::{Ed25519PublicKey, Ed25519Signature, Ed25519Verifier, SignatureVerifier};
use acad_did::{DidError, KeyPurpose, KeyResolver};

use crate::credential::VerifiableCredential;
use crate::error::VcError;
use crate::proof::ProofPurpose;

/// Outcome of verifying one credential.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResult {
    /// The signature is sound and every temporal check passed.
    pub is_valid: bool,
    /// The revocation bit is set.
    pub is_revoked: bool,
    /// The credential's expiration date has passed.
    pub is_expired: bool,
    /// Subject DID of a credential that passed signature verification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
    /// Why verification did not fully succeed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerifyResult {
    fn fail(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Injected revocation-check capability: `(credential) -> revoked?`.
pub trait RevocationCheck: Send + Sync {
    /// Whether `credential` has been revoked.
    fn is_revoked(
        &self,
        credential: &VerifiableCredential,
    ) -> impl Future<Output = Result<bool, VcError>> + Send;
}

impl<T: RevocationCheck> RevocationCheck for &T {
    fn is_revoked(
        &self,
        credential: &VerifiableCredential,
    ) -> impl Future<Output = Result<bool, VcError>> + Send {
        (**self).is_revoked(credential)
    }
}

impl<T: RevocationCheck> RevocationCheck for Arc<T> {
    fn is_revoked(
        &self,
        credential: &VerifiableCredential,
    ) -> impl Future<Output = Result<bool, VcError>> + Send {
        (**self).is_revoked(credential)
    }
}

/// Injected per-credential verifier, used by presentation verification.
pub trait CredentialCheck: Send + Sync {
    /// Verify one embedded credential.
    fn check(&self, credential: &VerifiableCredential) -> impl Future<Output = VerifyResult> + Send;
}

impl<T: CredentialCheck> CredentialCheck for &T {
    fn check(&self, credential: &VerifiableCredential) -> impl Future<Output = VerifyResult> + Send {
        (**self).check(credential)
    }
}

impl<T: CredentialCheck> CredentialCheck for Arc<T> {
    fn check(&self, credential: &VerifiableCredential) -> impl Future<Output = VerifyResult> + Send {
        (**self).check(credential)
    }
}

/// Marker: no key resolver configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKeyResolver;

impl KeyResolver for NoKeyResolver {
    async fn resolve_key(
        &self,
        controller: &str,
        _verification_method: &str,
        _purpose: KeyPurpose,
    ) -> Result<Ed25519PublicKey, DidError> {
        Err(DidError::NoKeySource(controller.to_string()))
    }
}

/// Marker: no revocation check configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRevocationCheck;

impl RevocationCheck for NoRevocationCheck {
    async fn is_revoked(&self, _credential: &VerifiableCredential) -> Result<bool, VcError> {
        Ok(false)
    }
}

/// Credential verifier with injected capabilities.
///
/// ```ignore
/// let result = CredentialVerifier::new()
///     .with_resolver(DidKeyResolver::new(HttpFetcher::new(timeout)?))
///     .with_revocation_check(StatusListChecker::new(fetcher))
///     .verify(&credential)
///     .await;
/// ```
#[derive(Debug, Clone)]
pub struct CredentialVerifier<K = NoKeyResolver, R = NoRevocationCheck, V = Ed25519Verifier> {
    issuer_key: Option<Ed25519PublicKey>,
    resolver: K,
    revocation: R,
    verifier: V,
    at: Option<DateTime<Utc>>,
}

impl CredentialVerifier {
    /// A verifier with no key source, no revocation check, local Ed25519
    /// verification, and the current time as evaluation instant.
    pub fn new() -> Self {
        Self {
            issuer_key: None,
            resolver: NoKeyResolver,
            revocation: NoRevocationCheck,
            verifier: Ed25519Verifier,
            at: None,
        }
    }
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, R, V> CredentialVerifier<K, R, V> {
    /// Use `key` as the issuer key, bypassing the resolver.
    pub fn with_issuer_key(mut self, key: Ed25519PublicKey) -> Self {
        self.issuer_key = Some(key);
        self
    }

    /// Resolve issuer keys through `resolver`. The method must be listed
    /// under `assertionMethod` in the issuer's DID document.
    pub fn with_resolver<K2: KeyResolver>(self, resolver: K2) -> CredentialVerifier<K2, R, V> {
        CredentialVerifier {
            issuer_key: self.issuer_key,
            resolver,
            revocation: self.revocation,
            verifier: self.verifier,
            at: self.at,
        }
    }

    /// Check revocation through `check`.
    pub fn with_revocation_check<R2: RevocationCheck>(self, check: R2) -> CredentialVerifier<K, R2, V> {
        CredentialVerifier {
            issuer_key: self.issuer_key,
            resolver: self.resolver,
            revocation: check,
            verifier: self.verifier,
            at: self.at,
        }
    }

    /// Verify signatures through `verifier` (e.g. a remote service).
    pub fn with_signature_verifier<V2: SignatureVerifier>(
        self,
        verifier: V2,
    ) -> CredentialVerifier<K, R, V2> {
        CredentialVerifier {
            issuer_key: self.issuer_key,
            resolver: self.resolver,
            revocation: self.revocation,
            verifier,
            at: self.at,
        }
    }

    /// Evaluate temporal checks at `at` instead of now.
    pub fn at(mut self, at: DateTime<Utc>) -> Self {
        self.at = Some(at);
        self
    }
}

impl<K, R, V> CredentialVerifier<K, R, V>
where
    K: KeyResolver,
    R: RevocationCheck,
    V: SignatureVerifier,
{
    /// Run the pipeline over `credential`.
    pub async fn verify(&self, credential: &VerifiableCredential) -> VerifyResult {
        let now = self.at.unwrap_or_else(Utc::now);
        let id = credential.id.as_deref().unwrap_or("<no id>");

        // 1. Proof presence.
        let Some(proof) = &credential.proof else {
            tracing::debug!(id, step = 1, "credential has no proof");
            return VerifyResult::fail("no proof");
        };

        // 2. Proof type and purpose.
        if !proof.proof_type.is_supported() {
            tracing::debug!(id, step = 2, proof_type = %proof.proof_type, "unsupported proof type");
            return VerifyResult::fail(format!("unsupported proof type: {}", proof.proof_type));
        }
        if proof.proof_purpose != ProofPurpose::AssertionMethod {
            tracing::debug!(id, step = 2, purpose = %proof.proof_purpose, "wrong proof purpose");
            return VerifyResult::fail(format!(
                "unexpected proof purpose: {}",
                proof.proof_purpose
            ));
        }

        // 3. Issuance not in the future.
        match Timestamp::parse_precise(&credential.issuance_date) {
            Ok(issued) if issued > now => {
                tracing::debug!(id, step = 3, issued = %issued, "issuance date in the future");
                return VerifyResult::fail(format!(
                    "credential issuance date {} is in the future",
                    credential.issuance_date
                ));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(id, step = 3, "unparsable issuance date");
                return VerifyResult::fail(format!("invalid issuanceDate: {e}"));
            }
        }

        // 4. Expiration.
        if let Some(expiration) = &credential.expiration_date {
            match Timestamp::parse_precise(expiration) {
                Ok(expires) if expires < now => {
                    tracing::debug!(id, step = 4, expires = %expires, "credential expired");
                    return VerifyResult {
                        is_expired: true,
                        ..VerifyResult::fail(format!("credential expired at {expiration}"))
                    };
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(id, step = 4, "unparsable expiration date");
                    return VerifyResult::fail(format!("invalid expirationDate: {e}"));
                }
            }
        }

        // 5. Issuer key.
        let key = match self.issuer_key {
            Some(key) => key,
            None => match self
                .resolver
                .resolve_key(
                    &credential.issuer,
                    &proof.verification_method,
                    KeyPurpose::AssertionMethod,
                )
                .await
            {
                Ok(key) => key,
                Err(e) => {
                    tracing::debug!(id, step = 5, error = %e, "issuer key resolution failed");
                    return VerifyResult::fail(format!("issuer key resolution failed: {e}"));
                }
            },
        };

        // 6. Signature over the canonical form without proof.
        let signed = match credential.signing_input() {
            Ok(bytes) => bytes,
            Err(e) => return VerifyResult::fail(format!("invalid signature: {e}")),
        };
        let Ok(signature) = Ed25519Signature::from_base64url(&proof.proof_value) else {
            tracing::debug!(id, step = 6, "undecodable proofValue");
            return VerifyResult::fail("invalid signature");
        };
        match self.verifier.verify(&signed, &signature, &key).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(id, step = 6, "signature does not verify");
                return VerifyResult::fail("invalid signature");
            }
            Err(e) => {
                tracing::debug!(id, step = 6, error = %e, "signature verifier failed");
                return VerifyResult::fail(format!("invalid signature: {e}"));
            }
        }

        let holder = credential.subject_id().map(str::to_string);

        // 7. Revocation.
        match self.revocation.is_revoked(credential).await {
            Ok(true) => {
                tracing::debug!(id, step = 7, "credential revoked");
                VerifyResult {
                    is_valid: true,
                    is_revoked: true,
                    is_expired: false,
                    holder,
                    error: Some("credential has been revoked".to_string()),
                }
            }
            Ok(false) => VerifyResult {
                is_valid: true,
                holder,
                ..VerifyResult::default()
            },
            Err(e) => {
                tracing::debug!(id, step = 7, error = %e, "revocation status unavailable");
                VerifyResult {
                    holder,
                    ..VerifyResult::fail(e.to_string())
                }
            }
        }
    }
}

impl<K, R, V> CredentialCheck for CredentialVerifier<K, R, V>
where
    K: KeyResolver,
    R: RevocationCheck,
    V: SignatureVerifier,
{
    async fn check(&self, credential: &VerifiableCredential) -> VerifyResult {
        self.verify(credential).await
    }
}
