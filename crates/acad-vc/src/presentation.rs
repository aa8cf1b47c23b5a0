//! # Verifiable Presentations
//!
//! A presentation wraps one or more credentials in a holder-signed envelope.
//! The holder's proof covers the envelope merged with a `proofOptions`
//! record `{challenge, domain, proofPurpose}`. `proofOptions` is never
//! stored in the document; it exists only in the signed bytes, and the
//! verifier rebuilds it from the challenge and domain it expects. Editing
//! `proof.challenge` or `proof.domain` after signing therefore changes
//! nothing the signature can match.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use acad_core::{CanonicalBytes, Timestamp};
use acad_crypto::{Ed25519PublicKey, Ed25519Signature, Ed25519Verifier, SignatureVerifier, Signer};
use acad_did::{KeyPurpose, KeyResolver};

use crate::credential::{VerifiableCredential, CREDENTIALS_V1_CONTEXT, ED25519_2020_CONTEXT};
use crate::error::VcError;
use crate::proof::{Proof, ProofPurpose, ProofType};
use crate::verify::{CredentialCheck, NoKeyResolver, VerifyResult};

/// Type tag of every presentation.
pub const VERIFIABLE_PRESENTATION_TYPE: &str = "VerifiablePresentation";

/// A holder-signed presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiablePresentation {
    #[serde(rename = "@context")]
    pub context: Vec<Value>,

    #[serde(rename = "type")]
    pub types: Vec<String>,

    /// Holder DID.
    pub holder: String,

    /// Embedded credentials, in presentation order.
    pub verifiable_credential: Vec<VerifiableCredential>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,

    /// Any other top-level fields; signed and verified like the rest.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerifiablePresentation {
    /// The bytes a holder signs: the envelope without `proof`, merged with
    /// `proofOptions` built from `challenge` and `domain`.
    pub fn signing_input(&self, challenge: &str, domain: &str) -> Result<CanonicalBytes, VcError> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.remove("proof");
            map.insert(
                "proofOptions".to_string(),
                json!({
                    "challenge": challenge,
                    "domain": domain,
                    "proofPurpose": ProofPurpose::Authentication.as_str(),
                }),
            );
        }
        Ok(CanonicalBytes::from_value(value)?)
    }
}

/// Inputs to [`create_presentation`].
#[derive(Debug, Clone)]
pub struct PresentationOptions {
    pub holder: String,
    pub verification_method: String,
    pub credentials: Vec<VerifiableCredential>,
    pub challenge: String,
    pub domain: String,
}

impl PresentationOptions {
    pub fn new(
        holder: impl Into<String>,
        verification_method: impl Into<String>,
        credentials: Vec<VerifiableCredential>,
        challenge: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            holder: holder.into(),
            verification_method: verification_method.into(),
            credentials,
            challenge: challenge.into(),
            domain: domain.into(),
        }
    }
}

/// Build and sign a presentation.
///
/// Fails with [`VcError::EmptyPresentation`] before signing anything if
/// `opts.credentials` is empty.
pub async fn create_presentation<S: Signer>(
    opts: PresentationOptions,
    signer: &S,
) -> Result<VerifiablePresentation, VcError> {
    if opts.credentials.is_empty() {
        return Err(VcError::EmptyPresentation);
    }

    let mut presentation = VerifiablePresentation {
        context: vec![
            Value::String(CREDENTIALS_V1_CONTEXT.to_string()),
            Value::String(ED25519_2020_CONTEXT.to_string()),
        ],
        types: vec![VERIFIABLE_PRESENTATION_TYPE.to_string()],
        holder: opts.holder,
        verifiable_credential: opts.credentials,
        proof: None,
        extra: Map::new(),
    };

    let signed = presentation.signing_input(&opts.challenge, &opts.domain)?;
    let signature = signer.sign(&signed).await?;

    presentation.proof = Some(Proof {
        proof_type: ProofType::Ed25519Signature2020,
        created: Timestamp::now().to_iso8601(),
        verification_method: opts.verification_method,
        proof_purpose: ProofPurpose::Authentication,
        proof_value: signature.to_base64url(),
        challenge: Some(opts.challenge),
        domain: Some(opts.domain),
        extra: Map::new(),
    });

    tracing::debug!(
        holder = %presentation.holder,
        credentials = presentation.verifiable_credential.len(),
        "presentation created"
    );
    Ok(presentation)
}

/// Outcome of verifying a presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationVerifyResult {
    /// Holder proof and every embedded credential verified.
    pub is_valid: bool,
    /// The presentation's declared holder.
    pub holder: String,
    /// Per-credential results, in presentation order. Empty when the
    /// envelope itself failed.
    pub credentials: Vec<VerifyResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Presentation verifier for one expected challenge and domain.
#[derive(Debug, Clone)]
pub struct PresentationVerifier<C, K = NoKeyResolver, V = Ed25519Verifier> {
    challenge: String,
    domain: String,
    credential_check: C,
    holder_key: Option<Ed25519PublicKey>,
    resolver: K,
    verifier: V,
}

impl<C: CredentialCheck> PresentationVerifier<C> {
    /// Expect `challenge` and `domain`, checking each embedded credential
    /// with `credential_check`.
    pub fn new(
        challenge: impl Into<String>,
        domain: impl Into<String>,
        credential_check: C,
    ) -> Self {
        Self {
            challenge: challenge.into(),
            domain: domain.into(),
            credential_check,
            holder_key: None,
            resolver: NoKeyResolver,
            verifier: Ed25519Verifier,
        }
    }
}

impl<C, K, V> PresentationVerifier<C, K, V> {
    /// Use `key` as the holder key, bypassing the resolver.
    pub fn with_holder_key(mut self, key: Ed25519PublicKey) -> Self {
        self.holder_key = Some(key);
        self
    }

    /// Resolve the holder key through `resolver`. The method must be listed
    /// under `authentication` in the holder's DID document.
    pub fn with_resolver<K2: KeyResolver>(self, resolver: K2) -> PresentationVerifier<C, K2, V> {
        PresentationVerifier {
            challenge: self.challenge,
            domain: self.domain,
            credential_check: self.credential_check,
            holder_key: self.holder_key,
            resolver,
            verifier: self.verifier,
        }
    }

    /// Verify the holder signature through `verifier`.
    pub fn with_signature_verifier<V2: SignatureVerifier>(
        self,
        verifier: V2,
    ) -> PresentationVerifier<C, K, V2> {
        PresentationVerifier {
            challenge: self.challenge,
            domain: self.domain,
            credential_check: self.credential_check,
            holder_key: self.holder_key,
            resolver: self.resolver,
            verifier,
        }
    }
}

impl<C, K, V> PresentationVerifier<C, K, V>
where
    C: CredentialCheck,
    K: KeyResolver,
    V: SignatureVerifier,
{
    /// Verify `presentation`.
    pub async fn verify(&self, presentation: &VerifiablePresentation) -> PresentationVerifyResult {
        let holder = presentation.holder.clone();
        let fail = |error: String| PresentationVerifyResult {
            is_valid: false,
            holder: holder.clone(),
            credentials: Vec::new(),
            error: Some(error),
        };

        if presentation.verifiable_credential.is_empty() {
            tracing::debug!(holder = %holder, step = 1, "presentation has no credentials");
            return fail("presentation contains no credentials".into());
        }

        let Some(proof) = &presentation.proof else {
            tracing::debug!(holder = %holder, step = 2, "presentation has no proof");
            return fail("no proof".into());
        };

        if !proof.proof_type.is_supported() {
            tracing::debug!(holder = %holder, step = 3, proof_type = %proof.proof_type, "unsupported proof type");
            return fail(format!("unsupported proof type: {}", proof.proof_type));
        }
        if proof.proof_purpose != ProofPurpose::Authentication {
            tracing::debug!(holder = %holder, step = 3, purpose = %proof.proof_purpose, "wrong proof purpose");
            return fail(format!("unexpected proof purpose: {}", proof.proof_purpose));
        }

        if proof.challenge.as_deref() != Some(self.challenge.as_str()) {
            tracing::debug!(holder = %holder, step = 4, "challenge mismatch");
            return fail("challenge mismatch".into());
        }

        if proof.domain.as_deref() != Some(self.domain.as_str()) {
            tracing::debug!(holder = %holder, step = 5, "domain mismatch");
            return fail("domain mismatch".into());
        }

        let key = match self.holder_key {
            Some(key) => key,
            None => match self
                .resolver
                .resolve_key(
                    &presentation.holder,
                    &proof.verification_method,
                    KeyPurpose::Authentication,
                )
                .await
            {
                Ok(key) => key,
                Err(e) => {
                    tracing::debug!(holder = %holder, step = 6, error = %e, "holder key resolution failed");
                    return fail(format!("holder key resolution failed: {e}"));
                }
            },
        };

        let signed = match presentation.signing_input(&self.challenge, &self.domain) {
            Ok(bytes) => bytes,
            Err(e) => return fail(format!("invalid signature: {e}")),
        };
        let Ok(signature) = Ed25519Signature::from_base64url(&proof.proof_value) else {
            tracing::debug!(holder = %holder, step = 6, "undecodable proofValue");
            return fail("invalid signature".into());
        };
        match self.verifier.verify(&signed, &signature, &key).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(holder = %holder, step = 6, "holder signature does not verify");
                return fail("invalid signature".into());
            }
            Err(e) => {
                tracing::debug!(holder = %holder, step = 6, error = %e, "signature verifier failed");
                return fail(format!("invalid signature: {e}"));
            }
        }

        let mut credentials = Vec::with_capacity(presentation.verifiable_credential.len());
        for credential in &presentation.verifiable_credential {
            credentials.push(self.credential_check.check(credential).await);
        }

        let error = credentials
            .iter()
            .enumerate()
            .find(|(_, r)| !r.is_valid)
            .map(|(i, r)| {
                format!(
                    "credential {i} failed verification: {}",
                    r.error.as_deref().unwrap_or("unknown error")
                )
            });
        if error.is_some() {
            tracing::debug!(holder = %holder, step = 7, "embedded credential failed");
        }

        PresentationVerifyResult {
            is_valid: error.is_none(),
            holder,
            credentials,
            error,
        }
    }
}
