//! # Verifiable Credential Structure and Issuance
//!
//! [`create_credential`] builds the unsigned document, computes its
//! signing input (JCS canonical form without `proof`), has the injected
//! [`Signer`] sign it, and attaches an `Ed25519Signature2020` proof with
//! purpose `assertionMethod`.
//!
//! A credential is immutable once issued. "Updating" one means issuing a
//! replacement and flipping the old one's revocation bit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use acad_core::{CanonicalBytes, Timestamp};
use acad_crypto::Signer;

use crate::error::VcError;
use crate::proof::{Proof, ProofPurpose, ProofType};

/// W3C credentials v1 context.
pub const CREDENTIALS_V1_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// Ed25519 2020 signature suite context.
pub const ED25519_2020_CONTEXT: &str = "https://w3id.org/security/suites/ed25519-2020/v1";

/// Status List 2021 context, added when a credential carries a status pointer.
pub const STATUS_LIST_2021_CONTEXT: &str = "https://w3id.org/vc/status-list/2021/v1";

/// Base credential type.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// `credentialStatus.type` for a revocation bit pointer.
pub const STATUS_LIST_ENTRY_TYPE: &str = "StatusList2021Entry";

/// The only status purpose in use.
pub const REVOCATION_PURPOSE: &str = "revocation";

/// A verifiable credential.
///
/// Top-level fields not modelled here are kept in `extra` so that they are
/// covered by the signature like every other field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    /// JSON-LD contexts.
    #[serde(rename = "@context")]
    pub context: Vec<Value>,

    /// Credential identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Credential types; includes `VerifiableCredential`.
    #[serde(rename = "type")]
    pub types: Vec<String>,

    /// Issuer DID.
    pub issuer: String,

    /// Issuance time exactly as signed.
    pub issuance_date: String,

    /// Expiration time exactly as signed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    /// Revocation pointer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<CredentialStatus>,

    /// Subject claims, including the subject `id`.
    pub credential_subject: Value,

    /// Issuer proof.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,

    /// Any other top-level fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A credential's pointer into a revocation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    /// `<listUrl>#<index>`.
    pub id: String,
    /// `StatusList2021Entry`.
    #[serde(rename = "type")]
    pub type_: String,
    /// `revocation`.
    pub status_purpose: String,
    /// Bit index as a decimal string.
    pub status_list_index: String,
    /// URL of the list credential.
    pub status_list_credential: String,
    /// Any other fields of the status entry; signed like the rest.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CredentialStatus {
    /// A revocation pointer at `index` of the list at `list_url`.
    pub fn revocation(list_url: &str, index: usize) -> Self {
        Self {
            id: format!("{list_url}#{index}"),
            type_: STATUS_LIST_ENTRY_TYPE.to_string(),
            status_purpose: REVOCATION_PURPOSE.to_string(),
            status_list_index: index.to_string(),
            status_list_credential: list_url.to_string(),
            extra: Map::new(),
        }
    }

    /// Parse `statusListIndex`.
    pub fn index(&self) -> Result<usize, VcError> {
        let s = &self.status_list_index;
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VcError::InvalidStatus(format!(
                "statusListIndex {s:?} is not a decimal integer"
            )));
        }
        s.parse()
            .map_err(|e| VcError::InvalidStatus(format!("statusListIndex {s:?}: {e}")))
    }
}

/// Where a new credential's revocation bit lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPointer {
    /// URL of the list credential.
    pub list_url: String,
    /// Bit index within the list.
    pub index: usize,
}

/// Inputs to [`create_credential`].
#[derive(Debug, Clone)]
pub struct CredentialOptions {
    /// Issuer DID.
    pub issuer: String,
    /// DID URL of the issuer's signing key.
    pub verification_method: String,
    /// Subject DID, merged into the claims as `id`.
    pub subject_id: String,
    /// Subject claims (a JSON object).
    pub claims: Value,
    /// Types in addition to `VerifiableCredential`.
    pub types: Vec<String>,
    /// Credential id; defaults to `urn:uuid:<v4>`.
    pub id: Option<String>,
    /// Optional expiration.
    pub expiration_date: Option<DateTime<Utc>>,
    /// Optional revocation pointer.
    pub status: Option<StatusPointer>,
    /// Issuance instant; defaults to now.
    pub issued_at: Option<DateTime<Utc>>,
}

impl CredentialOptions {
    /// Options for `issuer` signing with `verification_method` about `subject_id`.
    pub fn new(
        issuer: impl Into<String>,
        verification_method: impl Into<String>,
        subject_id: impl Into<String>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            verification_method: verification_method.into(),
            subject_id: subject_id.into(),
            claims: Value::Object(Map::new()),
            types: Vec::new(),
            id: None,
            expiration_date: None,
            status: None,
            issued_at: None,
        }
    }

    /// Set the subject claims.
    pub fn with_claims(mut self, claims: Value) -> Self {
        self.claims = claims;
        self
    }

    /// Add a credential type.
    pub fn with_type(mut self, t: impl Into<String>) -> Self {
        self.types.push(t.into());
        self
    }

    /// Set an explicit credential id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set an expiration instant.
    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expiration_date = Some(at);
        self
    }

    /// Attach a revocation pointer.
    pub fn with_status(mut self, list_url: impl Into<String>, index: usize) -> Self {
        self.status = Some(StatusPointer {
            list_url: list_url.into(),
            index,
        });
        self
    }

    /// Pin the issuance instant.
    pub fn issued_at(mut self, at: DateTime<Utc>) -> Self {
        self.issued_at = Some(at);
        self
    }
}

impl VerifiableCredential {
    /// JCS canonical form of the credential without `proof`.
    pub fn signing_input(&self) -> Result<CanonicalBytes, VcError> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("proof");
        }
        Ok(CanonicalBytes::from_value(value)?)
    }

    /// Returns `true` if `t` is one of the credential's types.
    pub fn has_type(&self, t: &str) -> bool {
        self.types.iter().any(|x| x == t)
    }

    /// The subject DID (`credentialSubject.id`), if any.
    pub fn subject_id(&self) -> Option<&str> {
        self.credential_subject.get("id").and_then(Value::as_str)
    }
}

/// Build the unsigned credential document.
pub fn build_unsigned(opts: &CredentialOptions) -> Result<VerifiableCredential, VcError> {
    let Value::Object(mut subject) = opts.claims.clone() else {
        return Err(VcError::InvalidClaims(format!(
            "credentialSubject claims must be a JSON object, got {}",
            json_kind(&opts.claims)
        )));
    };
    subject.insert("id".to_string(), Value::String(opts.subject_id.clone()));

    let mut context = vec![
        Value::String(CREDENTIALS_V1_CONTEXT.to_string()),
        Value::String(ED25519_2020_CONTEXT.to_string()),
    ];
    if opts.status.is_some() {
        context.push(Value::String(STATUS_LIST_2021_CONTEXT.to_string()));
    }

    let mut types = vec![VERIFIABLE_CREDENTIAL_TYPE.to_string()];
    types.extend(
        opts.types
            .iter()
            .filter(|t| t.as_str() != VERIFIABLE_CREDENTIAL_TYPE)
            .cloned(),
    );

    let issued = opts
        .issued_at
        .map(Timestamp::from_utc)
        .unwrap_or_else(Timestamp::now);

    Ok(VerifiableCredential {
        context,
        id: Some(
            opts.id
                .clone()
                .unwrap_or_else(|| format!("urn:uuid:{}", uuid::Uuid::new_v4())),
        ),
        types,
        issuer: opts.issuer.clone(),
        issuance_date: issued.to_iso8601(),
        expiration_date: opts
            .expiration_date
            .map(|at| Timestamp::from_utc(at).to_iso8601()),
        credential_status: opts
            .status
            .as_ref()
            .map(|p| CredentialStatus::revocation(&p.list_url, p.index)),
        credential_subject: Value::Object(subject),
        proof: None,
        extra: Map::new(),
    })
}

/// Issue a signed credential.
pub async fn create_credential<S: Signer>(
    opts: CredentialOptions,
    signer: &S,
) -> Result<VerifiableCredential, VcError> {
    let credential = build_unsigned(&opts)?;
    sign_credential(credential, opts.verification_method, signer).await
}

/// Attach an `assertionMethod` proof to an unsigned credential.
///
/// Any existing proof is replaced; the signature covers every other field.
pub async fn sign_credential<S: Signer>(
    mut credential: VerifiableCredential,
    verification_method: impl Into<String>,
    signer: &S,
) -> Result<VerifiableCredential, VcError> {
    credential.proof = None;
    let canonical = credential.signing_input()?;
    let signature = signer.sign(&canonical).await?;

    credential.proof = Some(Proof {
        proof_type: ProofType::Ed25519Signature2020,
        created: Timestamp::now().to_iso8601(),
        verification_method: verification_method.into(),
        proof_purpose: ProofPurpose::AssertionMethod,
        proof_value: signature.to_base64url(),
        challenge: None,
        domain: None,
        extra: Map::new(),
    });
    tracing::debug!(
        id = credential.id.as_deref().unwrap_or_default(),
        issuer = %credential.issuer,
        signer = signer.provider_name(),
        "credential signed"
    );
    Ok(credential)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
