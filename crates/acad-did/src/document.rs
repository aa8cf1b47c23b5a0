//! # DID Document
//!
//! The subset of a DID document the trust layer reads: verification
//! methods, the `authentication` and `assertionMethod` relationships, and
//! alternate names. Fields not modelled here are ignored on parse.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use acad_crypto::{CryptoError, Ed25519PublicKey};

use crate::error::DidError;

/// DID core context.
pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// Ed25519 2020 suite context.
pub const ED25519_2020_CONTEXT: &str = "https://w3id.org/security/suites/ed25519-2020/v1";

/// Verification method type for Ed25519 keys.
pub const ED25519_VERIFICATION_KEY_2020: &str = "Ed25519VerificationKey2020";

/// A resolved DID document.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    /// JSON-LD contexts.
    #[serde(rename = "@context", default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<Value>,

    /// The DID this document describes.
    pub id: String,

    /// Other identifiers for the same subject (e.g. a did:key alias of a
    /// did:web registrar).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub also_known_as: Vec<String>,

    /// Verification methods declared by the subject.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verification_method: Vec<VerificationMethod>,

    /// Methods usable for authentication (presentation proofs).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<VerificationRelationship>,

    /// Methods usable for assertions (credential proofs).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertion_method: Vec<VerificationRelationship>,
}

/// A verification method entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// Method id, absolute (`did:…#frag`) or relative (`#frag`).
    pub id: String,

    /// Method type, e.g. `Ed25519VerificationKey2020`.
    #[serde(rename = "type")]
    pub type_: String,

    /// Controlling DID.
    pub controller: String,

    /// Key in the network's multibase convention.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_multibase: Option<String>,

    /// Key as an OKP JSON Web Key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_jwk: Option<PublicKeyJwk>,
}

/// An Ed25519 public key in JWK form (RFC 8037).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicKeyJwk {
    /// Key type; must be `OKP`.
    pub kty: String,
    /// Curve; must be `Ed25519`.
    pub crv: String,
    /// base64url-unpadded public key bytes.
    pub x: String,
    /// Optional key id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

/// The relationship a verification method must hold to sign a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPurpose {
    /// Credential proofs; the method must appear under `assertionMethod`.
    AssertionMethod,
    /// Presentation proofs; the method must appear under `authentication`.
    Authentication,
}

impl KeyPurpose {
    /// The relationship name as it appears in DID documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssertionMethod => "assertionMethod",
            Self::Authentication => "authentication",
        }
    }
}

impl std::fmt::Display for KeyPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verification relationship entry: a reference or an embedded method.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum VerificationRelationship {
    /// Reference to a method in `verificationMethod`.
    Reference(String),
    /// Method embedded directly in the relationship.
    Embedded(VerificationMethod),
}

impl VerificationRelationship {
    /// The method id this entry names.
    pub fn id(&self) -> &str {
        match self {
            Self::Reference(id) => id,
            Self::Embedded(vm) => &vm.id,
        }
    }
}

impl VerificationMethod {
    /// An `Ed25519VerificationKey2020` method for `key`.
    pub fn ed25519(id: impl Into<String>, controller: impl Into<String>, key: &Ed25519PublicKey) -> Self {
        Self {
            id: id.into(),
            type_: ED25519_VERIFICATION_KEY_2020.to_string(),
            controller: controller.into(),
            public_key_multibase: Some(key.to_multibase()),
            public_key_jwk: None,
        }
    }

    /// Extract the Ed25519 public key.
    ///
    /// `publicKeyMultibase` takes precedence over `publicKeyJwk`.
    pub fn public_key(&self) -> Result<Ed25519PublicKey, DidError> {
        if let Some(mb) = &self.public_key_multibase {
            return Ok(Ed25519PublicKey::from_multibase(mb)?);
        }
        if let Some(jwk) = &self.public_key_jwk {
            return jwk.public_key();
        }
        Err(DidError::MalformedDocument(format!(
            "verification method {} has no public key material",
            self.id
        )))
    }
}

impl PublicKeyJwk {
    /// JWK form of an Ed25519 key.
    pub fn from_public_key(key: &Ed25519PublicKey) -> Self {
        Self {
            kty: "OKP".to_string(),
            crv: "Ed25519".to_string(),
            x: URL_SAFE_NO_PAD.encode(key.as_bytes()),
            kid: None,
        }
    }

    /// Decode the Ed25519 key, rejecting other key types and curves.
    pub fn public_key(&self) -> Result<Ed25519PublicKey, DidError> {
        if self.kty != "OKP" || self.crv != "Ed25519" {
            return Err(DidError::MalformedDocument(format!(
                "unsupported JWK {}/{}, expected OKP/Ed25519",
                self.kty, self.crv
            )));
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(&self.x)
            .map_err(|e| CryptoError::Base64Decode(format!("JWK x: {e}")))?;
        if bytes.len() != 32 {
            return Err(DidError::InvalidKeyLength(bytes.len()));
        }
        Ok(Ed25519PublicKey::from_slice(&bytes)?)
    }
}

impl DidDocument {
    /// Build the single-key document used for `did:key` and for
    /// registrar-hosted `did:web` documents.
    pub fn for_ed25519(did: &str, fragment: &str, key: &Ed25519PublicKey) -> Self {
        let method_id = format!("{did}#{fragment}");
        Self {
            context: vec![
                Value::String(DID_CONTEXT.to_string()),
                Value::String(ED25519_2020_CONTEXT.to_string()),
            ],
            id: did.to_string(),
            also_known_as: Vec::new(),
            verification_method: vec![VerificationMethod::ed25519(&method_id, did, key)],
            authentication: vec![VerificationRelationship::Reference(method_id.clone())],
            assertion_method: vec![VerificationRelationship::Reference(method_id)],
        }
    }

    /// Find a verification method by reference.
    ///
    /// `method_ref` may be absolute (`did:web:uni.example#key-1`) or a bare
    /// fragment (`#key-1`); method ids in the document may likewise be
    /// absolute or relative to the document id.
    pub fn find_method(&self, method_ref: &str) -> Option<&VerificationMethod> {
        let wanted = self.absolute(method_ref);
        let embedded = self
            .authentication
            .iter()
            .chain(self.assertion_method.iter())
            .filter_map(|rel| match rel {
                VerificationRelationship::Embedded(vm) => Some(vm),
                VerificationRelationship::Reference(_) => None,
            });
        self.verification_method
            .iter()
            .chain(embedded)
            .find(|vm| self.absolute(&vm.id) == wanted)
    }

    /// Resolve `method_ref` to its Ed25519 public key.
    pub fn public_key_for(&self, method_ref: &str) -> Result<Ed25519PublicKey, DidError> {
        self.find_method(method_ref)
            .ok_or_else(|| DidError::VerificationMethodNotFound {
                did: self.id.clone(),
                method: method_ref.to_string(),
            })?
            .public_key()
    }

    /// Resolve `method_ref` to its key, requiring that the document lists
    /// it under the relationship `purpose` names.
    pub fn key_for_purpose(
        &self,
        method_ref: &str,
        purpose: KeyPurpose,
    ) -> Result<Ed25519PublicKey, DidError> {
        let method = self
            .find_method(method_ref)
            .ok_or_else(|| DidError::VerificationMethodNotFound {
                did: self.id.clone(),
                method: method_ref.to_string(),
            })?;
        if !self.authorizes(method_ref, purpose) {
            return Err(DidError::MethodNotAuthorized {
                did: self.id.clone(),
                method: method_ref.to_string(),
                purpose,
            });
        }
        method.public_key()
    }

    /// Returns `true` if `method_ref` is listed under the relationship
    /// `purpose` names.
    pub fn authorizes(&self, method_ref: &str, purpose: KeyPurpose) -> bool {
        match purpose {
            KeyPurpose::AssertionMethod => self.is_assertion_method(method_ref),
            KeyPurpose::Authentication => self.is_authentication_method(method_ref),
        }
    }

    /// Returns `true` if `method_ref` is listed under `assertionMethod`.
    pub fn is_assertion_method(&self, method_ref: &str) -> bool {
        let wanted = self.absolute(method_ref);
        self.assertion_method
            .iter()
            .any(|rel| self.absolute(rel.id()) == wanted)
    }

    /// Returns `true` if `method_ref` is listed under `authentication`.
    pub fn is_authentication_method(&self, method_ref: &str) -> bool {
        let wanted = self.absolute(method_ref);
        self.authentication
            .iter()
            .any(|rel| self.absolute(rel.id()) == wanted)
    }

    fn absolute(&self, id: &str) -> String {
        if id.starts_with('#') {
            format!("{}{id}", self.id)
        } else {
            id.to_string()
        }
    }
}
