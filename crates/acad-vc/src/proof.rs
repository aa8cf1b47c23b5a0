//! # Proof Types
//!
//! The proof block attached to credentials and presentations. Only
//! `Ed25519Signature2020` is produced or accepted; any other type string
//! still parses (as [`ProofType::Unknown`]) so that verification can report
//! it as unsupported rather than failing to read the document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The signature suite of a proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProofType {
    /// Ed25519 signature over the JCS canonical form, base64url `proofValue`.
    Ed25519Signature2020,
    /// Any other suite name.
    Unknown(String),
}

impl ProofType {
    /// The suite name as it appears in JSON.
    pub fn as_str(&self) -> &str {
        match self {
            ProofType::Ed25519Signature2020 => "Ed25519Signature2020",
            ProofType::Unknown(s) => s,
        }
    }

    /// Returns `true` for the one supported suite.
    pub fn is_supported(&self) -> bool {
        matches!(self, ProofType::Ed25519Signature2020)
    }
}

impl From<String> for ProofType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Ed25519Signature2020" => ProofType::Ed25519Signature2020,
            _ => ProofType::Unknown(s),
        }
    }
}

impl From<ProofType> for String {
    fn from(t: ProofType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a proof is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProofPurpose {
    /// Issuer asserts the claims (credentials).
    AssertionMethod,
    /// Holder authenticates (presentations).
    Authentication,
    /// Any other purpose.
    Other(String),
}

impl ProofPurpose {
    /// The purpose as it appears in JSON.
    pub fn as_str(&self) -> &str {
        match self {
            ProofPurpose::AssertionMethod => "assertionMethod",
            ProofPurpose::Authentication => "authentication",
            ProofPurpose::Other(s) => s,
        }
    }
}

impl From<String> for ProofPurpose {
    fn from(s: String) -> Self {
        match s.as_str() {
            "assertionMethod" => ProofPurpose::AssertionMethod,
            "authentication" => ProofPurpose::Authentication,
            _ => ProofPurpose::Other(s),
        }
    }
}

impl From<ProofPurpose> for String {
    fn from(p: ProofPurpose) -> Self {
        p.as_str().to_string()
    }
}

impl std::fmt::Display for ProofPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proof block.
///
/// `challenge` and `domain` are present only on presentation proofs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// Signature suite.
    #[serde(rename = "type")]
    pub proof_type: ProofType,

    /// Creation time, ISO 8601 UTC.
    pub created: String,

    /// DID URL of the signing key.
    pub verification_method: String,

    /// Proof purpose.
    pub proof_purpose: ProofPurpose,

    /// base64url-unpadded signature bytes.
    pub proof_value: String,

    /// Verifier-chosen nonce (presentations).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,

    /// Verifier identity (presentations).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Any other proof fields, kept so a parsed document re-serializes
    /// unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proof_type_round_trip() {
        let json = serde_json::to_string(&ProofType::Ed25519Signature2020).unwrap();
        assert_eq!(json, "\"Ed25519Signature2020\"");
        let back: ProofType = serde_json::from_str(&json).unwrap();
        assert!(back.is_supported());
    }

    #[test]
    fn unknown_proof_type_parses() {
        let t: ProofType = serde_json::from_str("\"BbsBlsSignature2020\"").unwrap();
        assert_eq!(t, ProofType::Unknown("BbsBlsSignature2020".into()));
        assert!(!t.is_supported());
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"BbsBlsSignature2020\"");
    }

    #[test]
    fn proof_purpose_camel_case() {
        assert_eq!(
            serde_json::to_string(&ProofPurpose::AssertionMethod).unwrap(),
            "\"assertionMethod\""
        );
        let p: ProofPurpose = serde_json::from_str("\"authentication\"").unwrap();
        assert_eq!(p, ProofPurpose::Authentication);
        let p: ProofPurpose = serde_json::from_str("\"capabilityInvocation\"").unwrap();
        assert_eq!(p.to_string(), "capabilityInvocation");
    }

    #[test]
    fn proof_field_names() {
        let proof = Proof {
            proof_type: ProofType::Ed25519Signature2020,
            created: "2026-01-15T12:00:00Z".into(),
            verification_method: "did:web:uni.example#key-1".into(),
            proof_purpose: ProofPurpose::AssertionMethod,
            proof_value: "abc".into(),
            challenge: None,
            domain: None,
            extra: Map::new(),
        };
        let json = serde_json::to_value(&proof).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["created", "proofPurpose", "proofValue", "type", "verificationMethod"]
        );
    }

    #[test]
    fn presentation_proof_carries_challenge_and_domain() {
        let json = serde_json::json!({
            "type": "Ed25519Signature2020",
            "created": "2026-01-15T12:00:00Z",
            "verificationMethod": "did:key:zabc#zabc",
            "proofPurpose": "authentication",
            "proofValue": "abc",
            "challenge": "c1",
            "domain": "admissions.uni.example",
        });
        let proof: Proof = serde_json::from_value(json).unwrap();
        assert_eq!(proof.challenge.as_deref(), Some("c1"));
        assert_eq!(proof.domain.as_deref(), Some("admissions.uni.example"));
    }
}
