//! # Status List Credentials
//!
//! The published form of a list: a credential whose subject carries the
//! `encodedList`. [`build_list_credential`] returns it unsigned; sign it
//! with [`acad_vc::sign_credential`] before publishing.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use acad_core::Timestamp;
use acad_vc::{
    VerifiableCredential, CREDENTIALS_V1_CONTEXT, REVOCATION_PURPOSE, STATUS_LIST_2021_CONTEXT,
    VERIFIABLE_CREDENTIAL_TYPE,
};

use crate::error::StatusError;

/// Credential type of a published list.
pub const STATUS_LIST_CREDENTIAL_TYPE: &str = "StatusList2021Credential";

/// Subject type of a published list.
pub const STATUS_LIST_SUBJECT_TYPE: &str = "StatusList2021";

/// Inputs to [`build_list_credential`].
#[derive(Debug, Clone)]
pub struct ListCredentialOptions {
    /// URL the list credential is published at; also its `id`.
    pub list_url: String,
    pub issuer: String,
    /// Defaults to now.
    pub issued_at: Option<DateTime<Utc>>,
}

impl ListCredentialOptions {
    pub fn new(list_url: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            list_url: list_url.into(),
            issuer: issuer.into(),
            issued_at: None,
        }
    }

    pub fn issued_at(mut self, at: DateTime<Utc>) -> Self {
        self.issued_at = Some(at);
        self
    }
}

/// Wrap `encoded_list` as an unsigned list credential.
pub fn build_list_credential(opts: &ListCredentialOptions, encoded_list: &str) -> VerifiableCredential {
    let issued = opts.issued_at.map_or_else(Timestamp::now, Timestamp::from_utc);
    VerifiableCredential {
        context: vec![
            Value::String(CREDENTIALS_V1_CONTEXT.to_string()),
            Value::String(STATUS_LIST_2021_CONTEXT.to_string()),
        ],
        id: Some(opts.list_url.clone()),
        types: vec![
            VERIFIABLE_CREDENTIAL_TYPE.to_string(),
            STATUS_LIST_CREDENTIAL_TYPE.to_string(),
        ],
        issuer: opts.issuer.clone(),
        issuance_date: issued.to_iso8601(),
        expiration_date: None,
        credential_status: None,
        credential_subject: json!({
            "id": format!("{}#list", opts.list_url),
            "type": STATUS_LIST_SUBJECT_TYPE,
            "statusPurpose": REVOCATION_PURPOSE,
            "encodedList": encoded_list,
        }),
        proof: None,
        extra: Map::new(),
    }
}

/// Extract `encodedList` from a list credential whose purpose is `purpose`.
pub fn encoded_list_of<'a>(
    list: &'a VerifiableCredential,
    purpose: &str,
) -> Result<&'a str, StatusError> {
    let subject = &list.credential_subject;
    let encoded = subject
        .get("encodedList")
        .and_then(Value::as_str)
        .ok_or_else(|| StatusError::MalformedListCredential("credentialSubject.encodedList missing".into()))?;

    match subject.get("statusPurpose").and_then(Value::as_str) {
        Some(p) if p != purpose => Err(StatusError::MalformedListCredential(format!(
            "list purpose {p:?} does not match credential purpose {purpose:?}"
        ))),
        _ => Ok(encoded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstring::create_list;
    use chrono::TimeZone;

    const LIST: &str = "https://registrar.uni.example/status/1";

    #[test]
    fn list_credential_shape() {
        let encoded = create_list(1024).unwrap().encoded_list;
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let vc = build_list_credential(
            &ListCredentialOptions::new(LIST, "did:web:registrar.uni.example").issued_at(at),
            &encoded,
        );
        let json = serde_json::to_value(&vc).unwrap();
        assert_eq!(json["id"], LIST);
        assert_eq!(json["type"], json!(["VerifiableCredential", "StatusList2021Credential"]));
        assert_eq!(json["issuanceDate"], "2026-01-01T00:00:00Z");
        assert_eq!(
            json["credentialSubject"],
            json!({
                "id": format!("{LIST}#list"),
                "type": "StatusList2021",
                "statusPurpose": "revocation",
                "encodedList": encoded,
            })
        );
        assert!(json.get("proof").is_none());
    }

    #[test]
    fn encoded_list_extraction() {
        let vc = build_list_credential(&ListCredentialOptions::new(LIST, "did:key:zissuer"), "H4sI");
        assert_eq!(encoded_list_of(&vc, "revocation").unwrap(), "H4sI");
        assert!(matches!(
            encoded_list_of(&vc, "suspension"),
            Err(StatusError::MalformedListCredential(_))
        ));
    }

    #[test]
    fn missing_encoded_list() {
        let mut vc = build_list_credential(&ListCredentialOptions::new(LIST, "did:key:zissuer"), "x");
        vc.credential_subject = json!({ "id": "x" });
        assert!(matches!(
            encoded_list_of(&vc, "revocation"),
            Err(StatusError::MalformedListCredential(_))
        ));
    }
}
