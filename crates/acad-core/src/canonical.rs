//! # Canonical Serialization — JCS Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! that are signed, verified, or hashed anywhere in the trust layer.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()` or
//! `CanonicalBytes::from_value()`, both of which serialize with `serde_jcs`
//! (RFC 8785): object keys sorted by UTF-16 code units, compact separators,
//! ECMAScript number formatting.
//!
//! A signer and a verifier that both go through this type operate on the
//! same byte sequence for any two structurally equal documents, no matter
//! how the keys were ordered on the wire or how a number was spelled
//! (`1.50` and `1.5` canonicalize identically).

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - Constructed only by [`CanonicalBytes::new()`] or [`CanonicalBytes::from_value()`].
/// - Object keys are sorted, separators are compact, output is UTF-8.
/// - Byte-identical for structurally equal inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON (e.g. a map with non-string keys).
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(value)
    }

    /// Construct canonical bytes from an already-built JSON value.
    ///
    /// Used by the proof pipelines, which strip or merge fields on a
    /// `serde_json::Value` before canonicalizing.
    pub fn from_value(value: Value) -> Result<Self, CanonicalizationError> {
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// View the canonical bytes as a string slice.
    ///
    /// JCS output is always valid UTF-8; an invalid sequence is unreachable
    /// through the constructors and yields an empty string.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Canonicalize a document into its JCS string form.
///
/// Pure function: no I/O, no state. Equivalent to
/// `CanonicalBytes::new(doc)?.as_str().to_owned()`.
pub fn canonicalize(doc: &impl Serialize) -> Result<String, CanonicalizationError> {
    let bytes = CanonicalBytes::new(doc)?;
    Ok(bytes.as_str().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_bytes_simple_dict() {
        let data = serde_json::json!({"b": 2, "a": 1, "c": "hello"});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        assert_eq!(cb.as_str(), r#"{"a":1,"b":2,"c":"hello"}"#);
    }

    #[test]
    fn test_canonical_bytes_nested() {
        let data = serde_json::json!({
            "outer": {"b": 2, "a": 1},
            "list": [3, 2, 1]
        });
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        // Nested objects are sorted too; array order is preserved.
        assert_eq!(cb.as_str(), r#"{"list":[3,2,1],"outer":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_key_order_independent() {
        let a: Value = serde_json::from_str(r#"{"name":"Ada","credits":6,"course":{"code":"CS101","term":"2026S"}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"course":{"term":"2026S","code":"CS101"},"credits":6,"name":"Ada"}"#).unwrap();
        assert_eq!(
            CanonicalBytes::new(&a).unwrap(),
            CanonicalBytes::new(&b).unwrap()
        );
    }

    #[test]
    fn test_number_formatting_normalized() {
        let a: Value = serde_json::from_str(r#"{"gpa": 3.50}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"gpa": 3.5}"#).unwrap();
        let ca = CanonicalBytes::new(&a).unwrap();
        assert_eq!(ca, CanonicalBytes::new(&b).unwrap());
        assert_eq!(ca.as_str(), r#"{"gpa":3.5}"#);
    }

    #[test]
    fn test_whitespace_ignored() {
        let a: Value = serde_json::from_str("{ \"a\" : [ 1 , 2 ] }").unwrap();
        let cb = CanonicalBytes::new(&a).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_null_and_bool_passthrough() {
        let data = serde_json::json!({"flag": true, "other": false, "none": null});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_str(), r#"{"flag":true,"none":null,"other":false}"#);
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(CanonicalBytes::new(&serde_json::json!({})).unwrap().as_bytes(), b"{}");
        assert_eq!(CanonicalBytes::new(&serde_json::json!([])).unwrap().as_bytes(), b"[]");
    }

    #[test]
    fn test_unicode_passthrough() {
        let data = serde_json::json!({"name": "Zoë Ångström"});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert!(cb.as_str().contains("Zoë Ångström"));
    }

    #[test]
    fn test_canonicalize_matches_bytes() {
        let data = serde_json::json!({"z": 1, "a": 2});
        let s = canonicalize(&data).unwrap();
        assert_eq!(s.as_bytes(), CanonicalBytes::new(&data).unwrap().as_bytes());
    }

    #[test]
    fn test_len_and_is_empty() {
        let cb = CanonicalBytes::new(&serde_json::json!({"a": 1})).unwrap();
        assert!(!cb.is_empty());
        assert_eq!(cb.len(), r#"{"a":1}"#.len());
    }

    #[test]
    fn test_non_string_map_keys_rejected() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], 1);
        assert!(CanonicalBytes::new(&map).is_err());
    }
}
