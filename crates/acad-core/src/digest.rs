//! # Content Digests and Keyed Integrity Tags
//!
//! Fixed-output SHA-256 digests and HMAC-SHA256 tags. These are used for
//! integrity checks that live outside the credential proof, e.g. binding a
//! hash of off-chain syllabus data into a claim without embedding the full
//! payload.
//!
//! All functions are pure: no I/O, no state.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

type HmacSha256 = Hmac<Sha256>;

/// The hash algorithm used to produce a content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256.
    Sha256,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A digest with its algorithm tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a new content digest from raw bytes and algorithm.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        to_hex(&self.bytes)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// An HMAC-SHA256 authentication tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HmacTag(pub [u8; 32]);

impl HmacTag {
    /// Return the raw 32-byte tag.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the tag as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }
}

impl std::fmt::Display for HmacTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Compute a SHA-256 digest of arbitrary bytes.
pub fn sha256(data: &[u8]) -> ContentDigest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// Compute a SHA-256 digest of a canonicalized document.
///
/// Prefer this over [`sha256()`] whenever the input is structured data:
/// the `&CanonicalBytes` parameter guarantees two structurally equal
/// documents hash identically.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    sha256(data.as_bytes())
}

/// Compute a SHA-256 hex string from canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

/// Compute an HMAC-SHA256 tag over `data` with `key`.
///
/// HMAC accepts keys of any length (long keys are hashed first), so this
/// never fails.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> HmacTag {
    let mut mac = new_mac(key);
    mac.update(data);
    let out = mac.finalize().into_bytes();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&out);
    HmacTag(bytes)
}

/// Verify an HMAC-SHA256 tag in constant time.
///
/// Returns `false` for a mismatched or wrong-length tag.
pub fn verify_hmac_sha256(key: &[u8], data: &[u8], tag: &[u8]) -> bool {
    let mut mac = new_mac(key);
    mac.update(data);
    mac.verify_slice(tag).is_ok()
}

fn new_mac(key: &[u8]) -> HmacSha256 {
    match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC is defined for keys of any length"),
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_digest_of_empty_object() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(
            sha256_digest(&cb).to_hex(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_digest_ignores_key_order() {
        let a: serde_json::Value = serde_json::from_str(r#"{"x":1,"y":2}"#).unwrap();
        let b: serde_json::Value = serde_json::from_str(r#"{"y":2,"x":1}"#).unwrap();
        assert_eq!(
            sha256_hex(&CanonicalBytes::new(&a).unwrap()),
            sha256_hex(&CanonicalBytes::new(&b).unwrap())
        );
    }

    #[test]
    fn test_content_digest_display() {
        let digest = sha256(b"syllabus");
        let s = digest.to_string();
        assert!(s.starts_with("sha256:"));
        assert_eq!(s.len(), 7 + 64);
    }

    #[test]
    fn test_hmac_rfc4231_case_2() {
        let tag = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            tag.to_hex(),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_hmac_verify() {
        let tag = hmac_sha256(b"node-secret", b"payload");
        assert!(verify_hmac_sha256(b"node-secret", b"payload", tag.as_bytes()));
        assert!(!verify_hmac_sha256(b"other-secret", b"payload", tag.as_bytes()));
        assert!(!verify_hmac_sha256(b"node-secret", b"payload!", tag.as_bytes()));
        assert!(!verify_hmac_sha256(b"node-secret", b"payload", &tag.as_bytes()[..16]));
    }

    #[test]
    fn test_hmac_empty_key() {
        let tag = hmac_sha256(b"", b"data");
        assert!(verify_hmac_sha256(b"", b"data", tag.as_bytes()));
    }
}
