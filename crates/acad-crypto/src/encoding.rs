//! # Byte Encodings
//!
//! - Signatures travel as base64url without padding.
//! - Public keys and `did:key` payloads use the network's multibase
//!   convention: the `z` marker followed by **standard padded base64**.
//!
//! The multibase `z` prefix normally denotes base58btc. Identifiers already
//! issued on this network use base64 under that prefix, so the convention
//! is kept as-is; changing it would orphan every existing `did:key`.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;

use crate::error::CryptoError;

/// Multibase marker used for public keys on this network.
pub const MULTIBASE_PREFIX: char = 'z';

/// Encode bytes as base64url without padding.
pub fn base64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url without padding.
pub fn base64url_decode(s: &str) -> Result<Vec<u8>, CryptoError> {
    URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|e| CryptoError::Base64Decode(format!("base64url: {e}")))
}

/// Encode bytes as `z` + standard base64.
pub fn multibase_encode(bytes: &[u8]) -> String {
    format!("{MULTIBASE_PREFIX}{}", STANDARD.encode(bytes))
}

/// Decode a `z` + standard base64 value.
pub fn multibase_decode(s: &str) -> Result<Vec<u8>, CryptoError> {
    let Some(body) = s.strip_prefix(MULTIBASE_PREFIX) else {
        return Err(CryptoError::InvalidMultibase(format!(
            "expected '{MULTIBASE_PREFIX}' prefix in {s:?}"
        )));
    };
    STANDARD
        .decode(body)
        .map_err(|e| CryptoError::Base64Decode(format!("multibase body: {e}")))
}
