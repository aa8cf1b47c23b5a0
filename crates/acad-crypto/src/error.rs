//! # Cryptographic Error Types
//!
//! Structured errors for key parsing, signature decoding and signing
//! backends. A signature that simply does not verify is *not* an error;
//! verification returns `false`. `Transport` and `RemoteRejected` exist so
//! a caller can tell "the signing service is down" apart from "the
//! signature is invalid".

use thiserror::Error;

/// Errors from cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Invalid Ed25519 signature length.
    #[error("invalid Ed25519 signature length: expected 64 bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// Invalid Ed25519 public key.
    #[error("invalid Ed25519 public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid Ed25519 signing key material.
    #[error("invalid Ed25519 signing key: {0}")]
    InvalidSigningKey(String),

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(String),

    /// Base64 / base64url decoding error.
    #[error("base64 decode error: {0}")]
    Base64Decode(String),

    /// Multibase value is missing its prefix or has the wrong one.
    #[error("invalid multibase value: {0}")]
    InvalidMultibase(String),

    /// Key material was expected from the environment but is absent.
    #[error("signing key not available: {0}")]
    MissingKey(String),

    /// The remote signing backend could not be reached.
    #[error("transport error calling {endpoint}: {reason}")]
    Transport {
        /// Endpoint URL.
        endpoint: String,
        /// Transport-level reason.
        reason: String,
    },

    /// The remote signing backend answered with a non-success status.
    #[error("signing service {endpoint} returned {status}: {body}")]
    RemoteRejected {
        /// Endpoint URL.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        body: String,
    },

    /// The remote signing backend answered with an unparsable body.
    #[error("invalid response from {endpoint}: {reason}")]
    InvalidResponse {
        /// Endpoint URL.
        endpoint: String,
        /// Why the body was rejected.
        reason: String,
    },
}

impl CryptoError {
    /// Returns `true` for failures of the signing backend's transport
    /// rather than of the cryptography itself.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CryptoError::Transport { .. }
                | CryptoError::RemoteRejected { .. }
                | CryptoError::InvalidResponse { .. }
        )
    }
}
