//! # DID Error Types
//!
//! Encoding errors (malformed identifier, wrong multicodec tag, wrong key
//! length) fail fast at the codec boundary. Resolution errors carry the URL
//! and status so a caller can decide whether to retry.

use acad_core::FetchError;
use acad_crypto::CryptoError;
use thiserror::Error;

use crate::document::KeyPurpose;

/// Errors from DID encoding and resolution.
#[derive(Error, Debug)]
pub enum DidError {
    /// The identifier is structurally invalid.
    #[error("invalid DID: {0}")]
    InvalidDid(String),

    /// The identifier's method is not `key` or `web`.
    #[error("unsupported DID method: {0}")]
    UnsupportedMethod(String),

    /// The did:key payload does not carry the Ed25519 multicodec tag.
    #[error("unsupported multicodec prefix {0:02x?}, expected Ed25519 (ed01)")]
    InvalidMulticodec(Vec<u8>),

    /// The decoded key is not 32 bytes.
    #[error("invalid Ed25519 key length: expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The DID document host answered with a non-success status.
    #[error("DID resolution failed for {url}: HTTP {status}")]
    Resolution {
        /// Document URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The fetch capability failed at the transport level.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetched document could not be parsed or is inconsistent.
    #[error("malformed DID document: {0}")]
    MalformedDocument(String),

    /// The referenced verification method is absent from the document.
    #[error("verification method {method} not found in DID document {did}")]
    VerificationMethodNotFound {
        /// DID whose document was searched.
        did: String,
        /// The method reference that was requested.
        method: String,
    },

    /// The method exists but is not listed under the relationship the
    /// proof requires.
    #[error("verification method {method} is not listed under {purpose} in DID document {did}")]
    MethodNotAuthorized {
        /// DID whose document was searched.
        did: String,
        /// The method reference that was requested.
        method: String,
        /// The relationship the proof requires.
        purpose: KeyPurpose,
    },

    /// Neither a pinned key nor a resolver was configured for this DID.
    #[error("no key source configured to resolve {0}")]
    NoKeySource(String),

    /// Key material in a verification method could not be decoded.
    #[error("invalid verification key: {0}")]
    Key(#[from] CryptoError),
}
