//! Errors raised while *building* credentials and presentations.
//!
//! Verification outcomes are reported through
//! [`VerifyResult`](crate::VerifyResult) and
//! [`PresentationVerifyResult`](crate::PresentationVerifyResult), not here.

use acad_core::CanonicalizationError;
use acad_crypto::CryptoError;
use thiserror::Error;

/// Errors from credential and presentation construction.
#[derive(Error, Debug)]
pub enum VcError {
    /// Canonicalization of the signing input failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// JSON conversion failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The signing backend failed.
    #[error("signing failed: {0}")]
    Signing(#[from] CryptoError),

    /// Subject claims are not a JSON object.
    #[error("invalid claims: {0}")]
    InvalidClaims(String),

    /// A presentation must embed at least one credential.
    #[error("presentation must contain at least one credential")]
    EmptyPresentation,

    /// The credential's status pointer is malformed.
    #[error("invalid credentialStatus: {0}")]
    InvalidStatus(String),

    /// A revocation check could not be completed.
    #[error("revocation check failed: {0}")]
    Revocation(String),
}
