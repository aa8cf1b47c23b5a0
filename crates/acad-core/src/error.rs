//! # Error Types
//!
//! Errors shared across the trust layer. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! Verification *outcomes* (invalid signature, expired, revoked) are not
//! errors; they are reported through structured results in `acad-vc`.
//! The types here cover structurally broken input and transport failure.

use thiserror::Error;

/// Top-level error type for core operations.
#[derive(Error, Debug)]
pub enum AcadError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Fetching a remote document failed.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// A timestamp or other field failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error raised by an injected fetch capability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The transport failed before a response was received.
    #[error("transport failure fetching {url}: {reason}")]
    Transport {
        /// The URL being fetched.
        url: String,
        /// Transport-level reason (connection refused, timeout, ...).
        reason: String,
    },
}
