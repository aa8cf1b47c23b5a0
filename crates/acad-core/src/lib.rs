//! # acad-core — Foundational Types for the Credential Trust Layer
//!
//! This crate is the leaf of the workspace DAG. It defines the primitives
//! every other crate builds on:
//!
//! 1. **`CanonicalBytes` newtype.** All signing and verification input flows
//!    through `CanonicalBytes::new()` (RFC 8785 JCS). Two structurally equal
//!    documents produce identical bytes regardless of key order.
//!
//! 2. **Content digests.** `sha256()` over arbitrary bytes, `sha256_digest()`
//!    over canonical bytes, and keyed `hmac_sha256()` tags for auxiliary
//!    integrity checks outside the credential proof.
//!
//! 3. **UTC-only timestamps.** `Timestamp` renders `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! 4. **`Fetch` capability.** Network retrieval is injected by the caller;
//!    nothing in the core performs I/O on its own or retries.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `acad-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - No process-wide mutable state.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod fetch;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::{canonicalize, CanonicalBytes};
pub use digest::{
    hmac_sha256, sha256, sha256_digest, sha256_hex, verify_hmac_sha256, ContentDigest,
    DigestAlgorithm, HmacTag,
};
pub use error::{AcadError, CanonicalizationError, FetchError};
pub use fetch::{Fetch, FetchResponse, MemoryFetcher};
pub use temporal::Timestamp;
