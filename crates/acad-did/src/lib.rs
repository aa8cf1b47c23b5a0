//! # acad-did — Decentralized Identifiers
//!
//! - [`key`]: the `did:key` codec. Encodes an Ed25519 public key into a
//!   self-certifying identifier and derives its DID document with no I/O.
//! - [`web`]: `did:web` → HTTPS URL mapping and document resolution through
//!   an injected [`Fetch`](acad_core::Fetch) capability.
//! - [`document`]: the typed DID document and verification-method key
//!   extraction (`publicKeyMultibase` or Ed25519 `publicKeyJwk`).
//! - [`resolver`]: the scheme dispatcher [`resolve_any`] and the
//!   [`KeyResolver`] capability consumed by credential verification.
//! - `http` (feature, default on): [`HttpFetcher`], a reqwest-backed fetcher.

pub mod document;
pub mod error;
pub mod key;
pub mod resolver;
pub mod web;

#[cfg(feature = "http")]
pub mod http;

pub use document::{
    DidDocument, KeyPurpose, PublicKeyJwk, VerificationMethod, VerificationRelationship,
};
pub use error::DidError;
pub use key::{did_key_to_public_key, public_key_to_did_key, resolve_did_key, ED25519_CODEC};
pub use resolver::{resolve_any, DidKeyResolver, DidMethod, KeyResolver, StaticKeyResolver};
pub use web::{did_web_to_url, resolve_did_web};

#[cfg(feature = "http")]
pub use http::HttpFetcher;
