//! # acad-crypto — Cryptographic Primitives
//!
//! - **Ed25519** key generation, signing and verification over
//!   [`CanonicalBytes`](acad_core::CanonicalBytes).
//! - **Encodings**: base64url-unpadded signatures and the local multibase
//!   convention for public keys (`z` + standard base64, see [`encoding`]).
//! - **Signing backends** behind the [`Signer`] / [`SignatureVerifier`]
//!   traits: an in-memory [`LocalSigner`] and, with the `remote` feature,
//!   an HTTP [`RemoteSigner`]. Call sites are generic over the trait and
//!   never depend on the transport.
//!
//! ## Crate Policy
//!
//! - Depends only on `acad-core` internally.
//! - No mocking of cryptographic operations in tests; all tests use real
//!   Ed25519.
//! - Private key material never appears in `Debug` output and is zeroized
//!   on drop.

pub mod ed25519;
pub mod encoding;
pub mod error;
pub mod signer;

#[cfg(feature = "remote")]
pub mod remote;

pub use ed25519::{verify, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use error::CryptoError;
pub use signer::{Ed25519Verifier, LocalSigner, SignatureVerifier, Signer};

#[cfg(feature = "remote")]
pub use remote::{RemoteSigner, RemoteSignerConfig};
