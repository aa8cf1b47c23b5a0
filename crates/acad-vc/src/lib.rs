//! # acad-vc — Verifiable Credentials and Presentations
//!
//! - **Credential engine** ([`credential`]): builds a credential, signs the
//!   JCS canonical form of everything except `proof` through an injected
//!   [`Signer`](acad_crypto::Signer), and attaches an
//!   `Ed25519Signature2020` proof.
//! - **Credential verification** ([`verify`]): an ordered pipeline with
//!   early exit (proof presence, proof type, issuance date, expiration,
//!   issuer key, signature, revocation) that reports a [`VerifyResult`]
//!   instead of an error.
//! - **Presentation engine** ([`presentation`]): a holder-signed envelope
//!   bound to a verifier-chosen challenge and domain, verified together
//!   with every embedded credential.
//!
//! ## Security Invariants
//!
//! - Every signing input is built with
//!   [`CanonicalBytes`](acad_core::CanonicalBytes); raw serialization is
//!   never signed.
//! - Dates are kept as the exact strings that were signed, so the
//!   verifier re-canonicalizes byte-identical input.
//! - Presentation verification rebuilds the challenge/domain binding from
//!   the verifier's expected values, never from the proof.

pub mod credential;
pub mod error;
pub mod presentation;
pub mod proof;
pub mod verify;

pub use credential::{
    create_credential, sign_credential, CredentialOptions, CredentialStatus, StatusPointer,
    VerifiableCredential, CREDENTIALS_V1_CONTEXT, ED25519_2020_CONTEXT, REVOCATION_PURPOSE,
    STATUS_LIST_2021_CONTEXT, VERIFIABLE_CREDENTIAL_TYPE,
};
pub use error::VcError;
pub use presentation::{
    create_presentation, PresentationOptions, PresentationVerifier, PresentationVerifyResult,
    VerifiablePresentation, VERIFIABLE_PRESENTATION_TYPE,
};
pub use proof::{Proof, ProofPurpose, ProofType};
pub use verify::{
    CredentialCheck, CredentialVerifier, NoKeyResolver, NoRevocationCheck, RevocationCheck,
    VerifyResult,
};
