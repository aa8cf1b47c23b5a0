//! # acad-status — Revocation Status Lists
//!
//! One bit per credential slot, compressed and published inside a list
//! credential. A credential's `credentialStatus` points at the list URL and
//! its index; the list itself never records which credential owns a bit.
//!
//! - [`bitstring`]: create, read, and flip bits of an `encodedList`.
//! - [`list`]: wrap an `encodedList` as a (still unsigned) list credential.
//! - [`check`]: resolve a credential's pointer through the injected
//!   [`Fetch`](acad_core::Fetch) capability; [`StatusListChecker`] plugs
//!   this into [`CredentialVerifier`](acad_vc::CredentialVerifier).
//! - [`registry`]: an in-memory registry that serializes writers per list.

pub mod bitstring;
pub mod check;
pub mod error;
pub mod list;
pub mod registry;

pub use bitstring::{create_list, get_bit, set_bit, Bitstring, EncodedList, DEFAULT_LIST_LENGTH};
pub use check::{is_revoked, StatusListChecker};
pub use error::StatusError;
pub use list::{
    build_list_credential, encoded_list_of, ListCredentialOptions, STATUS_LIST_CREDENTIAL_TYPE,
    STATUS_LIST_SUBJECT_TYPE,
};
pub use registry::StatusListRegistry;
