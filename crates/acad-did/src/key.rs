//! # did:key Codec
//!
//! A `did:key` identifier is the Ed25519 multicodec tag `0xed 0x01`
//! followed by the raw 32-byte public key, multibase-encoded and prefixed
//! with `did:key:`. The DID document is derived from the identifier alone.
//!
//! Multibase here is the network convention of [`acad_crypto::encoding`]
//! (`z` + standard base64), so identifiers look like
//! `did:key:z7QE…=` rather than the base58 `did:key:z6Mk…` form.

use acad_crypto::encoding::{multibase_decode, multibase_encode, MULTIBASE_PREFIX};
use acad_crypto::Ed25519PublicKey;

use crate::document::DidDocument;
use crate::error::DidError;

/// Multicodec tag for an Ed25519 public key.
pub const ED25519_CODEC: [u8; 2] = [0xed, 0x01];

/// Scheme prefix of key-derived identifiers.
pub const DID_KEY_PREFIX: &str = "did:key:";

/// Encode a public key as a `did:key` identifier.
pub fn public_key_to_did_key(key: &Ed25519PublicKey) -> String {
    let mut payload = Vec::with_capacity(34);
    payload.extend_from_slice(&ED25519_CODEC);
    payload.extend_from_slice(key.as_bytes());
    format!("{DID_KEY_PREFIX}{}", multibase_encode(&payload))
}

/// Decode a `did:key` identifier back to its public key.
///
/// A trailing `#fragment` is ignored.
pub fn did_key_to_public_key(did: &str) -> Result<Ed25519PublicKey, DidError> {
    let did = strip_fragment(did);
    let Some(multikey) = did.strip_prefix(DID_KEY_PREFIX) else {
        return Err(DidError::InvalidDid(format!("{did:?} is not a did:key")));
    };
    if multikey.len() < 2 || !multikey.starts_with(MULTIBASE_PREFIX) {
        return Err(DidError::InvalidDid(format!(
            "did:key method-specific id must be '{MULTIBASE_PREFIX}'-prefixed multibase, got {multikey:?}"
        )));
    }

    let payload = multibase_decode(multikey)
        .map_err(|e| DidError::InvalidDid(format!("issue decoding key: {e}")))?;
    if payload.len() < ED25519_CODEC.len() || payload[..2] != ED25519_CODEC {
        return Err(DidError::InvalidMulticodec(
            payload.iter().take(2).copied().collect(),
        ));
    }
    let key_bytes = &payload[2..];
    if key_bytes.len() != 32 {
        return Err(DidError::InvalidKeyLength(key_bytes.len()));
    }
    Ok(Ed25519PublicKey::from_slice(key_bytes)?)
}

/// Derive the DID document for a `did:key` identifier. No network access.
///
/// The single verification method is `<did>#<multibase>` and is listed
/// under both `authentication` and `assertionMethod`.
pub fn resolve_did_key(did: &str) -> Result<DidDocument, DidError> {
    let did = strip_fragment(did);
    let key = did_key_to_public_key(did)?;
    let fragment = &did[DID_KEY_PREFIX.len()..];
    Ok(DidDocument::for_ed25519(did, fragment, &key))
}

pub(crate) fn strip_fragment(did: &str) -> &str {
    did.split_once('#').map_or(did, |(base, _)| base)
}
