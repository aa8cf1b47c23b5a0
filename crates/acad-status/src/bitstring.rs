//! # Compressed Revocation Bitstring
//!
//! A status list is a fixed-length bit array, GZIP-compressed and encoded
//! as base64url without padding (`encodedList`). Index 0 is the most
//! significant bit of the first byte, so the list reads left to right.
//!
//! The free functions ([`create_list`], [`set_bit`], [`get_bit`]) treat
//! `encodedList` as an immutable value: each call decodes, works on a
//! private copy, and re-encodes. Concurrent [`set_bit`] calls against the
//! same stored list race (last writer wins); serialize writers per list,
//! as [`StatusListRegistry`](crate::StatusListRegistry) does.

use std::io::{Read, Write};

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use bitvec::order::Msb0;
use bitvec::vec::BitVec;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::StatusError;

/// Default list length in bits (16 KiB uncompressed).
pub const DEFAULT_LIST_LENGTH: usize = 131_072;

/// Upper bound on the inflated size of a fetched list.
const MAX_DECOMPRESSED_BYTES: u64 = 16 * 1024 * 1024;

/// Encodes without padding; decodes with or without.
const ENCODED_LIST: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A freshly created list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedList {
    pub encoded_list: String,
    /// Length in bits.
    pub length: usize,
}

/// Decoded, mutable bitstring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitstring {
    bits: BitVec<u8, Msb0>,
}

impl Bitstring {
    /// An all-zero bitstring of `length` bits.
    pub fn new(length: usize) -> Result<Self, StatusError> {
        if length == 0 || length % 8 != 0 {
            return Err(StatusError::InvalidLength(length));
        }
        Ok(Self {
            bits: BitVec::repeat(false, length),
        })
    }

    /// Decode an `encodedList` value.
    pub fn decode(encoded: &str) -> Result<Self, StatusError> {
        let compressed = ENCODED_LIST
            .decode(encoded.trim())
            .map_err(|e| StatusError::Decode(e.to_string()))?;

        let mut raw = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .take(MAX_DECOMPRESSED_BYTES + 1)
            .read_to_end(&mut raw)
            .map_err(|e| StatusError::Decompress(e.to_string()))?;
        if raw.len() as u64 > MAX_DECOMPRESSED_BYTES {
            return Err(StatusError::Decompress(format!(
                "inflated list exceeds {MAX_DECOMPRESSED_BYTES} bytes"
            )));
        }
        if raw.is_empty() {
            return Err(StatusError::InvalidLength(0));
        }

        Ok(Self {
            bits: BitVec::from_vec(raw),
        })
    }

    /// Compress and encode.
    pub fn encode(&self) -> Result<String, StatusError> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(self.bits.as_raw_slice())
            .map_err(|e| StatusError::Compress(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| StatusError::Compress(e.to_string()))?;
        Ok(ENCODED_LIST.encode(compressed))
    }

    /// Length in bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<bool, StatusError> {
        self.bits
            .get(index)
            .map(|bit| *bit)
            .ok_or(StatusError::IndexOutOfRange {
                index,
                length: self.len(),
            })
    }

    pub fn set(&mut self, index: usize, value: bool) -> Result<(), StatusError> {
        let length = self.len();
        if index >= length {
            return Err(StatusError::IndexOutOfRange { index, length });
        }
        self.bits.set(index, value);
        Ok(())
    }

    /// Number of set bits.
    pub fn count_set(&self) -> usize {
        self.bits.count_ones()
    }
}

/// Allocate an all-zero list of `length` bits.
pub fn create_list(length: usize) -> Result<EncodedList, StatusError> {
    let bits = Bitstring::new(length)?;
    Ok(EncodedList {
        encoded_list: bits.encode()?,
        length,
    })
}

/// Return `encoded` with bit `index` set to `revoked`. Every other bit is
/// unchanged.
pub fn set_bit(encoded: &str, index: usize, revoked: bool) -> Result<String, StatusError> {
    let mut bits = Bitstring::decode(encoded)?;
    bits.set(index, revoked)?;
    bits.encode()
}

/// Read bit `index` of `encoded`.
pub fn get_bit(encoded: &str, index: usize) -> Result<bool, StatusError> {
    Bitstring::decode(encoded)?.get(index)
}
