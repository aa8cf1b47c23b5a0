use acad_core::FetchError;
use acad_vc::VcError;
use thiserror::Error;

/// Errors from status-list encoding, lookup, and registry operations.
#[derive(Error, Debug)]
pub enum StatusError {
    /// List lengths are counted in whole bytes.
    #[error("list length {0} must be a positive multiple of 8")]
    InvalidLength(usize),

    #[error("index {index} out of range for list of {length} bits")]
    IndexOutOfRange { index: usize, length: usize },

    /// `encodedList` is not base64url.
    #[error("encodedList is not valid base64url: {0}")]
    Decode(String),

    /// `encodedList` is not a gzip stream, or inflates past the size limit.
    #[error("encodedList failed to decompress: {0}")]
    Decompress(String),

    #[error("failed to compress bitstring: {0}")]
    Compress(String),

    #[error("status list fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("status list {url} returned HTTP {status}")]
    ListUnavailable { url: String, status: u16 },

    #[error("malformed status list credential: {0}")]
    MalformedListCredential(String),

    /// The credential's own status pointer is unusable.
    #[error(transparent)]
    Credential(#[from] VcError),

    #[error("status list {0} is not registered")]
    UnknownList(String),

    #[error("status list {0} is already registered")]
    ListExists(String),

    /// Every index in the list has been allocated.
    #[error("status list {0} has no free index")]
    ListFull(String),
}
