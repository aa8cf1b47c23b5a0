//! # In-Memory Status List Registry
//!
//! Holds the current `encodedList` of each list and serializes every write
//! to a list behind that list's own mutex, so a decode/flip/encode round
//! trip never loses a concurrent update. Writes to different lists do not
//! contend. Persistence is left to the caller: read the current state with
//! [`StatusListRegistry::encoded_list`] and store it however it likes.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};

use acad_vc::VerifiableCredential;

use crate::bitstring::{create_list, get_bit, set_bit, DEFAULT_LIST_LENGTH};
use crate::error::StatusError;
use crate::list::{build_list_credential, ListCredentialOptions};

#[derive(Debug)]
struct ListState {
    encoded: String,
    length: usize,
    next_index: usize,
}

/// Registry of revocation lists keyed by list URL.
#[derive(Debug)]
pub struct StatusListRegistry {
    lists: RwLock<HashMap<String, Arc<Mutex<ListState>>>>,
    default_length: usize,
}

impl Default for StatusListRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_LIST_LENGTH)
    }
}

impl StatusListRegistry {
    /// A registry whose new lists have `default_length` bits.
    pub fn new(default_length: usize) -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
            default_length,
        }
    }

    /// Register an all-zero list at `list_url` with the default length.
    pub fn create(&self, list_url: &str) -> Result<(), StatusError> {
        self.create_with_length(list_url, self.default_length)
    }

    pub fn create_with_length(&self, list_url: &str, length: usize) -> Result<(), StatusError> {
        let fresh = create_list(length)?;
        self.insert(list_url, fresh.encoded_list, length, 0)
    }

    /// Register an existing list, e.g. one loaded from storage. Allocation
    /// resumes at `next_index`.
    pub fn import(&self, list_url: &str, encoded: &str, next_index: usize) -> Result<(), StatusError> {
        let length = crate::bitstring::Bitstring::decode(encoded)?.len();
        self.insert(list_url, encoded.to_string(), length, next_index)
    }

    fn insert(
        &self,
        list_url: &str,
        encoded: String,
        length: usize,
        next_index: usize,
    ) -> Result<(), StatusError> {
        let mut lists = self.lists.write();
        if lists.contains_key(list_url) {
            return Err(StatusError::ListExists(list_url.to_string()));
        }
        lists.insert(
            list_url.to_string(),
            Arc::new(Mutex::new(ListState {
                encoded,
                length,
                next_index,
            })),
        );
        tracing::debug!(list = list_url, length, "status list registered");
        Ok(())
    }

    fn list(&self, list_url: &str) -> Result<Arc<Mutex<ListState>>, StatusError> {
        self.lists
            .read()
            .get(list_url)
            .cloned()
            .ok_or_else(|| StatusError::UnknownList(list_url.to_string()))
    }

    /// Reserve the next unused index in `list_url`.
    pub fn allocate(&self, list_url: &str) -> Result<usize, StatusError> {
        let list = self.list(list_url)?;
        let mut state = list.lock();
        if state.next_index >= state.length {
            return Err(StatusError::ListFull(list_url.to_string()));
        }
        let index = state.next_index;
        state.next_index += 1;
        Ok(index)
    }

    /// Set bit `index` of `list_url` to `revoked`.
    pub fn set(&self, list_url: &str, index: usize, revoked: bool) -> Result<(), StatusError> {
        let list = self.list(list_url)?;
        let mut state = list.lock();
        state.encoded = set_bit(&state.encoded, index, revoked)?;
        tracing::debug!(list = list_url, index, revoked, "status bit updated");
        Ok(())
    }

    pub fn revoke(&self, list_url: &str, index: usize) -> Result<(), StatusError> {
        self.set(list_url, index, true)
    }

    pub fn reinstate(&self, list_url: &str, index: usize) -> Result<(), StatusError> {
        self.set(list_url, index, false)
    }

    pub fn is_revoked(&self, list_url: &str, index: usize) -> Result<bool, StatusError> {
        let list = self.list(list_url)?;
        let state = list.lock();
        get_bit(&state.encoded, index)
    }

    /// Current `encodedList` of `list_url`.
    pub fn encoded_list(&self, list_url: &str) -> Result<String, StatusError> {
        let list = self.list(list_url)?;
        let encoded = list.lock().encoded.clone();
        Ok(encoded)
    }

    /// Unsigned list credential reflecting the current state of `list_url`.
    pub fn list_credential(
        &self,
        list_url: &str,
        issuer: &str,
        issued_at: Option<DateTime<Utc>>,
    ) -> Result<VerifiableCredential, StatusError> {
        let encoded = self.encoded_list(list_url)?;
        let mut opts = ListCredentialOptions::new(list_url, issuer);
        opts.issued_at = issued_at;
        Ok(build_list_credential(&opts, &encoded))
    }

    /// Registered list URLs, sorted.
    pub fn lists(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.lists.read().keys().cloned().collect();
        urls.sort_unstable();
        urls
    }
}
