//! Error types for claim persistence

use claim_state::DecodeError;
use thiserror::Error;

use crate::record::ResourceVersion;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Compare-and-swap rejected: the record changed since it was read.
    /// Nothing was written; re-fetch, re-apply and retry.
    #[error("Conflict on {name}: expected resource version {expected}, found {actual}")]
    Conflict {
        name: String,
        expected: ResourceVersion,
        actual: ResourceVersion,
    },

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Record name already taken in the namespace
    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    /// Write attempted without the resource version captured at read time
    #[error("Missing resource version for {0}")]
    MissingResourceVersion(String),

    /// Record belongs to a namespace other than the one being written
    #[error("Record {name} is in namespace {actual}, expected {expected}")]
    WrongNamespace {
        name: String,
        expected: String,
        actual: String,
    },

    /// Resource version not issued by this store
    #[error("Invalid resource version: {0}")]
    InvalidResourceVersion(String),

    /// Watch cannot resume from this version; a fresh list is required
    #[error("Resource version {0} is too old, re-list required")]
    Expired(String),

    /// Stored data is not a valid claim
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl StoreError {
    /// Whether this is a compare-and-swap conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}
