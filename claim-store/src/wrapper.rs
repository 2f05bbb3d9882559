//! A claim together with its persistence metadata.

use claim_state::{apply_update, ClaimRecord, DecodeError, Update};
use std::collections::BTreeMap;
use std::fmt;

use crate::record::{KvRecord, ObjectMeta, ResourceVersion};

/// A [`ClaimRecord`] plus the metadata of the store record it lives in.
///
/// The metadata is a copy of what the store returned. In particular the
/// resource version is the one captured at read time, which the next
/// write must present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimWrapper {
    pub metadata: ObjectMeta,
    pub claim: ClaimRecord,
}

impl ClaimWrapper {
    /// Wrap a claim that has never been stored.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, claim: ClaimRecord) -> Self {
        Self {
            metadata: ObjectMeta::new(name, namespace),
            claim,
        }
    }

    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.metadata.labels = labels;
        self
    }

    /// Decode a stored record. Metadata is carried over unchanged.
    pub fn from_record(record: &KvRecord) -> Result<Self, DecodeError> {
        let claim = ClaimRecord::from_map(&record.data)?;
        Ok(Self {
            metadata: record.metadata.clone(),
            claim,
        })
    }

    /// Encode into a store record. Metadata is copied unchanged.
    pub fn to_record(&self) -> KvRecord {
        KvRecord {
            metadata: self.metadata.clone(),
            data: self.claim.to_map(),
        }
    }

    /// Apply an update to the wrapped claim, keeping the captured version.
    pub fn apply(&mut self, update: &Update) {
        apply_update(&mut self.claim, update);
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn resource_version(&self) -> Option<&ResourceVersion> {
        self.metadata.resource_version.as_ref()
    }
}

impl fmt::Display for ClaimWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.metadata.resource_version {
            Some(version) => write!(f, "{} (resource {})", self.claim, version),
            None => write!(f, "{} (resource <none>)", self.claim),
        }
    }
}
