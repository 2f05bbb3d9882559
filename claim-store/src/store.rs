//! Key-value store boundary.
//!
//! [`KvStore`] is the contract the external configuration store fulfils.
//! Writes to existing records are compare-and-swap: the caller must
//! present the resource version it read, and a mismatch is reported as
//! [`StoreError::Conflict`] without writing anything.

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use tokio::sync::broadcast;

use crate::error::{Result, StoreError};
use crate::record::{KvRecord, ResourceVersion};

/// What happened to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchEventKind {
    Added,
    Modified,
    Deleted,
}

/// A change observed on the store. `record` carries the version of the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: WatchEventKind,
    pub record: KvRecord,
}

/// Trait for the key-value configuration store.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Create a record. The store assigns its first resource version.
    async fn create(&self, record: KvRecord) -> Result<KvRecord>;

    /// Fetch a record by namespace and name.
    async fn get(&self, namespace: &str, name: &str) -> Result<KvRecord>;

    /// Replace a record if its current version is still `expected`.
    async fn update(&self, record: KvRecord, expected: &ResourceVersion) -> Result<KvRecord>;

    /// Delete a record, optionally guarded by its current version.
    async fn delete(
        &self,
        namespace: &str,
        name: &str,
        expected: Option<&ResourceVersion>,
    ) -> Result<()>;

    /// List records in a namespace carrying every selector label, together
    /// with the store version the listing reflects.
    async fn list(
        &self,
        namespace: &str,
        selector: &BTreeMap<String, String>,
    ) -> Result<(Vec<KvRecord>, ResourceVersion)>;

    /// Watch changes in a namespace made after `since`, or from now on
    /// when `since` is `None`.
    async fn watch(&self, namespace: &str, since: Option<&ResourceVersion>) -> Result<KvWatch>;
}

/// Stream of changes in one namespace.
///
/// Yields the replayed backlog first, then live events.
#[derive(Debug)]
pub struct KvWatch {
    namespace: String,
    backlog: VecDeque<WatchEvent>,
    live: broadcast::Receiver<WatchEvent>,
}

impl KvWatch {
    /// Build a watch from already-filtered backlog events and a live
    /// receiver subscribed before the backlog was taken.
    pub fn new(
        namespace: impl Into<String>,
        backlog: impl IntoIterator<Item = WatchEvent>,
        live: broadcast::Receiver<WatchEvent>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            backlog: backlog.into_iter().collect(),
            live,
        }
    }

    /// Next event, or `None` once the store has shut down.
    ///
    /// A watcher that fell behind the live channel gets
    /// [`StoreError::Expired`] and should list again.
    pub async fn next(&mut self) -> Option<Result<WatchEvent>> {
        if let Some(event) = self.backlog.pop_front() {
            return Some(Ok(event));
        }

        loop {
            match self.live.recv().await {
                Ok(event) if event.record.metadata.namespace == self.namespace => {
                    return Some(Ok(event))
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        namespace = %self.namespace,
                        skipped,
                        "Watch fell behind"
                    );
                    return Some(Err(StoreError::Expired(format!(
                        "{} events skipped",
                        skipped
                    ))));
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
