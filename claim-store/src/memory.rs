//! In-memory reference implementation of [`KvStore`].
//!
//! Resource versions come from a single store-wide counter, so the
//! version returned by a list is also a valid watch resume point. The last
//! `history_capacity` write events are retained for resumption.

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::record::{KvRecord, ResourceVersion};
use crate::store::{KvStore, KvWatch, WatchEvent, WatchEventKind};

/// In-memory key-value store with compare-and-swap writes and watch.
///
/// Cloning is cheap and clones share the same records.
#[derive(Clone)]
pub struct InMemoryKvStore {
    state: Arc<RwLock<StoreState>>,
    events: broadcast::Sender<WatchEvent>,
    history_capacity: usize,
}

#[derive(Default)]
struct StoreState {
    /// (namespace, name) -> record
    records: BTreeMap<(String, String), KvRecord>,
    /// Version of the latest write
    version: u64,
    /// Recent events with their version, oldest first
    history: VecDeque<(u64, WatchEvent)>,
    /// Highest version whose event has been dropped from history
    compacted_through: u64,
}

impl StoreState {
    fn next_version(&mut self) -> ResourceVersion {
        self.version += 1;
        ResourceVersion::new(self.version.to_string())
    }
}

impl InMemoryKvStore {
    /// Create an empty store sized from configuration.
    pub fn new(config: &StoreConfig) -> Self {
        let (events, _) = broadcast::channel(config.watch_channel_capacity.max(1));
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            events,
            history_capacity: config.history_capacity,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(&StoreConfig::default())
    }

    /// Current store-wide version.
    pub async fn current_version(&self) -> ResourceVersion {
        let state = self.state.read().await;
        ResourceVersion::new(state.version.to_string())
    }

    /// Record an event in history and publish it. Called with the write
    /// lock held so that watchers see a gap-free sequence.
    fn publish(&self, state: &mut StoreState, kind: WatchEventKind, record: KvRecord) {
        let event = WatchEvent { kind, record };
        if self.history_capacity > 0 {
            state.history.push_back((state.version, event.clone()));
            while state.history.len() > self.history_capacity {
                if let Some((version, _)) = state.history.pop_front() {
                    state.compacted_through = version;
                }
            }
        } else {
            state.compacted_through = state.version;
        }
        // No receivers is fine
        let _ = self.events.send(event);
    }
}

fn parse_version(version: &ResourceVersion) -> Result<u64> {
    version
        .as_str()
        .parse()
        .map_err(|_| StoreError::InvalidResourceVersion(version.to_string()))
}

fn record_key(namespace: &str, name: &str) -> (String, String) {
    (namespace.to_string(), name.to_string())
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn create(&self, mut record: KvRecord) -> Result<KvRecord> {
        let mut state = self.state.write().await;
        let key = record_key(&record.metadata.namespace, &record.metadata.name);
        if state.records.contains_key(&key) {
            return Err(StoreError::AlreadyExists(record.metadata.key()));
        }

        record.metadata.resource_version = Some(state.next_version());
        state.records.insert(key, record.clone());
        tracing::debug!(
            record = %record.metadata.key(),
            version = state.version,
            "Created record"
        );
        self.publish(&mut state, WatchEventKind::Added, record.clone());
        Ok(record)
    }

    async fn get(&self, namespace: &str, name: &str) -> Result<KvRecord> {
        let state = self.state.read().await;
        state
            .records
            .get(&record_key(namespace, name))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", namespace, name)))
    }

    async fn update(&self, mut record: KvRecord, expected: &ResourceVersion) -> Result<KvRecord> {
        let mut state = self.state.write().await;
        let key = record_key(&record.metadata.namespace, &record.metadata.name);
        let actual = state
            .records
            .get(&key)
            .and_then(|current| current.metadata.resource_version.clone())
            .ok_or_else(|| StoreError::NotFound(record.metadata.key()))?;

        if &actual != expected {
            tracing::debug!(
                record = %record.metadata.key(),
                expected = %expected,
                actual = %actual,
                "Rejected stale write"
            );
            return Err(StoreError::Conflict {
                name: record.metadata.key(),
                expected: expected.clone(),
                actual,
            });
        }

        record.metadata.resource_version = Some(state.next_version());
        state.records.insert(key, record.clone());
        tracing::debug!(
            record = %record.metadata.key(),
            version = state.version,
            "Updated record"
        );
        self.publish(&mut state, WatchEventKind::Modified, record.clone());
        Ok(record)
    }

    async fn delete(
        &self,
        namespace: &str,
        name: &str,
        expected: Option<&ResourceVersion>,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let key = record_key(namespace, name);
        let actual = state
            .records
            .get(&key)
            .and_then(|current| current.metadata.resource_version.clone())
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", namespace, name)))?;

        if let Some(expected) = expected {
            if &actual != expected {
                return Err(StoreError::Conflict {
                    name: format!("{}/{}", namespace, name),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        if let Some(mut record) = state.records.remove(&key) {
            record.metadata.resource_version = Some(state.next_version());
            tracing::debug!(record = %record.metadata.key(), "Deleted record");
            self.publish(&mut state, WatchEventKind::Deleted, record);
        }
        Ok(())
    }

    async fn list(
        &self,
        namespace: &str,
        selector: &BTreeMap<String, String>,
    ) -> Result<(Vec<KvRecord>, ResourceVersion)> {
        let state = self.state.read().await;
        let records = state
            .records
            .values()
            .filter(|record| {
                record.metadata.namespace == namespace && record.metadata.matches(selector)
            })
            .cloned()
            .collect();
        Ok((records, ResourceVersion::new(state.version.to_string())))
    }

    async fn watch(&self, namespace: &str, since: Option<&ResourceVersion>) -> Result<KvWatch> {
        let since = since.map(parse_version).transpose()?;

        // Subscribe under the lock: anything written after this point goes
        // to the receiver, anything before it is in the history snapshot.
        let state = self.state.read().await;
        let live = self.events.subscribe();

        let backlog: Vec<WatchEvent> = match since {
            None => Vec::new(),
            Some(since) => {
                if since > state.version {
                    return Err(StoreError::InvalidResourceVersion(since.to_string()));
                }
                if since < state.compacted_through {
                    tracing::info!(
                        namespace = %namespace,
                        since,
                        compacted_through = state.compacted_through,
                        "Watch resume point expired"
                    );
                    return Err(StoreError::Expired(since.to_string()));
                }
                state
                    .history
                    .iter()
                    .filter(|(version, event)| {
                        *version > since && event.record.metadata.namespace == namespace
                    })
                    .map(|(_, event)| event.clone())
                    .collect()
            }
        };

        Ok(KvWatch::new(namespace, backlog, live))
    }
}
