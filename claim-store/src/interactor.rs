//! Typed claim operations over a [`KvStore`].

use claim_state::ClaimRecord;
use std::collections::BTreeMap;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::list::ClaimListWrapper;
use crate::record::ResourceVersion;
use crate::store::{KvStore, KvWatch, WatchEventKind};
use crate::wrapper::ClaimWrapper;

/// Reads and writes claims in one namespace of a key-value store.
///
/// Writes never retry on their own. A [`StoreError::Conflict`] goes back to
/// the caller, who re-fetches, re-applies its update and tries again (or
/// uses [`ClaimInteractor::apply_with_retry`]).
pub struct ClaimInteractor<S> {
    store: S,
    namespace: String,
    labels: BTreeMap<String, String>,
    pub(crate) max_conflict_retries: u32,
}

impl<S: KvStore> ClaimInteractor<S> {
    pub fn new(store: S, config: &StoreConfig) -> Self {
        Self {
            store,
            namespace: config.namespace.clone(),
            labels: config.claim_labels.clone(),
            max_conflict_retries: config.max_conflict_retries,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store a new claim under `name`, stamped with the claim labels.
    pub async fn create(&self, name: &str, claim: ClaimRecord) -> Result<ClaimWrapper> {
        let wrapper =
            ClaimWrapper::new(name, self.namespace.as_str(), claim).with_labels(self.labels.clone());
        let stored = self.store.create(wrapper.to_record()).await?;
        tracing::info!(claim = %name, namespace = %self.namespace, "Created claim");
        Ok(ClaimWrapper::from_record(&stored)?)
    }

    pub async fn get(&self, name: &str) -> Result<ClaimWrapper> {
        let record = self.store.get(&self.namespace, name).await?;
        Ok(ClaimWrapper::from_record(&record)?)
    }

    /// Write the wrapper back, conditional on the resource version it was
    /// read with. Returns the claim as stored, with its new version.
    ///
    /// The wrapper must belong to this interactor's namespace.
    pub async fn update(&self, wrapper: &ClaimWrapper) -> Result<ClaimWrapper> {
        if wrapper.metadata.namespace != self.namespace {
            return Err(StoreError::WrongNamespace {
                name: wrapper.name().to_string(),
                expected: self.namespace.clone(),
                actual: wrapper.metadata.namespace.clone(),
            });
        }
        let expected = wrapper
            .resource_version()
            .ok_or_else(|| StoreError::MissingResourceVersion(wrapper.metadata.key()))?;
        let stored = self.store.update(wrapper.to_record(), expected).await?;
        tracing::debug!(
            claim = %wrapper.name(),
            status = %wrapper.claim.status,
            "Updated claim"
        );
        Ok(ClaimWrapper::from_record(&stored)?)
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        self.store.delete(&self.namespace, name, None).await?;
        tracing::info!(claim = %name, namespace = %self.namespace, "Deleted claim");
        Ok(())
    }

    /// List every labelled claim in the namespace.
    pub async fn list(&self) -> Result<ClaimListWrapper> {
        let (records, version) = self.store.list(&self.namespace, &self.labels).await?;
        Ok(ClaimListWrapper::from_records(&records, version)?)
    }

    /// Watch claim changes after `since`, typically the version of a list.
    pub async fn watch(&self, since: Option<&ResourceVersion>) -> Result<ClaimWatch> {
        let inner = self.store.watch(&self.namespace, since).await?;
        Ok(ClaimWatch {
            inner,
            labels: self.labels.clone(),
        })
    }
}

/// A decoded change to a claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimEvent {
    pub kind: WatchEventKind,
    pub claim: ClaimWrapper,
}

/// Stream of [`ClaimEvent`]s for labelled claims.
pub struct ClaimWatch {
    inner: KvWatch,
    labels: BTreeMap<String, String>,
}

impl ClaimWatch {
    /// Next claim event. Records that fail to decode surface as
    /// [`StoreError::Decode`]; the watch stays usable afterwards.
    pub async fn next(&mut self) -> Option<Result<ClaimEvent>> {
        loop {
            let event = match self.inner.next().await? {
                Ok(event) => event,
                Err(err) => return Some(Err(err)),
            };
            if !event.record.metadata.matches(&self.labels) {
                continue;
            }
            return Some(
                ClaimWrapper::from_record(&event.record)
                    .map(|claim| ClaimEvent {
                        kind: event.kind,
                        claim,
                    })
                    .map_err(StoreError::from),
            );
        }
    }
}
