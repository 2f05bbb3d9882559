//! Caller-side conflict handling.
//!
//! Nothing in the store or the interactor retries on its own. This is the
//! fetch, apply, compare-and-swap loop a caller runs when it is happy to
//! have its update re-applied on top of whatever won the race.

use claim_state::Update;

use crate::error::Result;
use crate::interactor::ClaimInteractor;
use crate::store::KvStore;
use crate::wrapper::ClaimWrapper;

impl<S: KvStore> ClaimInteractor<S> {
    /// Apply `update` to the current state of claim `name` and write it back.
    ///
    /// On conflict the claim is fetched again and the update re-applied, up
    /// to `max_conflict_retries` extra times. The last conflict is returned
    /// once attempts run out; any other error is returned immediately.
    pub async fn apply_with_retry(&self, name: &str, update: &Update) -> Result<ClaimWrapper> {
        let attempts = self.max_conflict_retries.saturating_add(1);
        let mut attempt = 1;
        loop {
            let mut wrapper = self.get(name).await?;
            wrapper.apply(update);
            match self.update(&wrapper).await {
                Err(err) if err.is_conflict() && attempt < attempts => {
                    tracing::debug!(
                        claim = %name,
                        attempt,
                        update = %update,
                        error = %err,
                        "Conflict writing claim, retrying"
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::error::StoreError;
    use crate::memory::InMemoryKvStore;
    use crate::record::{KvRecord, ResourceVersion};
    use crate::store::KvWatch;
    use async_trait::async_trait;
    use claim_state::{ClaimRecord, ClaimStatus};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Wraps a store and rejects the first `conflicts` updates.
    struct ContendedStore {
        inner: InMemoryKvStore,
        conflicts: AtomicU32,
    }

    #[async_trait]
    impl KvStore for ContendedStore {
        async fn create(&self, record: KvRecord) -> Result<KvRecord> {
            self.inner.create(record).await
        }

        async fn get(&self, namespace: &str, name: &str) -> Result<KvRecord> {
            self.inner.get(namespace, name).await
        }

        async fn update(&self, record: KvRecord, expected: &ResourceVersion) -> Result<KvRecord> {
            let remaining = self.conflicts.load(Ordering::SeqCst);
            if remaining > 0 {
                self.conflicts.store(remaining - 1, Ordering::SeqCst);
                return Err(StoreError::Conflict {
                    name: record.metadata.key(),
                    expected: expected.clone(),
                    actual: ResourceVersion::new("contended"),
                });
            }
            self.inner.update(record, expected).await
        }

        async fn delete(
            &self,
            namespace: &str,
            name: &str,
            expected: Option<&ResourceVersion>,
        ) -> Result<()> {
            self.inner.delete(namespace, name, expected).await
        }

        async fn list(
            &self,
            namespace: &str,
            selector: &BTreeMap<String, String>,
        ) -> Result<(Vec<KvRecord>, ResourceVersion)> {
            self.inner.list(namespace, selector).await
        }

        async fn watch(
            &self,
            namespace: &str,
            since: Option<&ResourceVersion>,
        ) -> Result<KvWatch> {
            self.inner.watch(namespace, since).await
        }
    }

    async fn contended(conflicts: u32, retries: u32) -> ClaimInteractor<ContendedStore> {
        let config = StoreConfig {
            max_conflict_retries: retries,
            ..Default::default()
        };
        let store = ContendedStore {
            inner: InMemoryKvStore::new(&config),
            conflicts: AtomicU32::new(conflicts),
        };
        let claims = ClaimInteractor::new(store, &config);
        claims
            .create("claim-1", ClaimRecord::new(ClaimStatus::Provisioned))
            .await
            .unwrap();
        claims
    }

    #[tokio::test]
    async fn test_retries_through_conflicts() {
        let claims = contended(2, 3).await;
        let updated = claims
            .apply_with_retry("claim-1", &Update::status_only(ClaimStatus::Binding))
            .await
            .unwrap();
        assert_eq!(updated.claim.status, ClaimStatus::Binding);
    }

    #[tokio::test]
    async fn test_gives_up_after_configured_retries() {
        let claims = contended(5, 2).await;
        let err = claims
            .apply_with_retry("claim-1", &Update::status_only(ClaimStatus::Binding))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        // 1 attempt + 2 retries consumed 3 of the 5 conflicts
        assert_eq!(claims.store().conflicts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_retries_surfaces_first_conflict() {
        let claims = contended(1, 0).await;
        let result = claims
            .apply_with_retry("claim-1", &Update::status_only(ClaimStatus::Binding))
            .await;
        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let claims = contended(0, 3).await;
        let err = claims
            .apply_with_retry("missing", &Update::status_only(ClaimStatus::Binding))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound("default/missing".to_string()));
    }
}
