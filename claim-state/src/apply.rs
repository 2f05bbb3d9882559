//! Claim applier: the single state-transition function.
//!
//! Applying an update is a pure setter. It does not check whether the new
//! status is a legal successor of the old one; see
//! [`ClaimStatus::can_transition_to`](crate::ClaimStatus::can_transition_to)
//! for callers that want that guard.

use crate::record::ClaimRecord;
use crate::update::Update;

/// Apply `update` to `claim` in place.
///
/// | Variant | status | status_description | instance_id, bind_id | extra |
/// |---|---|---|---|---|
/// | Full | set | set | set | replaced |
/// | Status | set | kept | kept | kept |
/// | Error | `failed` | error message | kept | kept |
///
/// Request fields are never touched. Never fails.
pub fn apply_update(claim: &mut ClaimRecord, update: &Update) {
    claim.status = update.status();
    match update {
        Update::Full {
            description,
            instance_id,
            bind_id,
            extra,
            ..
        } => {
            claim.status_description = description.clone();
            claim.instance_id = instance_id.clone();
            claim.bind_id = bind_id.clone();
            claim.extra = extra.clone();
        }
        Update::Error { message } => {
            claim.status_description = message.clone();
        }
        Update::Status(_) => {}
    }
}

impl ClaimRecord {
    /// Consume the claim and return its state after `update`.
    pub fn with_update(mut self, update: &Update) -> Self {
        apply_update(&mut self, update);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Extra;
    use crate::status::{ClaimAction, ClaimStatus};

    fn extra(pairs: &[(&str, &str)]) -> Extra {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// A spread of starting records, each with request fields filled in.
    fn starting_claims() -> Vec<ClaimRecord> {
        vec![
            ClaimRecord::new(ClaimStatus::Binding).with_description("some description"),
            ClaimRecord::new(ClaimStatus::Provisioned)
                .with_description("start")
                .with_extra(extra(&[("a", "b")])),
            ClaimRecord::new(ClaimStatus::Provisioned).with_description("something"),
            ClaimRecord::new(ClaimStatus::Bound)
                .with_request("creds", "mysql", "small", "claim-1", ClaimAction::Create)
                .with_description("bound")
                .with_extra(extra(&[("host", "db"), ("port", "3306")])),
        ]
    }

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    struct BackendError(String);

    #[test]
    fn test_full_update_replaces_lifecycle_fields() {
        for claim in starting_claims() {
            let (instance_id, bind_id) = (new_id(), new_id());
            let new_extra = extra(&[("c", "d"), ("e", "f")]);
            let update = Update::full(
                ClaimStatus::Bound,
                "some other description",
                instance_id.clone(),
                bind_id.clone(),
                new_extra.clone(),
            );

            let updated = claim.clone().with_update(&update);

            assert_eq!(updated.status, ClaimStatus::Bound);
            assert_eq!(updated.status_description, "some other description");
            assert_eq!(updated.extra, new_extra);
            assert_eq!(updated.instance_id, instance_id);
            assert_eq!(updated.bind_id, bind_id);
            assert_eq!(updated.claim_id, claim.claim_id);
            assert_eq!(updated.action, claim.action);
        }
    }

    #[test]
    fn test_full_update_does_not_merge_extra() {
        let mut claim = ClaimRecord::new(ClaimStatus::Provisioned)
            .with_description("start")
            .with_extra(extra(&[("a", "b")]));
        let update = Update::full(
            ClaimStatus::Binding,
            "end",
            new_id(),
            new_id(),
            extra(&[("c", "d"), ("e", "f")]),
        );

        apply_update(&mut claim, &update);

        assert_eq!(claim.status, ClaimStatus::Binding);
        assert_eq!(claim.status_description, "end");
        assert_eq!(claim.extra, extra(&[("c", "d"), ("e", "f")]));
        assert!(!claim.extra.contains_key("a"));
    }

    #[test]
    fn test_status_update_changes_only_status() {
        for claim in starting_claims() {
            let updated = claim
                .clone()
                .with_update(&Update::status_only(ClaimStatus::Binding));

            let mut expected = claim.clone();
            expected.status = ClaimStatus::Binding;
            assert_eq!(updated, expected);
        }
    }

    #[test]
    fn test_status_update_example() {
        let mut claim = ClaimRecord::new(ClaimStatus::Provisioned).with_description("something");
        apply_update(&mut claim, &Update::status_only(ClaimStatus::Binding));

        assert_eq!(claim.status, ClaimStatus::Binding);
        assert_eq!(claim.status_description, "something");
        assert!(claim.extra.is_empty());
    }

    #[test]
    fn test_error_update_sets_failed_and_message() {
        let err = BackendError("disk full".to_string());
        for claim in starting_claims() {
            let updated = claim.clone().with_update(&Update::error(&err));

            assert_eq!(updated.status, ClaimStatus::FAILED);
            assert_eq!(updated.status_description, "disk full");
            assert_eq!(updated.extra, claim.extra);
            assert_eq!(updated.instance_id, claim.instance_id);
            assert_eq!(updated.bind_id, claim.bind_id);
        }
    }

    #[test]
    fn test_applier_is_permissive() {
        let mut claim = ClaimRecord::new(ClaimStatus::Bound);
        assert!(!claim.status.can_transition_to(ClaimStatus::Provisioning));

        apply_update(&mut claim, &Update::status_only(ClaimStatus::Provisioning));
        assert_eq!(claim.status, ClaimStatus::Provisioning);
    }

    #[test]
    fn test_applied_claim_survives_codec() {
        let claim = ClaimRecord::new(ClaimStatus::Provisioned)
            .with_request("creds", "redis", "large", "claim-9", ClaimAction::Bind)
            .with_update(&Update::full(
                ClaimStatus::Bound,
                "bound",
                new_id(),
                new_id(),
                extra(&[("uri", "redis://cache:6379")]),
            ));

        let decoded = ClaimRecord::from_map(&claim.to_map()).unwrap();
        assert_eq!(decoded, claim);
    }
}
