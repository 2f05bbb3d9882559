//! The claim record.

use std::collections::BTreeMap;
use std::fmt;

use crate::status::{ClaimAction, ClaimStatus};

/// Broker-specific extension data attached to a claim.
///
/// Ordered so that serialization is deterministic. An empty map is the
/// "no extra" value; there is no unset state.
pub type Extra = BTreeMap<String, String>;

/// A service plan claim.
///
/// The request fields describe what the consumer asked for and are never
/// changed by updates. The lifecycle fields are only changed through
/// [`crate::Update`] values applied with [`crate::apply_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRecord {
    /// Name of the object the consumer wants credentials written to
    pub target_name: String,
    /// Broker service identifier
    pub service_id: String,
    /// Broker plan identifier
    pub plan_id: String,
    /// Consumer-assigned claim identifier
    pub claim_id: String,
    /// Requested action, if any
    pub action: Option<ClaimAction>,
    /// Current lifecycle state
    pub status: ClaimStatus,
    /// Human-readable explanation of the current status
    pub status_description: String,
    /// Service instance identifier, written by full updates
    pub instance_id: String,
    /// Binding identifier, written by full updates
    pub bind_id: String,
    /// Extension data
    pub extra: Extra,
}

impl ClaimRecord {
    /// Create a claim in the given state with everything else empty.
    pub fn new(status: ClaimStatus) -> Self {
        Self {
            target_name: String::new(),
            service_id: String::new(),
            plan_id: String::new(),
            claim_id: String::new(),
            action: None,
            status,
            status_description: String::new(),
            instance_id: String::new(),
            bind_id: String::new(),
            extra: Extra::new(),
        }
    }

    /// Fill in the request fields.
    pub fn with_request(
        mut self,
        target_name: impl Into<String>,
        service_id: impl Into<String>,
        plan_id: impl Into<String>,
        claim_id: impl Into<String>,
        action: ClaimAction,
    ) -> Self {
        self.target_name = target_name.into();
        self.service_id = service_id.into();
        self.plan_id = plan_id.into();
        self.claim_id = claim_id.into();
        self.action = Some(action);
        self
    }

    /// Set the status description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.status_description = description.into();
        self
    }

    /// Set the extra data.
    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extra = extra;
        self
    }
}

impl fmt::Display for ClaimRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "claim {}", self.claim_id)?;
        if let Some(action) = self.action {
            write!(f, " action={}", action)?;
        }
        write!(
            f,
            " service={} plan={} status={} ({})",
            self.service_id, self.plan_id, self.status, self.status_description
        )?;
        if !self.extra.is_empty() {
            write!(f, " extra={:?}", self.extra)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claim_has_empty_extra() {
        let claim = ClaimRecord::new(ClaimStatus::Received);
        assert!(claim.extra.is_empty());
        assert!(claim.action.is_none());
        assert_eq!(claim.status, ClaimStatus::Received);
    }

    #[test]
    fn test_display_includes_status() {
        let claim = ClaimRecord::new(ClaimStatus::Binding)
            .with_request("creds", "svc", "small", "claim-1", ClaimAction::Bind)
            .with_description("binding now");
        let rendered = claim.to_string();
        assert!(rendered.contains("claim-1"));
        assert!(rendered.contains("action=bind"));
        assert!(rendered.contains("status=binding (binding now)"));
    }
}
