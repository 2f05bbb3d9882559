//! Lifecycle status and requested action of a claim.
//!
//! Both enums are stored in the key-value record by their canonical
//! lowercase token. Parsing accepts exactly those tokens.

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// Lifecycle state of a service plan claim.
///
/// The happy path is `Received → Provisioning → Provisioned → Binding → Bound`,
/// released through `Unbinding → Unbound → Deprovisioning → Deprovisioned`.
/// Any state may move to `Failed` through an error update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimStatus {
    /// Claim seen, nothing started yet
    Received,
    /// Instance provisioning in flight
    Provisioning,
    /// Instance exists
    Provisioned,
    /// Binding in flight
    Binding,
    /// Credentials issued to the consumer
    Bound,
    /// Binding release in flight
    Unbinding,
    /// Binding released
    Unbound,
    /// Instance teardown in flight
    Deprovisioning,
    /// Instance gone
    Deprovisioned,
    /// Lifecycle failed, see the status description
    Failed,
}

impl ClaimStatus {
    /// Status assigned by every error update.
    pub const FAILED: ClaimStatus = ClaimStatus::Failed;

    /// Canonical token as persisted in the record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Provisioning => "provisioning",
            Self::Provisioned => "provisioned",
            Self::Binding => "binding",
            Self::Bound => "bound",
            Self::Unbinding => "unbinding",
            Self::Unbound => "unbound",
            Self::Deprovisioning => "deprovisioning",
            Self::Deprovisioned => "deprovisioned",
            Self::Failed => "failed",
        }
    }

    /// All states in lifecycle order.
    pub fn all() -> [Self; 10] {
        [
            Self::Received,
            Self::Provisioning,
            Self::Provisioned,
            Self::Binding,
            Self::Bound,
            Self::Unbinding,
            Self::Unbound,
            Self::Deprovisioning,
            Self::Deprovisioned,
            Self::Failed,
        ]
    }

    /// Whether no further work is pending for this state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Bound | Self::Unbound | Self::Deprovisioned | Self::Failed
        )
    }

    /// Whether `next` follows this state in the lifecycle graph.
    ///
    /// Informational only: [`crate::apply_update`] never consults it, so
    /// callers that want to guard transitions must check before applying.
    pub fn can_transition_to(&self, next: ClaimStatus) -> bool {
        if next == Self::Failed {
            return true;
        }
        matches!(
            (self, next),
            (Self::Received, Self::Provisioning)
                | (Self::Provisioning, Self::Provisioned)
                | (Self::Provisioned, Self::Binding)
                | (Self::Provisioned, Self::Deprovisioning)
                | (Self::Binding, Self::Bound)
                | (Self::Bound, Self::Unbinding)
                | (Self::Unbinding, Self::Unbound)
                | (Self::Unbound, Self::Deprovisioning)
                | (Self::Deprovisioning, Self::Deprovisioned)
        )
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DecodeError::UnknownStatus(s.to_string()))
    }
}

/// Action a consumer requested on the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimAction {
    Provision,
    Bind,
    Unbind,
    Deprovision,
    /// Provision then bind
    Create,
    /// Unbind then deprovision
    Delete,
}

impl ClaimAction {
    /// Canonical token as persisted in the record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provision => "provision",
            Self::Bind => "bind",
            Self::Unbind => "unbind",
            Self::Deprovision => "deprovision",
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ClaimAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimAction {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provision" => Ok(Self::Provision),
            "bind" => Ok(Self::Bind),
            "unbind" => Ok(Self::Unbind),
            "deprovision" => Ok(Self::Deprovision),
            "create" => Ok(Self::Create),
            "delete" => Ok(Self::Delete),
            _ => Err(DecodeError::UnknownAction(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_token_roundtrip() {
        for status in ClaimStatus::all() {
            assert_eq!(status.as_str().parse::<ClaimStatus>(), Ok(status));
            assert_eq!(status.to_string(), status.as_str());
        }
    }

    #[test]
    fn test_status_rejects_unknown_and_blank() {
        assert_eq!(
            "".parse::<ClaimStatus>(),
            Err(DecodeError::UnknownStatus(String::new()))
        );
        assert!("Bound".parse::<ClaimStatus>().is_err());
        assert!("exploded".parse::<ClaimStatus>().is_err());
    }

    #[test]
    fn test_lifecycle_graph() {
        assert!(ClaimStatus::Received.can_transition_to(ClaimStatus::Provisioning));
        assert!(ClaimStatus::Provisioned.can_transition_to(ClaimStatus::Binding));
        assert!(ClaimStatus::Bound.can_transition_to(ClaimStatus::Failed));
        assert!(!ClaimStatus::Bound.can_transition_to(ClaimStatus::Provisioning));
        assert!(!ClaimStatus::Received.can_transition_to(ClaimStatus::Bound));
    }

    #[test]
    fn test_terminal_states() {
        assert!(ClaimStatus::Bound.is_terminal());
        assert!(ClaimStatus::FAILED.is_terminal());
        assert!(!ClaimStatus::Binding.is_terminal());
    }

    #[test]
    fn test_action_tokens() {
        assert_eq!("deprovision".parse::<ClaimAction>(), Ok(ClaimAction::Deprovision));
        assert_eq!(ClaimAction::Create.to_string(), "create");
        assert_eq!(
            "destroy".parse::<ClaimAction>(),
            Err(DecodeError::UnknownAction("destroy".to_string()))
        );
    }
}
