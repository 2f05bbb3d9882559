//! Claim update protocol.
//!
//! Every change a caller may make to a claim's lifecycle is expressed as
//! one [`Update`] value. Callers never edit lifecycle fields directly; the
//! applier decides which fields each variant overwrites.

use std::fmt;

use crate::record::Extra;
use crate::status::ClaimStatus;

/// A requested change to a claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// Replace status, description, both identifiers and extra
    Full {
        status: ClaimStatus,
        description: String,
        instance_id: String,
        bind_id: String,
        extra: Extra,
    },
    /// Replace only the status
    Status(ClaimStatus),
    /// The claim's lifecycle failed with the given message
    Error { message: String },
}

/// Variant tag of an [`Update`], for logging and matching without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    Full,
    Status,
    Error,
}

impl Update {
    /// Build a full update.
    pub fn full(
        status: ClaimStatus,
        description: impl Into<String>,
        instance_id: impl Into<String>,
        bind_id: impl Into<String>,
        extra: Extra,
    ) -> Self {
        Self::Full {
            status,
            description: description.into(),
            instance_id: instance_id.into(),
            bind_id: bind_id.into(),
            extra,
        }
    }

    /// Build a status-only update.
    pub fn status_only(status: ClaimStatus) -> Self {
        Self::Status(status)
    }

    /// Build an error update from any error value; only its message is kept.
    pub fn error(err: &(impl fmt::Display + ?Sized)) -> Self {
        Self::Error {
            message: err.to_string(),
        }
    }

    pub fn kind(&self) -> UpdateKind {
        match self {
            Self::Full { .. } => UpdateKind::Full,
            Self::Status(_) => UpdateKind::Status,
            Self::Error { .. } => UpdateKind::Error,
        }
    }

    /// The status the claim will have after this update.
    pub fn status(&self) -> ClaimStatus {
        match self {
            Self::Full { status, .. } | Self::Status(status) => *status,
            Self::Error { .. } => ClaimStatus::FAILED,
        }
    }

    /// The new description, or `None` for status-only updates.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Full { description, .. } => Some(description.as_str()),
            Self::Error { message } => Some(message.as_str()),
            Self::Status(_) => None,
        }
    }

    /// The replacement extra data; only full updates carry one.
    pub fn extra(&self) -> Option<&Extra> {
        match self {
            Self::Full { extra, .. } => Some(extra),
            Self::Status(_) | Self::Error { .. } => None,
        }
    }
}

impl fmt::Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full {
                status,
                description,
                ..
            } => write!(f, "full update to {} ({})", status, description),
            Self::Status(status) => write!(f, "status update to {}", status),
            Self::Error { message } => write!(f, "error update ({})", message),
        }
    }
}
