//! Error types for claim decoding

use thiserror::Error;

/// Failure to decode a claim from its key-value form.
///
/// Raised only by the codec. A failed decode never yields a partial claim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A required data key is absent
    #[error("Missing key: {0}")]
    MissingKey(&'static str),

    /// Status token is not one of the lifecycle states
    #[error("Unknown status: {0:?}")]
    UnknownStatus(String),

    /// Action token is not one of the claim actions
    #[error("Unknown action: {0:?}")]
    UnknownAction(String),

    /// Extra payload is not a JSON object of string values
    #[error("Invalid extra: {0}")]
    InvalidExtra(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::InvalidExtra(err.to_string())
    }
}
