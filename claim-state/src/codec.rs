//! Key-value codec for claims.
//!
//! Maps a [`ClaimRecord`] to and from the flat string-to-string data
//! section of a store record. Optional request fields are omitted when
//! empty; `status`, `status-description` and `extra` are always written,
//! so anything produced by [`ClaimRecord::to_map`] decodes back to an
//! identical map.

use std::collections::BTreeMap;

use crate::error::DecodeError;
use crate::record::{ClaimRecord, Extra};
use crate::status::{ClaimAction, ClaimStatus};

pub const KEY_TARGET_NAME: &str = "target-name";
pub const KEY_SERVICE_ID: &str = "service-id";
pub const KEY_PLAN_ID: &str = "plan-id";
pub const KEY_CLAIM_ID: &str = "claim-id";
pub const KEY_ACTION: &str = "action";
pub const KEY_STATUS: &str = "status";
pub const KEY_STATUS_DESCRIPTION: &str = "status-description";
pub const KEY_INSTANCE_ID: &str = "instance-id";
pub const KEY_BIND_ID: &str = "bind-id";
pub const KEY_EXTRA: &str = "extra";

impl ClaimRecord {
    /// Serialize into the data section of a store record.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut data = BTreeMap::new();

        let optional = [
            (KEY_TARGET_NAME, &self.target_name),
            (KEY_SERVICE_ID, &self.service_id),
            (KEY_PLAN_ID, &self.plan_id),
            (KEY_CLAIM_ID, &self.claim_id),
            (KEY_INSTANCE_ID, &self.instance_id),
            (KEY_BIND_ID, &self.bind_id),
        ];
        for (key, value) in optional {
            if !value.is_empty() {
                data.insert(key.to_string(), value.clone());
            }
        }
        if let Some(action) = self.action {
            data.insert(KEY_ACTION.to_string(), action.as_str().to_string());
        }

        data.insert(KEY_STATUS.to_string(), self.status.as_str().to_string());
        data.insert(
            KEY_STATUS_DESCRIPTION.to_string(),
            self.status_description.clone(),
        );
        data.insert(KEY_EXTRA.to_string(), encode_extra(&self.extra));
        data
    }

    /// Parse the data section of a store record.
    ///
    /// Only `status` is required. Unknown keys are ignored.
    pub fn from_map(data: &BTreeMap<String, String>) -> Result<Self, DecodeError> {
        let status: ClaimStatus = data
            .get(KEY_STATUS)
            .ok_or(DecodeError::MissingKey(KEY_STATUS))?
            .parse()?;

        let action: Option<ClaimAction> = data
            .get(KEY_ACTION)
            .map(|token| token.parse::<ClaimAction>())
            .transpose()?;

        let extra = match data.get(KEY_EXTRA) {
            Some(raw) => decode_extra(raw)?,
            None => Extra::new(),
        };

        let field = |key: &str| data.get(key).cloned().unwrap_or_default();

        Ok(Self {
            target_name: field(KEY_TARGET_NAME),
            service_id: field(KEY_SERVICE_ID),
            plan_id: field(KEY_PLAN_ID),
            claim_id: field(KEY_CLAIM_ID),
            action,
            status,
            status_description: field(KEY_STATUS_DESCRIPTION),
            instance_id: field(KEY_INSTANCE_ID),
            bind_id: field(KEY_BIND_ID),
            extra,
        })
    }
}

/// Encode extra data as a compact JSON object.
pub fn encode_extra(extra: &Extra) -> String {
    // A map of strings always serializes
    serde_json::to_string(extra).unwrap_or_else(|_| "{}".to_string())
}

/// Decode extra data, which must be a JSON object with string values.
pub fn decode_extra(raw: &str) -> Result<Extra, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(DecodeError::InvalidExtra(format!(
            "expected a JSON object, got {}",
            raw
        )));
    }
    Ok(serde_json::from_value(value)?)
}
