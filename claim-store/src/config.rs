//! Configuration for claim persistence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Store and interactor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Namespace claims are read from and written to
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Labels stamped on every created claim and used to select them on list
    #[serde(default = "default_claim_labels")]
    pub claim_labels: BTreeMap<String, String>,

    /// Number of past write events kept for watch resumption
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Buffer size of the live watch channel
    #[serde(default = "default_watch_channel_capacity")]
    pub watch_channel_capacity: usize,

    /// Extra attempts after a conflict in [`crate::ClaimInteractor::apply_with_retry`]
    #[serde(default = "default_max_conflict_retries")]
    pub max_conflict_retries: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            claim_labels: default_claim_labels(),
            history_capacity: default_history_capacity(),
            watch_channel_capacity: default_watch_channel_capacity(),
            max_conflict_retries: default_max_conflict_retries(),
        }
    }
}

impl StoreConfig {
    /// Create a config for a namespace with defaults for everything else.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

// Defaults
fn default_namespace() -> String { "default".to_string() }
fn default_claim_labels() -> BTreeMap<String, String> {
    BTreeMap::from([("type".to_string(), "service-plan-claim".to_string())])
}
fn default_history_capacity() -> usize { 1024 }
fn default_watch_channel_capacity() -> usize { 256 }
fn default_max_conflict_retries() -> u32 { 3 }
