//! Generic key-value record as persisted by the configuration store.

use std::collections::BTreeMap;
use std::fmt;

/// Opaque store-assigned version token.
///
/// Changes on every write to a record. Only the store that issued it can
/// interpret it; everyone else compares for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceVersion(String);

impl ResourceVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ResourceVersion {
    fn from(version: String) -> Self {
        Self(version)
    }
}

impl From<&str> for ResourceVersion {
    fn from(version: &str) -> Self {
        Self(version.to_string())
    }
}

/// Identity and concurrency metadata of a stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMeta {
    /// Unique within the namespace
    pub name: String,
    pub namespace: String,
    /// `None` until the store has accepted the first write
    pub resource_version: Option<ResourceVersion>,
    /// Used by watchers and lists for selection
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// `namespace/name`, for errors and logs.
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// Whether every selector label is present with the same value.
    pub fn matches(&self, selector: &BTreeMap<String, String>) -> bool {
        selector
            .iter()
            .all(|(key, value)| self.labels.get(key) == Some(value))
    }
}

/// A record in the key-value configuration store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KvRecord {
    pub metadata: ObjectMeta,
    pub data: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_selection() {
        let mut meta = ObjectMeta::new("claim-1", "default");
        meta.labels.insert("type".to_string(), "service-plan-claim".to_string());
        meta.labels.insert("team".to_string(), "a".to_string());

        let selector = BTreeMap::from([("type".to_string(), "service-plan-claim".to_string())]);
        assert!(meta.matches(&selector));
        assert!(meta.matches(&BTreeMap::new()));

        let other = BTreeMap::from([("team".to_string(), "b".to_string())]);
        assert!(!meta.matches(&other));
    }

    #[test]
    fn test_key() {
        assert_eq!(ObjectMeta::new("claim-1", "brokers").key(), "brokers/claim-1");
    }
}
