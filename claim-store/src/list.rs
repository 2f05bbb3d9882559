//! Listed snapshot of claims.

use claim_state::DecodeError;

use crate::record::{KvRecord, ResourceVersion};
use crate::wrapper::ClaimWrapper;

/// Claims as listed from the store, plus the store version at list time.
///
/// Order is whatever the store returned. `resource_version` is the point
/// to resume a watch from without listing again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimListWrapper {
    pub claims: Vec<ClaimWrapper>,
    pub resource_version: ResourceVersion,
}

impl ClaimListWrapper {
    /// Decode every listed record; the first bad record fails the whole list.
    pub fn from_records(
        records: &[KvRecord],
        resource_version: ResourceVersion,
    ) -> Result<Self, DecodeError> {
        let claims = records
            .iter()
            .map(ClaimWrapper::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            claims,
            resource_version,
        })
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClaimWrapper> {
        self.claims.iter()
    }

    /// Find a claim by record name.
    pub fn find(&self, name: &str) -> Option<&ClaimWrapper> {
        self.claims.iter().find(|wrapper| wrapper.name() == name)
    }
}

impl IntoIterator for ClaimListWrapper {
    type Item = ClaimWrapper;
    type IntoIter = std::vec::IntoIter<ClaimWrapper>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.into_iter()
    }
}

impl<'a> IntoIterator for &'a ClaimListWrapper {
    type Item = &'a ClaimWrapper;
    type IntoIter = std::slice::Iter<'a, ClaimWrapper>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim_state::{ClaimRecord, ClaimStatus};

    fn record(name: &str, status: ClaimStatus) -> KvRecord {
        ClaimWrapper::new(name, "default", ClaimRecord::new(status)).to_record()
    }

    #[test]
    fn test_from_records() {
        let records = vec![
            record("b", ClaimStatus::Bound),
            record("a", ClaimStatus::Provisioning),
        ];
        let list = ClaimListWrapper::from_records(&records, ResourceVersion::new("7")).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.resource_version.as_str(), "7");
        assert_eq!(list.claims[0].name(), "b");
        assert_eq!(
            list.find("a").map(|w| w.claim.status),
            Some(ClaimStatus::Provisioning)
        );
        assert!(list.find("c").is_none());
    }

    #[test]
    fn test_bad_record_fails_list() {
        let mut bad = record("bad", ClaimStatus::Bound);
        bad.data.remove("status");
        let records = vec![record("good", ClaimStatus::Bound), bad];

        let err = ClaimListWrapper::from_records(&records, ResourceVersion::new("1")).unwrap_err();
        assert_eq!(err, DecodeError::MissingKey("status"));
    }

    #[test]
    fn test_empty_list() {
        let list = ClaimListWrapper::from_records(&[], ResourceVersion::new("0")).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.into_iter().count(), 0);
    }
}
