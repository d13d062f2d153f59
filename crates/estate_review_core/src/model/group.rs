//! Duplicate group model.
//!
//! # Responsibility
//! - Represent one set of records suspected to describe the same real-world property.
//! - Provide the membership helpers used by commit reconciliation.
//!
//! # Invariants
//! - `members` never contains the same id twice.
//! - A group with one member or fewer is not a duplicate candidate; callers drop it.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable backend id of a property record.
pub type PropertyId = i64;

/// Key of one duplicate group as assigned by the backend.
///
/// Kept as a string so split groups can carry a derived local key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Derives the key of the partition split off from this group.
    pub fn split_key(&self, anchor: PropertyId) -> Self {
        Self(format!("{}~{anchor}", self.0))
    }
}

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Display summary of one record inside a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: PropertyId,
    pub display_name: String,
    /// Asking price in yen.
    pub price: Option<i64>,
    pub area_sqm: Option<f64>,
    /// Number of source listings attached to this record.
    pub listing_count: u32,
}

impl RecordSummary {
    pub fn new(id: PropertyId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            price: None,
            area_sqm: None,
            listing_count: 0,
        }
    }
}

/// One group of suspected duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub id: GroupId,
    pub building_name: Option<String>,
    pub floor: Option<i32>,
    pub layout: Option<String>,
    /// Backend similarity score in `[0, 1]`.
    pub similarity: Option<f64>,
    pub members: Vec<RecordSummary>,
    /// Set when this group was produced locally by a partial exclude.
    pub split_from: Option<GroupId>,
}

impl DuplicateGroup {
    pub fn new(id: impl Into<GroupId>, members: Vec<RecordSummary>) -> Self {
        Self {
            id: id.into(),
            building_name: None,
            floor: None,
            layout: None,
            similarity: None,
            members,
            split_from: None,
        }
    }

    pub fn member_ids(&self) -> Vec<PropertyId> {
        self.members.iter().map(|member| member.id).collect()
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        self.members.iter().any(|member| member.id == id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns whether this group still represents a duplicate candidate.
    pub fn is_viable(&self) -> bool {
        self.members.len() > 1
    }

    /// Drops the given members, keeping the remaining order.
    pub fn remove_members(&mut self, ids: &[PropertyId]) {
        self.members.retain(|member| !ids.contains(&member.id));
    }

    /// Splits the group into `(kept, split)` partitions by selected ids.
    ///
    /// The kept partition keeps this group's key; the split partition gets a
    /// derived key anchored on its smallest member id.
    pub fn partition(&self, selected: &[PropertyId]) -> (DuplicateGroup, Option<DuplicateGroup>) {
        let (split_members, kept_members): (Vec<_>, Vec<_>) = self
            .members
            .iter()
            .cloned()
            .partition(|member| selected.contains(&member.id));

        let kept = DuplicateGroup {
            members: kept_members,
            ..self.clone()
        };
        let split = split_members.iter().map(|member| member.id).min().map(|anchor| {
            DuplicateGroup {
                id: self.id.split_key(anchor),
                members: split_members,
                split_from: Some(self.id.clone()),
                ..self.clone()
            }
        });
        (kept, split)
    }
}

/// One page of the duplicate-group listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicateGroupPage {
    pub groups: Vec<DuplicateGroup>,
    pub total: u64,
    pub has_more: bool,
}

/// Query options for listing duplicate groups.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupQuery {
    pub min_similarity: f64,
    pub limit: u32,
    pub building_name: Option<String>,
}

impl Default for GroupQuery {
    fn default() -> Self {
        Self {
            min_similarity: DEFAULT_MIN_SIMILARITY,
            limit: DEFAULT_GROUP_LIMIT,
            building_name: None,
        }
    }
}

pub const DEFAULT_MIN_SIMILARITY: f64 = 0.8;
pub const DEFAULT_GROUP_LIMIT: u32 = 50;
pub const MAX_GROUP_LIMIT: u32 = 500;

/// Validation failure for a [`GroupQuery`].
#[derive(Debug, Clone, PartialEq)]
pub enum GroupQueryError {
    SimilarityOutOfRange(f64),
    LimitOutOfRange(u32),
}

impl Display for GroupQueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SimilarityOutOfRange(value) => {
                write!(f, "min_similarity must be within [0, 1], got {value}")
            }
            Self::LimitOutOfRange(value) => {
                write!(f, "limit must be within 1..={MAX_GROUP_LIMIT}, got {value}")
            }
        }
    }
}

impl std::error::Error for GroupQueryError {}

impl GroupQuery {
    /// Checks ranges before the query reaches the backend.
    pub fn validate(&self) -> Result<(), GroupQueryError> {
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(GroupQueryError::SimilarityOutOfRange(self.min_similarity));
        }
        if self.limit == 0 || self.limit > MAX_GROUP_LIMIT {
            return Err(GroupQueryError::LimitOutOfRange(self.limit));
        }
        Ok(())
    }

    /// Returns the query pairs sent to the listing endpoint.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("min_similarity", self.min_similarity.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(name) = self
            .building_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
        {
            pairs.push(("building_name", name.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::{DuplicateGroup, GroupId, GroupQuery, GroupQueryError, RecordSummary};

    fn group(ids: &[i64]) -> DuplicateGroup {
        DuplicateGroup::new(
            "g-1",
            ids.iter().map(|id| RecordSummary::new(*id, format!("unit {id}"))).collect(),
        )
    }

    #[test]
    fn partition_keeps_original_key_for_unselected_members() {
        let (kept, split) = group(&[101, 102, 103, 104]).partition(&[103, 102]);

        assert_eq!(kept.id, GroupId::new("g-1"));
        assert_eq!(kept.member_ids(), vec![101, 104]);
        let split = split.expect("selected members form a partition");
        assert_eq!(split.id, GroupId::new("g-1~102"));
        assert_eq!(split.member_ids(), vec![102, 103]);
        assert_eq!(split.split_from, Some(GroupId::new("g-1")));
    }

    #[test]
    fn partition_with_empty_selection_has_no_split() {
        let (kept, split) = group(&[1, 2]).partition(&[]);
        assert_eq!(kept.len(), 2);
        assert!(split.is_none());
    }

    #[test]
    fn default_query_omits_blank_building_name() {
        let query = GroupQuery {
            building_name: Some("   ".to_string()),
            ..GroupQuery::default()
        };
        let keys: Vec<_> = query.to_query_pairs().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["min_similarity", "limit"]);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let query = GroupQuery {
            min_similarity: 1.5,
            ..GroupQuery::default()
        };
        assert_eq!(
            query.validate(),
            Err(GroupQueryError::SimilarityOutOfRange(1.5))
        );

        let query = GroupQuery {
            limit: 0,
            ..GroupQuery::default()
        };
        assert_eq!(query.validate(), Err(GroupQueryError::LimitOutOfRange(0)));
    }
}
