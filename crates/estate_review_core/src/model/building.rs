//! Building-side merge models.
//!
//! # Invariants
//! - A merge history entry is reverted at most once.
//! - Reverting one entry may cascade to later entries; the backend reports
//!   every reverted id.

use serde::{Deserialize, Serialize};

pub type BuildingId = i64;
pub type MergeHistoryId = i64;

/// Building returned by the merge candidate search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingCandidate {
    pub id: BuildingId,
    pub name: String,
    pub address: Option<String>,
    #[serde(default)]
    pub property_count: u32,
}

/// Search options for building merge candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingSearchQuery {
    pub text: String,
    pub limit: u32,
}

impl BuildingSearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: 20,
        }
    }
}

/// Autocomplete entry for building names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub value: String,
    pub label: String,
}

/// Result of merging secondary buildings into a primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingMergeResult {
    pub primary_building_id: BuildingId,
    pub merged_building_ids: Vec<BuildingId>,
    #[serde(default)]
    pub history_ids: Vec<MergeHistoryId>,
}

/// One recorded building merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingMergeHistoryEntry {
    pub id: MergeHistoryId,
    pub primary_building_id: BuildingId,
    pub secondary_building_id: BuildingId,
    pub secondary_name: Option<String>,
    /// RFC 3339 timestamp as sent by the backend.
    pub merged_at: String,
    #[serde(default)]
    pub reverted: bool,
}

/// One page of merge history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingMergeHistoryPage {
    pub items: Vec<BuildingMergeHistoryEntry>,
    #[serde(default)]
    pub total: u64,
}

/// Paging options for merge history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub limit: u32,
    pub offset: u32,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

/// Result of reverting a merge, including cascaded reverts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevertResult {
    pub reverted_history_ids: Vec<MergeHistoryId>,
}
