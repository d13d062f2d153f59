//! Property detail and mutation result models.

use crate::model::group::PropertyId;
use serde::{Deserialize, Serialize};

/// One source listing attached to a property record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    /// Source site key, e.g. `suumo`.
    pub source: String,
    pub url: Option<String>,
    pub price: Option<i64>,
}

/// Full property record as shown in the review dialog side panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDetail {
    pub id: PropertyId,
    pub display_name: String,
    pub building_name: Option<String>,
    #[serde(default)]
    pub listings: Vec<Listing>,
}

/// Result of merging one secondary property into a primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMergeResult {
    pub primary_property_id: PropertyId,
    pub secondary_property_id: PropertyId,
    /// Listings moved from secondary to primary.
    #[serde(default)]
    pub moved_listings: u32,
}

/// Persisted "these two are different properties" marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRecord {
    pub id: i64,
    pub property1_id: PropertyId,
    pub property2_id: PropertyId,
    #[serde(default)]
    pub reason: String,
}
