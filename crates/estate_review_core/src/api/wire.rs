//! Wire schemas and boundary normalization.
//!
//! # Responsibility
//! - Accept every response shape the backend is known to emit.
//! - Convert each into exactly one `model` shape before returning.
//!
//! # Invariants
//! - Normalization never invents ids; missing display fields get empty defaults.
//! - Error detail text is passed through unchanged apart from joining lists.

use crate::api::admin_api::{ApiError, ApiResult};
use crate::model::building::{BuildingCandidate, BuildingId, Suggestion};
use crate::model::group::{DuplicateGroup, DuplicateGroupPage, GroupId, PropertyId, RecordSummary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct MergePropertiesRequest {
    pub primary_property_id: PropertyId,
    pub secondary_property_id: PropertyId,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExcludePropertiesRequest<'a> {
    pub property1_id: PropertyId,
    pub property2_id: PropertyId,
    pub reason: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct MergeBuildingsRequest<'a> {
    pub primary_id: BuildingId,
    pub secondary_ids: &'a [BuildingId],
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GroupKeyWire {
    Number(i64),
    Text(String),
}

impl From<GroupKeyWire> for GroupId {
    fn from(value: GroupKeyWire) -> Self {
        match value {
            GroupKeyWire::Number(number) => GroupId::new(number.to_string()),
            GroupKeyWire::Text(text) => GroupId::new(text),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MemberWire {
    #[serde(alias = "property_id")]
    id: PropertyId,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    price: Option<i64>,
    #[serde(default, alias = "area")]
    area_sqm: Option<f64>,
    #[serde(default)]
    listing_count: Option<u32>,
}

impl From<MemberWire> for RecordSummary {
    fn from(value: MemberWire) -> Self {
        Self {
            id: value.id,
            display_name: value.display_name.unwrap_or_default(),
            price: value.price,
            area_sqm: value.area_sqm,
            listing_count: value.listing_count.unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GroupWire {
    #[serde(alias = "id")]
    group_id: GroupKeyWire,
    #[serde(default)]
    building_name: Option<String>,
    #[serde(default, alias = "floor_number")]
    floor: Option<i32>,
    #[serde(default)]
    layout: Option<String>,
    #[serde(default)]
    similarity: Option<f64>,
    #[serde(alias = "properties")]
    members: Vec<MemberWire>,
}

impl From<GroupWire> for DuplicateGroup {
    fn from(value: GroupWire) -> Self {
        let mut seen = Vec::with_capacity(value.members.len());
        let members = value
            .members
            .into_iter()
            .filter(|member| {
                if seen.contains(&member.id) {
                    return false;
                }
                seen.push(member.id);
                true
            })
            .map(RecordSummary::from)
            .collect();
        Self {
            id: value.group_id.into(),
            building_name: value.building_name,
            floor: value.floor,
            layout: value.layout,
            similarity: value.similarity,
            members,
            split_from: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GroupListWire {
    Envelope {
        groups: Vec<GroupWire>,
        #[serde(default)]
        total: Option<u64>,
        #[serde(default)]
        has_more: Option<bool>,
    },
    Bare(Vec<GroupWire>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BuildingListWire {
    Envelope { buildings: Vec<BuildingCandidate> },
    Bare(Vec<BuildingCandidate>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SuggestionWire {
    Plain(String),
    Labeled {
        value: String,
        #[serde(default)]
        label: Option<String>,
    },
}

impl From<SuggestionWire> for Suggestion {
    fn from(value: SuggestionWire) -> Self {
        match value {
            SuggestionWire::Plain(text) => Self {
                label: text.clone(),
                value: text,
            },
            SuggestionWire::Labeled { value, label } => Self {
                label: label.unwrap_or_else(|| value.clone()),
                value,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBodyWire {
    detail: ErrorDetailWire,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetailWire {
    Text(String),
    Items(Vec<ErrorItemWire>),
}

#[derive(Debug, Deserialize)]
struct ErrorItemWire {
    msg: String,
}

/// Decodes the duplicate-group listing, accepting envelope or bare array.
pub fn decode_group_page(body: &str) -> ApiResult<DuplicateGroupPage> {
    let wire: GroupListWire = serde_json::from_str(body)?;
    let page = match wire {
        GroupListWire::Envelope {
            groups,
            total,
            has_more,
        } => {
            let groups: Vec<DuplicateGroup> = groups.into_iter().map(Into::into).collect();
            DuplicateGroupPage {
                total: total.unwrap_or(groups.len() as u64),
                has_more: has_more.unwrap_or(false),
                groups,
            }
        }
        GroupListWire::Bare(groups) => {
            let groups: Vec<DuplicateGroup> = groups.into_iter().map(Into::into).collect();
            DuplicateGroupPage {
                total: groups.len() as u64,
                has_more: false,
                groups,
            }
        }
    };
    Ok(page)
}

/// Decodes building merge candidates, accepting envelope or bare array.
pub fn decode_building_candidates(body: &str) -> ApiResult<Vec<BuildingCandidate>> {
    let wire: BuildingListWire = serde_json::from_str(body)?;
    Ok(match wire {
        BuildingListWire::Envelope { buildings } => buildings,
        BuildingListWire::Bare(buildings) => buildings,
    })
}

/// Decodes name suggestions given as strings or `{value, label}` objects.
pub fn decode_suggestions(body: &str) -> ApiResult<Vec<Suggestion>> {
    let wire: Vec<SuggestionWire> = serde_json::from_str(body)?;
    Ok(wire.into_iter().map(Into::into).collect())
}

/// Decodes any JSON body into `T`, mapping schema errors to `ApiError::Decode`.
pub fn decode<T: for<'de> Deserialize<'de>>(body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(ApiError::from)
}

/// Extracts the operator-facing detail from an error response body.
///
/// Falls back to the trimmed raw body when it has no `detail` field.
pub fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBodyWire>(body) {
        Ok(ErrorBodyWire {
            detail: ErrorDetailWire::Text(text),
        }) => text,
        Ok(ErrorBodyWire {
            detail: ErrorDetailWire::Items(items),
        }) => items
            .into_iter()
            .map(|item| item.msg)
            .collect::<Vec<_>>()
            .join("; "),
        Err(_) => body.trim().to_string(),
    }
}
