//! Admin backend contract.
//!
//! # Responsibility
//! - Describe every backend call used by review, building merge and task control.
//! - Provide the shared error taxonomy for those calls.
//!
//! # Invariants
//! - HTTP 401 always maps to `ApiError::SessionExpired`.
//! - Other 4xx responses keep the backend's detail text verbatim.

use crate::model::building::{
    BuildingCandidate, BuildingId, BuildingMergeHistoryPage, BuildingMergeResult,
    BuildingSearchQuery, HistoryQuery, MergeHistoryId, RevertResult, Suggestion,
};
use crate::model::group::{DuplicateGroupPage, GroupQuery, PropertyId};
use crate::model::property::{ExclusionRecord, PropertyDetail, PropertyMergeResult};
use crate::model::task::TaskSnapshot;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Connection could not be established or was interrupted.
    Network(String),
    /// Request did not complete within the configured timeout.
    Timeout,
    /// Backend rejected the credentials (HTTP 401).
    SessionExpired,
    /// Backend rejected the request (HTTP 4xx other than 401).
    Validation { status: u16, detail: String },
    /// Backend failed to handle the request (HTTP 5xx or unexpected status).
    Server { status: u16, body: String },
    /// Response body did not match the expected schema.
    Decode(String),
}

impl ApiError {
    /// Returns whether the operator must sign in again.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(message) => write!(f, "network error: {message}"),
            Self::Timeout => write!(f, "request timed out"),
            Self::SessionExpired => write!(f, "session expired"),
            Self::Validation { detail, .. } => write!(f, "{detail}"),
            Self::Server { status, body } if body.is_empty() => {
                write!(f, "server error (HTTP {status})")
            }
            Self::Server { status, body } => write!(f, "server error (HTTP {status}): {body}"),
            Self::Decode(message) => write!(f, "unexpected response: {message}"),
        }
    }
}

impl Error for ApiError {}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

/// Admin backend operations consumed by the console.
///
/// Implementations are synchronous; one call maps to one HTTP request.
pub trait AdminApi {
    fn list_duplicate_groups(&self, query: &GroupQuery) -> ApiResult<DuplicateGroupPage>;
    fn get_property(&self, id: PropertyId) -> ApiResult<PropertyDetail>;
    fn merge_properties(
        &self,
        primary: PropertyId,
        secondary: PropertyId,
    ) -> ApiResult<PropertyMergeResult>;
    fn exclude_properties(
        &self,
        first: PropertyId,
        second: PropertyId,
        reason: &str,
    ) -> ApiResult<ExclusionRecord>;

    fn search_buildings_for_merge(
        &self,
        query: &BuildingSearchQuery,
    ) -> ApiResult<Vec<BuildingCandidate>>;
    fn building_name_suggestions(&self, prefix: &str) -> ApiResult<Vec<Suggestion>>;
    fn merge_buildings(
        &self,
        primary: BuildingId,
        secondaries: &[BuildingId],
    ) -> ApiResult<BuildingMergeResult>;
    fn building_merge_history(&self, query: &HistoryQuery) -> ApiResult<BuildingMergeHistoryPage>;
    fn revert_building_merge(&self, history_id: MergeHistoryId) -> ApiResult<RevertResult>;

    fn get_task(&self, task_id: &str) -> ApiResult<TaskSnapshot>;
    fn pause_task(&self, task_id: &str) -> ApiResult<()>;
    fn resume_task(&self, task_id: &str) -> ApiResult<()>;
}

impl<T: AdminApi + ?Sized> AdminApi for &T {
    fn list_duplicate_groups(&self, query: &GroupQuery) -> ApiResult<DuplicateGroupPage> {
        (**self).list_duplicate_groups(query)
    }

    fn get_property(&self, id: PropertyId) -> ApiResult<PropertyDetail> {
        (**self).get_property(id)
    }

    fn merge_properties(
        &self,
        primary: PropertyId,
        secondary: PropertyId,
    ) -> ApiResult<PropertyMergeResult> {
        (**self).merge_properties(primary, secondary)
    }

    fn exclude_properties(
        &self,
        first: PropertyId,
        second: PropertyId,
        reason: &str,
    ) -> ApiResult<ExclusionRecord> {
        (**self).exclude_properties(first, second, reason)
    }

    fn search_buildings_for_merge(
        &self,
        query: &BuildingSearchQuery,
    ) -> ApiResult<Vec<BuildingCandidate>> {
        (**self).search_buildings_for_merge(query)
    }

    fn building_name_suggestions(&self, prefix: &str) -> ApiResult<Vec<Suggestion>> {
        (**self).building_name_suggestions(prefix)
    }

    fn merge_buildings(
        &self,
        primary: BuildingId,
        secondaries: &[BuildingId],
    ) -> ApiResult<BuildingMergeResult> {
        (**self).merge_buildings(primary, secondaries)
    }

    fn building_merge_history(&self, query: &HistoryQuery) -> ApiResult<BuildingMergeHistoryPage> {
        (**self).building_merge_history(query)
    }

    fn revert_building_merge(&self, history_id: MergeHistoryId) -> ApiResult<RevertResult> {
        (**self).revert_building_merge(history_id)
    }

    fn get_task(&self, task_id: &str) -> ApiResult<TaskSnapshot> {
        (**self).get_task(task_id)
    }

    fn pause_task(&self, task_id: &str) -> ApiResult<()> {
        (**self).pause_task(task_id)
    }

    fn resume_task(&self, task_id: &str) -> ApiResult<()> {
        (**self).resume_task(task_id)
    }
}
