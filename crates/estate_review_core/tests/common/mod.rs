#![allow(dead_code)]

use estate_review_core::{
    AdminApi, ApiError, ApiResult, BuildingCandidate, BuildingId, BuildingMergeHistoryPage,
    BuildingMergeResult, BuildingSearchQuery, DuplicateGroup, DuplicateGroupPage, ExclusionRecord,
    GroupQuery, HistoryQuery, MergeHistoryId, PropertyDetail, PropertyId, PropertyMergeResult,
    RecordSummary, RevertResult, Suggestion, TaskSnapshot, TaskStatus,
};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

/// Backend call observed by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListGroups,
    GetProperty(PropertyId),
    Merge(PropertyId, PropertyId),
    Exclude(PropertyId, PropertyId, String),
    SearchBuildings(String),
    Suggestions(String),
    MergeBuildings(BuildingId, Vec<BuildingId>),
    History,
    Revert(MergeHistoryId),
    GetTask(String),
    PauseTask(String),
    ResumeTask(String),
}

/// In-memory admin backend with scripted failures.
#[derive(Default)]
pub struct FakeAdminApi {
    pub calls: RefCell<Vec<Call>>,
    pub page: RefCell<DuplicateGroupPage>,
    pub merge_failures: RefCell<HashMap<PropertyId, ApiError>>,
    pub exclude_failures: RefCell<HashMap<(PropertyId, PropertyId), ApiError>>,
    pub buildings: RefCell<Vec<BuildingCandidate>>,
    pub suggestions: RefCell<Vec<Suggestion>>,
    pub building_merge_error: RefCell<Option<ApiError>>,
    /// Overrides `merged_building_ids` in the merge response.
    pub merged_building_ids: RefCell<Option<Vec<BuildingId>>>,
    pub history: RefCell<BuildingMergeHistoryPage>,
    pub revert_cascade: RefCell<Vec<MergeHistoryId>>,
    pub task_statuses: RefCell<VecDeque<TaskStatus>>,
    pub task_error: RefCell<Option<ApiError>>,
}

impl FakeAdminApi {
    pub fn with_groups(groups: Vec<DuplicateGroup>) -> Self {
        let fake = Self::default();
        *fake.page.borrow_mut() = DuplicateGroupPage {
            total: groups.len() as u64,
            has_more: false,
            groups,
        };
        fake
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn fail_merge(&self, secondary: PropertyId, error: ApiError) {
        self.merge_failures.borrow_mut().insert(secondary, error);
    }

    pub fn fail_exclude(&self, pair: (PropertyId, PropertyId), error: ApiError) {
        self.exclude_failures.borrow_mut().insert(pair, error);
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

pub fn group(id: &str, members: &[PropertyId]) -> DuplicateGroup {
    DuplicateGroup::new(
        id,
        members
            .iter()
            .map(|member| RecordSummary::new(*member, format!("Unit {member}")))
            .collect(),
    )
}

impl AdminApi for FakeAdminApi {
    fn list_duplicate_groups(&self, _query: &GroupQuery) -> ApiResult<DuplicateGroupPage> {
        self.record(Call::ListGroups);
        Ok(self.page.borrow().clone())
    }

    fn get_property(&self, id: PropertyId) -> ApiResult<PropertyDetail> {
        self.record(Call::GetProperty(id));
        Ok(PropertyDetail {
            id,
            display_name: format!("Unit {id}"),
            building_name: None,
            listings: Vec::new(),
        })
    }

    fn merge_properties(
        &self,
        primary: PropertyId,
        secondary: PropertyId,
    ) -> ApiResult<PropertyMergeResult> {
        self.record(Call::Merge(primary, secondary));
        if let Some(error) = self.merge_failures.borrow().get(&secondary) {
            return Err(error.clone());
        }
        Ok(PropertyMergeResult {
            primary_property_id: primary,
            secondary_property_id: secondary,
            moved_listings: 1,
        })
    }

    fn exclude_properties(
        &self,
        first: PropertyId,
        second: PropertyId,
        reason: &str,
    ) -> ApiResult<ExclusionRecord> {
        self.record(Call::Exclude(first, second, reason.to_string()));
        if let Some(error) = self.exclude_failures.borrow().get(&(first, second)) {
            return Err(error.clone());
        }
        Ok(ExclusionRecord {
            id: first * 1000 + second,
            property1_id: first,
            property2_id: second,
            reason: reason.to_string(),
        })
    }

    fn search_buildings_for_merge(
        &self,
        query: &BuildingSearchQuery,
    ) -> ApiResult<Vec<BuildingCandidate>> {
        self.record(Call::SearchBuildings(query.text.clone()));
        Ok(self.buildings.borrow().clone())
    }

    fn building_name_suggestions(&self, prefix: &str) -> ApiResult<Vec<Suggestion>> {
        self.record(Call::Suggestions(prefix.to_string()));
        Ok(self.suggestions.borrow().clone())
    }

    fn merge_buildings(
        &self,
        primary: BuildingId,
        secondaries: &[BuildingId],
    ) -> ApiResult<BuildingMergeResult> {
        self.record(Call::MergeBuildings(primary, secondaries.to_vec()));
        if let Some(error) = self.building_merge_error.borrow().clone() {
            return Err(error);
        }
        let merged = self
            .merged_building_ids
            .borrow()
            .clone()
            .unwrap_or_else(|| secondaries.to_vec());
        Ok(BuildingMergeResult {
            primary_building_id: primary,
            merged_building_ids: merged,
            history_ids: Vec::new(),
        })
    }

    fn building_merge_history(&self, _query: &HistoryQuery) -> ApiResult<BuildingMergeHistoryPage> {
        self.record(Call::History);
        Ok(self.history.borrow().clone())
    }

    fn revert_building_merge(&self, history_id: MergeHistoryId) -> ApiResult<RevertResult> {
        self.record(Call::Revert(history_id));
        let mut reverted = vec![history_id];
        reverted.extend(self.revert_cascade.borrow().iter().copied());
        Ok(RevertResult {
            reverted_history_ids: reverted,
        })
    }

    fn get_task(&self, task_id: &str) -> ApiResult<TaskSnapshot> {
        self.record(Call::GetTask(task_id.to_string()));
        if let Some(error) = self.task_error.borrow().clone() {
            return Err(error);
        }
        let mut statuses = self.task_statuses.borrow_mut();
        let status = if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            statuses.front().copied().unwrap_or(TaskStatus::Running)
        };
        Ok(TaskSnapshot {
            task_id: task_id.to_string(),
            status,
        })
    }

    fn pause_task(&self, task_id: &str) -> ApiResult<()> {
        self.record(Call::PauseTask(task_id.to_string()));
        Ok(())
    }

    fn resume_task(&self, task_id: &str) -> ApiResult<()> {
        self.record(Call::ResumeTask(task_id.to_string()));
        Ok(())
    }
}
