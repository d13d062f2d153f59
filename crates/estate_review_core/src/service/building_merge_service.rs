//! Building merge use-case service.
//!
//! # Responsibility
//! - Search merge candidates and drive the building merge dialog.
//! - Keep the merge history view and apply reverts to it.
//!
//! # Invariants
//! - A merge needs a primary and at least one other selected building.
//! - A history entry is reverted at most once; cascaded reverts reported by
//!   the backend are applied to every affected entry.

use crate::api::admin_api::{AdminApi, ApiError};
use crate::model::building::{
    BuildingCandidate, BuildingId, BuildingMergeHistoryEntry, BuildingMergeResult,
    BuildingSearchQuery, HistoryQuery, MergeHistoryId, RevertResult, Suggestion,
};
use crate::model::notice::Notice;
use crate::service::selection::SelectionState;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from building merge operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildingMergeError {
    EmptySearch,
    NoPrimary,
    NoSecondary,
    HistoryEntryNotFound(MergeHistoryId),
    AlreadyReverted(MergeHistoryId),
    Api(ApiError),
}

impl BuildingMergeError {
    pub fn to_notice(&self, action: &str) -> Notice {
        match self {
            Self::Api(err) => Notice::from_api_error(action, err),
            other => Notice::error(other.to_string()),
        }
    }
}

impl Display for BuildingMergeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySearch => write!(f, "enter a building name to search"),
            Self::NoPrimary => write!(f, "select the building to keep"),
            Self::NoSecondary => write!(f, "select at least one building to merge"),
            Self::HistoryEntryNotFound(id) => write!(f, "merge history entry not found: {id}"),
            Self::AlreadyReverted(id) => write!(f, "merge {id} was already reverted"),
            Self::Api(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BuildingMergeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for BuildingMergeError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

/// Selection state of the building merge dialog.
///
/// Starts with nothing selected; the operator picks the buildings to merge.
#[derive(Debug, Clone)]
pub struct BuildingMergeDraft {
    candidates: Vec<BuildingCandidate>,
    selection: SelectionState<BuildingId>,
}

impl BuildingMergeDraft {
    pub fn new(candidates: Vec<BuildingCandidate>) -> Self {
        let selection =
            SelectionState::none_selected(candidates.iter().map(|building| building.id).collect());
        Self {
            candidates,
            selection,
        }
    }

    pub fn candidates(&self) -> &[BuildingCandidate] {
        &self.candidates
    }

    pub fn selection(&self) -> &SelectionState<BuildingId> {
        &self.selection
    }

    pub fn toggle(&mut self, id: BuildingId) {
        self.selection.toggle(id);
    }

    pub fn designate_primary(&mut self, id: BuildingId) -> bool {
        self.selection.designate_primary(id)
    }

    pub fn select_all(&mut self) {
        self.selection.select_all();
    }

    pub fn select_none(&mut self) {
        self.selection.select_none();
    }

    /// Returns `(primary, secondaries)` for the current selection.
    pub fn plan(&self) -> Result<(BuildingId, Vec<BuildingId>), BuildingMergeError> {
        let primary = self.selection.primary().ok_or(BuildingMergeError::NoPrimary)?;
        let secondaries: Vec<BuildingId> = self
            .selection
            .selected()
            .into_iter()
            .filter(|id| *id != primary)
            .collect();
        if secondaries.is_empty() {
            return Err(BuildingMergeError::NoSecondary);
        }
        Ok((primary, secondaries))
    }

    pub fn can_merge(&self) -> bool {
        self.plan().is_ok()
    }

    fn remove(&mut self, ids: &[BuildingId]) {
        self.candidates.retain(|building| !ids.contains(&building.id));
        self.selection.retain_members(|id| !ids.contains(&id));
    }
}

/// Building merge facade over an admin backend.
pub struct BuildingMergeService<A: AdminApi> {
    api: A,
    history: Vec<BuildingMergeHistoryEntry>,
    history_total: u64,
}

impl<A: AdminApi> BuildingMergeService<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            history: Vec::new(),
            history_total: 0,
        }
    }

    /// Searches merge candidates and opens a draft over them.
    pub fn search_candidates(
        &self,
        query: &BuildingSearchQuery,
    ) -> Result<BuildingMergeDraft, BuildingMergeError> {
        if query.text.trim().is_empty() {
            return Err(BuildingMergeError::EmptySearch);
        }
        let candidates = self.api.search_buildings_for_merge(query)?;
        Ok(BuildingMergeDraft::new(candidates))
    }

    /// Returns autocomplete suggestions; a blank prefix yields none.
    pub fn name_suggestions(&self, prefix: &str) -> Result<Vec<Suggestion>, BuildingMergeError> {
        if prefix.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.api
            .building_name_suggestions(prefix.trim())
            .map_err(Into::into)
    }

    /// Merges the selected secondaries into the primary with one call.
    ///
    /// Merged buildings leave the draft on success; the draft is untouched
    /// on failure.
    pub fn merge(
        &mut self,
        draft: &mut BuildingMergeDraft,
    ) -> Result<BuildingMergeResult, BuildingMergeError> {
        let (primary, secondaries) = draft.plan()?;
        let result = match self.api.merge_buildings(primary, &secondaries) {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    "event=building_merge module=building status=error primary={primary} count={} error={err}",
                    secondaries.len()
                );
                return Err(err.into());
            }
        };

        let merged: Vec<BuildingId> = if result.merged_building_ids.is_empty() {
            secondaries
        } else {
            result.merged_building_ids.clone()
        };
        draft.remove(&merged);
        info!(
            "event=building_merge module=building status=ok primary={primary} merged={}",
            merged.len()
        );
        Ok(result)
    }

    /// Replaces the history view with a fresh page.
    pub fn load_history(
        &mut self,
        query: &HistoryQuery,
    ) -> Result<&[BuildingMergeHistoryEntry], BuildingMergeError> {
        let page = self.api.building_merge_history(query)?;
        self.history = page.items;
        self.history_total = page.total;
        Ok(&self.history)
    }

    pub fn history(&self) -> &[BuildingMergeHistoryEntry] {
        &self.history
    }

    pub fn history_total(&self) -> u64 {
        self.history_total
    }

    /// Reverts one merge and marks every cascaded entry as reverted.
    pub fn revert(
        &mut self,
        history_id: MergeHistoryId,
    ) -> Result<RevertResult, BuildingMergeError> {
        let entry = self
            .history
            .iter()
            .find(|entry| entry.id == history_id)
            .ok_or(BuildingMergeError::HistoryEntryNotFound(history_id))?;
        if entry.reverted {
            return Err(BuildingMergeError::AlreadyReverted(history_id));
        }

        let mut result = self.api.revert_building_merge(history_id)?;
        if !result.reverted_history_ids.contains(&history_id) {
            result.reverted_history_ids.push(history_id);
        }
        for entry in &mut self.history {
            if result.reverted_history_ids.contains(&entry.id) {
                entry.reverted = true;
            }
        }
        info!(
            "event=building_merge_revert module=building status=ok history_id={history_id} cascaded={}",
            result.reverted_history_ids.len() - 1
        );
        Ok(result)
    }
}
