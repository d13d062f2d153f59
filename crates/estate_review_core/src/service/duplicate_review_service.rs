//! Duplicate review use-case service.
//!
//! # Responsibility
//! - Own the working set of duplicate groups fetched from the backend.
//! - Execute merge and exclusion commits for a review session.
//! - Fold confirmed results back into the working set.
//!
//! # Invariants
//! - The working set only changes after the backend confirms a mutation.
//! - Groups left with one member or fewer are removed from the working set.
//! - A session whose group left the working set is re-pointed at a surviving
//!   partition or closed.
//! - Backend failures become a `Notice`; they never abort the remaining calls
//!   of a merge batch.

use crate::api::admin_api::{AdminApi, ApiError};
use crate::model::group::{
    DuplicateGroup, DuplicateGroupPage, GroupId, GroupQuery, GroupQueryError, PropertyId,
};
use crate::model::notice::Notice;
use crate::model::property::PropertyDetail;
use crate::service::review_session::{ExclusionKind, ReviewSession, SessionError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_EXCLUDE_REASON: &str = "confirmed distinct by operator";

/// Errors from duplicate review operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewError {
    InvalidQuery(GroupQueryError),
    GroupNotFound(GroupId),
    Session(SessionError),
    Api(ApiError),
}

impl ReviewError {
    /// Converts this error into the operator notification for `action`.
    pub fn to_notice(&self, action: &str) -> Notice {
        match self {
            Self::Api(err) => Notice::from_api_error(action, err),
            other => Notice::error(other.to_string()),
        }
    }
}

impl Display for ReviewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuery(err) => write!(f, "{err}"),
            Self::GroupNotFound(id) => write!(f, "duplicate group not found: {id}"),
            Self::Session(err) => write!(f, "{err}"),
            Self::Api(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReviewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidQuery(err) => Some(err),
            Self::Session(err) => Some(err),
            Self::Api(err) => Some(err),
            Self::GroupNotFound(_) => None,
        }
    }
}

impl From<SessionError> for ReviewError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<ApiError> for ReviewError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<GroupQueryError> for ReviewError {
    fn from(value: GroupQueryError) -> Self {
        Self::InvalidQuery(value)
    }
}

/// One failed backend call inside a commit batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitFailure {
    pub pair: (PropertyId, PropertyId),
    pub error: ApiError,
}

/// Outcome of one merge or exclusion commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<CommitFailure>,
    /// Whether the reviewed group left the working set.
    pub group_removed: bool,
    pub notice: Notice,
}

impl CommitReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Duplicate review facade over an admin backend.
pub struct DuplicateReviewService<A: AdminApi> {
    api: A,
    groups: Vec<DuplicateGroup>,
    total: u64,
    has_more: bool,
}

impl<A: AdminApi> DuplicateReviewService<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            groups: Vec::new(),
            total: 0,
            has_more: false,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Current working set.
    pub fn groups(&self) -> &[DuplicateGroup] {
        &self.groups
    }

    pub fn group(&self, id: &GroupId) -> Option<&DuplicateGroup> {
        self.groups.iter().find(|group| &group.id == id)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Replaces the working set with a fresh listing.
    ///
    /// Groups that are not viable (one member or fewer) are dropped.
    pub fn load_groups(&mut self, query: &GroupQuery) -> Result<&[DuplicateGroup], ReviewError> {
        query.validate()?;
        let DuplicateGroupPage {
            groups,
            total,
            has_more,
        } = self.api.list_duplicate_groups(query)?;

        let fetched = groups.len();
        self.groups = groups.into_iter().filter(DuplicateGroup::is_viable).collect();
        self.total = total.saturating_sub((fetched - self.groups.len()) as u64);
        self.has_more = has_more;
        info!(
            "event=groups_loaded module=review status=ok count={} total={} has_more={}",
            self.groups.len(),
            self.total,
            self.has_more
        );
        Ok(&self.groups)
    }

    /// Opens a review session on a copy of the listed group.
    pub fn open_session(&self, id: &GroupId) -> Result<ReviewSession, ReviewError> {
        self.group(id)
            .cloned()
            .map(ReviewSession::open)
            .ok_or_else(|| ReviewError::GroupNotFound(id.clone()))
    }

    /// Loads detail for one record shown in the review dialog.
    pub fn property_detail(&self, id: PropertyId) -> Result<PropertyDetail, ReviewError> {
        self.api.get_property(id).map_err(Into::into)
    }

    /// Merges every selected non-primary member into the primary.
    ///
    /// Calls are issued one secondary at a time; a failure is recorded and
    /// the remaining secondaries are still attempted. Confirmed merges are
    /// removed from both the session and the working set.
    pub fn commit_merge(
        &mut self,
        session: &mut ReviewSession,
    ) -> Result<CommitReport, ReviewError> {
        let plan = session.merge_plan()?;

        let mut merged = Vec::with_capacity(plan.secondaries.len());
        let mut failures = Vec::new();
        for secondary in &plan.secondaries {
            match self.api.merge_properties(plan.primary, *secondary) {
                Ok(_) => merged.push(*secondary),
                Err(error) => {
                    warn!(
                        "event=merge_call module=review status=error primary={} secondary={} error={}",
                        plan.primary, secondary, error
                    );
                    failures.push(CommitFailure {
                        pair: (plan.primary, *secondary),
                        error,
                    });
                }
            }
        }

        let attempted = plan.secondaries.len();
        let group_id = session.group_id().clone();
        let mut group_removed = false;
        if !merged.is_empty() {
            session.remove_members(&merged);
            group_removed = self.remove_members(&group_id, &merged);
            if group_removed {
                session.close();
            }
        }

        info!(
            "event=merge_commit module=review status={} group={} attempted={} succeeded={}",
            batch_status(attempted, merged.len()),
            group_id,
            attempted,
            merged.len()
        );

        let notice = batch_notice("Merge", "merged", attempted, merged.len(), &failures);
        Ok(CommitReport {
            attempted,
            succeeded: merged.len(),
            failures,
            group_removed,
            notice,
        })
    }

    /// Marks the selected members as distinct from the rest of the group.
    ///
    /// With every member selected, all pairs are excluded and the group
    /// leaves the working set. Otherwise each selected member is excluded
    /// against each unselected one and the group splits in two. The working
    /// set is only updated when every exclusion call succeeded.
    pub fn commit_exclude(
        &mut self,
        session: &mut ReviewSession,
        reason: &str,
    ) -> Result<CommitReport, ReviewError> {
        let plan = session.exclusion_plan()?;
        let reason = match reason.trim() {
            "" => DEFAULT_EXCLUDE_REASON,
            trimmed => trimmed,
        };

        let mut succeeded = 0;
        let mut failures = Vec::new();
        for (first, second) in &plan.pairs {
            match self.api.exclude_properties(*first, *second, reason) {
                Ok(_) => succeeded += 1,
                Err(error) => {
                    warn!(
                        "event=exclude_call module=review status=error first={} second={} error={}",
                        first, second, error
                    );
                    failures.push(CommitFailure {
                        pair: (*first, *second),
                        error,
                    });
                }
            }
        }

        let attempted = plan.pairs.len();
        let group_id = session.group_id().clone();
        if !failures.is_empty() {
            warn!(
                "event=exclude_commit module=review status=partial group={} attempted={} succeeded={}",
                group_id, attempted, succeeded
            );
            let mut notice = batch_notice("Exclude", "recorded", attempted, succeeded, &failures);
            notice.message.push_str("; group left unchanged");
            return Ok(CommitReport {
                attempted,
                succeeded,
                failures,
                group_removed: false,
                notice,
            });
        }

        let group_removed = match plan.kind {
            ExclusionKind::Full => {
                self.remove_group(&group_id);
                session.close();
                true
            }
            ExclusionKind::Partial => {
                let (survivor, removed) = self.split_group(session.group(), &plan.selected);
                match survivor {
                    Some(survivor) => *session = ReviewSession::open(survivor),
                    None => session.close(),
                }
                removed
            }
        };

        info!(
            "event=exclude_commit module=review status=ok group={} kind={:?} pairs={}",
            group_id, plan.kind, attempted
        );

        let notice = match plan.kind {
            ExclusionKind::Full => Notice::success("Marked all records as distinct properties"),
            ExclusionKind::Partial => Notice::success(format!(
                "Separated {} record(s) from the group",
                plan.selected.len()
            )),
        };
        Ok(CommitReport {
            attempted,
            succeeded,
            failures,
            group_removed,
            notice,
        })
    }

    /// Removes members from a listed group, dropping it when no longer viable.
    ///
    /// Returns whether the group is absent from the working set afterwards.
    fn remove_members(&mut self, id: &GroupId, ids: &[PropertyId]) -> bool {
        let Some(index) = self.groups.iter().position(|group| &group.id == id) else {
            return true;
        };
        self.groups[index].remove_members(ids);
        if self.groups[index].is_viable() {
            return false;
        }
        self.groups.remove(index);
        self.total = self.total.saturating_sub(1);
        true
    }

    fn remove_group(&mut self, id: &GroupId) {
        let before = self.groups.len();
        self.groups.retain(|group| &group.id != id);
        if self.groups.len() < before {
            self.total = self.total.saturating_sub(1);
        }
    }

    /// Replaces `reviewed` with its two partitions in place. A group that is
    /// no longer listed is left alone.
    ///
    /// Returns the partition the session continues on (kept, else split) and
    /// whether the original group key left the working set.
    fn split_group(
        &mut self,
        reviewed: &DuplicateGroup,
        selected: &[PropertyId],
    ) -> (Option<DuplicateGroup>, bool) {
        let (kept, split) = reviewed.partition(selected);
        let kept = kept.is_viable().then_some(kept);
        let split = split.filter(DuplicateGroup::is_viable);

        let removed = kept.is_none();
        let survivor = kept.clone().or_else(|| split.clone());
        let mut replacement = Vec::with_capacity(2);
        replacement.extend(kept);
        replacement.extend(split);

        if let Some(index) = self.groups.iter().position(|group| group.id == reviewed.id) {
            let added = replacement.len() as u64;
            self.groups.splice(index..=index, replacement);
            self.total = (self.total + added).saturating_sub(1);
        }

        (survivor, removed)
    }
}

fn batch_status(attempted: usize, succeeded: usize) -> &'static str {
    if succeeded == attempted {
        "ok"
    } else if succeeded == 0 {
        "error"
    } else {
        "partial"
    }
}

fn batch_notice(
    action: &str,
    verb: &str,
    attempted: usize,
    succeeded: usize,
    failures: &[CommitFailure],
) -> Notice {
    let Some(first) = failures.first() else {
        return Notice::success(format!("{succeeded} of {attempted} {verb}"));
    };
    if attempted == 1 {
        return Notice::from_api_error(action, &first.error);
    }

    let cause = Notice::from_api_error(action, &first.error);
    let message = format!("{succeeded} of {attempted} {verb}: {}", cause.message);
    let mut notice = if succeeded == 0 {
        Notice::error(message)
    } else {
        Notice::warning(message)
    };
    notice.requires_reauth = failures.iter().any(|failure| failure.error.requires_reauth());
    notice
}
