//! Duplicate review session for one open group.
//!
//! # Responsibility
//! - Hold the group under review together with its selection and primary.
//! - Turn operator intent into merge and exclusion plans.
//!
//! # Invariants
//! - Selection starts as "all members" when a session opens.
//! - A merge plan needs a primary and at least two selected members.
//! - An exclusion plan needs at least one selected member.
//! - A closed session produces no plans; its group left the working set.

use crate::model::group::{DuplicateGroup, GroupId, PropertyId};
use crate::service::selection::SelectionState;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Precondition failures for session commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The reviewed group is no longer listed.
    Closed,
    /// Merge requested without a primary designation.
    NoPrimary,
    /// Fewer members are selected than the action requires.
    NotEnoughSelected { required: usize, actual: usize },
    /// Exclusion requested with an empty selection.
    NothingSelected,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "this duplicate group is no longer under review"),
            Self::NoPrimary => write!(f, "select a primary record before merging"),
            Self::NotEnoughSelected { required, actual } => write!(
                f,
                "at least {required} selected record(s) required, got {actual}"
            ),
            Self::NothingSelected => write!(f, "select at least one record"),
        }
    }
}

impl Error for SessionError {}

/// Merge commit plan: every secondary is merged into `primary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    pub primary: PropertyId,
    /// Ascending order; this is the call order.
    pub secondaries: Vec<PropertyId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionKind {
    /// Every member selected: all members are mutually distinct.
    Full,
    /// Selected members are split away from the unselected ones.
    Partial,
}

/// Exclusion commit plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionPlan {
    pub kind: ExclusionKind,
    /// Pairs to mark as distinct. For partial plans the first id is selected
    /// and the second unselected.
    pub pairs: Vec<(PropertyId, PropertyId)>,
    pub selected: Vec<PropertyId>,
}

/// State container for one review dialog.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    group: DuplicateGroup,
    selection: SelectionState<PropertyId>,
    closed: bool,
}

impl ReviewSession {
    /// Opens a session with every member selected and no primary.
    pub fn open(group: DuplicateGroup) -> Self {
        let selection = SelectionState::all_selected(group.member_ids());
        Self {
            group,
            selection,
            closed: false,
        }
    }

    pub fn group(&self) -> &DuplicateGroup {
        &self.group
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group.id
    }

    pub fn selection(&self) -> &SelectionState<PropertyId> {
        &self.selection
    }

    pub fn primary(&self) -> Option<PropertyId> {
        self.selection.primary()
    }

    pub fn is_selected(&self, id: PropertyId) -> bool {
        self.selection.is_selected(id)
    }

    /// Returns whether the group left the working set; the dialog should close.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn toggle_member(&mut self, id: PropertyId) {
        self.selection.toggle(id);
    }

    /// Designates `id` as primary; no-op returning `false` when not selected.
    pub fn designate_primary(&mut self, id: PropertyId) -> bool {
        self.selection.designate_primary(id)
    }

    pub fn can_designate(&self, id: PropertyId) -> bool {
        !self.closed && self.selection.can_designate(id)
    }

    pub fn select_all(&mut self) {
        self.selection.select_all();
    }

    pub fn select_none(&mut self) {
        self.selection.select_none();
    }

    pub fn can_merge(&self) -> bool {
        self.merge_plan().is_ok()
    }

    pub fn can_exclude(&self) -> bool {
        self.exclusion_plan().is_ok()
    }

    /// Builds the merge plan for the current selection.
    pub fn merge_plan(&self) -> Result<MergePlan, SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        let primary = self.selection.primary().ok_or(SessionError::NoPrimary)?;
        let actual = self.selection.selected_count();
        if actual < 2 {
            return Err(SessionError::NotEnoughSelected {
                required: 2,
                actual,
            });
        }
        let secondaries = self
            .selection
            .selected()
            .into_iter()
            .filter(|id| *id != primary)
            .collect();
        Ok(MergePlan {
            primary,
            secondaries,
        })
    }

    /// Builds the exclusion plan for the current selection.
    ///
    /// A singleton selection is a partial plan that detaches that record
    /// from every other member.
    pub fn exclusion_plan(&self) -> Result<ExclusionPlan, SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        let selected = self.selection.selected();
        if selected.is_empty() {
            return Err(SessionError::NothingSelected);
        }

        if self.selection.is_full() {
            let mut pairs = Vec::new();
            for (index, first) in selected.iter().enumerate() {
                for second in &selected[index + 1..] {
                    pairs.push((*first, *second));
                }
            }
            return Ok(ExclusionPlan {
                kind: ExclusionKind::Full,
                pairs,
                selected,
            });
        }

        let unselected = self.selection.unselected();
        let pairs = selected
            .iter()
            .flat_map(|inside| unselected.iter().map(move |outside| (*inside, *outside)))
            .collect();
        Ok(ExclusionPlan {
            kind: ExclusionKind::Partial,
            pairs,
            selected,
        })
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
        self.selection.select_none();
    }

    /// Removes merged-away members from the session view.
    pub(crate) fn remove_members(&mut self, ids: &[PropertyId]) {
        self.group.remove_members(ids);
        self.selection.retain_members(|id| !ids.contains(&id));
    }
}

#[cfg(test)]
mod tests {
    use super::{ExclusionKind, ReviewSession, SessionError};
    use crate::model::group::{DuplicateGroup, RecordSummary};

    fn session(ids: &[i64]) -> ReviewSession {
        ReviewSession::open(DuplicateGroup::new(
            "g",
            ids.iter().map(|id| RecordSummary::new(*id, "unit")).collect(),
        ))
    }

    #[test]
    fn opening_selects_every_member() {
        let session = session(&[101, 102, 103]);
        assert!(session.selection().is_full());
        assert_eq!(session.primary(), None);
        assert!(!session.can_merge());
        assert!(session.can_exclude());
    }

    #[test]
    fn merge_plan_lists_non_primary_selected_members() {
        let mut session = session(&[101, 102, 103]);
        session.designate_primary(101);

        let plan = session.merge_plan().unwrap();
        assert_eq!(plan.primary, 101);
        assert_eq!(plan.secondaries, vec![102, 103]);
    }

    #[test]
    fn merge_requires_primary_and_two_members() {
        let mut session = session(&[101, 102, 103]);
        assert_eq!(session.merge_plan(), Err(SessionError::NoPrimary));

        session.designate_primary(102);
        session.toggle_member(101);
        session.toggle_member(103);
        assert_eq!(
            session.merge_plan(),
            Err(SessionError::NotEnoughSelected {
                required: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn full_exclusion_covers_every_pair_once() {
        let session = session(&[3, 1, 2, 4]);
        let plan = session.exclusion_plan().unwrap();
        assert_eq!(plan.kind, ExclusionKind::Full);
        assert_eq!(
            plan.pairs,
            vec![(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)]
        );
    }

    #[test]
    fn partial_exclusion_only_crosses_the_partition() {
        let mut session = session(&[101, 102, 103]);
        session.toggle_member(101);

        let plan = session.exclusion_plan().unwrap();
        assert_eq!(plan.kind, ExclusionKind::Partial);
        assert_eq!(plan.pairs, vec![(102, 101), (103, 101)]);
        assert!(!plan.pairs.contains(&(102, 103)));
    }

    #[test]
    fn singleton_exclusion_detaches_one_record() {
        let mut session = session(&[1, 2, 3]);
        session.select_none();
        session.toggle_member(2);

        let plan = session.exclusion_plan().unwrap();
        assert_eq!(plan.kind, ExclusionKind::Partial);
        assert_eq!(plan.pairs, vec![(2, 1), (2, 3)]);
    }

    #[test]
    fn empty_selection_cannot_exclude() {
        let mut session = session(&[1, 2]);
        session.select_none();
        assert_eq!(session.exclusion_plan(), Err(SessionError::NothingSelected));
        assert!(!session.can_exclude());
    }

    #[test]
    fn closed_session_refuses_plans() {
        let mut session = session(&[1, 2]);
        session.designate_primary(1);
        assert!(session.can_merge());

        session.close();
        assert!(session.is_closed());
        assert_eq!(session.merge_plan(), Err(SessionError::Closed));
        assert_eq!(session.exclusion_plan(), Err(SessionError::Closed));
        assert!(!session.can_designate(2));
    }
}
