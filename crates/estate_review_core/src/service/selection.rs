//! Selection and primary designation over a fixed member list.
//!
//! # Responsibility
//! - Track which members of a dialog's record list are selected.
//! - Track the single primary designation used by merge commits.
//!
//! # Invariants
//! - The selection is always a subset of `members`.
//! - `primary`, when set, is always an element of the selection.

use std::collections::BTreeSet;

/// Mutable selection state for one open dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState<Id: Copy + Ord> {
    members: Vec<Id>,
    selected: BTreeSet<Id>,
    primary: Option<Id>,
}

impl<Id: Copy + Ord> SelectionState<Id> {
    /// Creates state with every member selected.
    pub fn all_selected(members: Vec<Id>) -> Self {
        let selected = members.iter().copied().collect();
        Self {
            members,
            selected,
            primary: None,
        }
    }

    /// Creates state with nothing selected.
    pub fn none_selected(members: Vec<Id>) -> Self {
        Self {
            members,
            selected: BTreeSet::new(),
            primary: None,
        }
    }

    pub fn members(&self) -> &[Id] {
        &self.members
    }

    pub fn primary(&self) -> Option<Id> {
        self.primary
    }

    pub fn is_selected(&self, id: Id) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected ids in ascending order.
    pub fn selected(&self) -> Vec<Id> {
        self.selected.iter().copied().collect()
    }

    /// Members outside the selection, in ascending order.
    pub fn unselected(&self) -> Vec<Id> {
        let mut ids: Vec<Id> = self
            .members
            .iter()
            .copied()
            .filter(|id| !self.selected.contains(id))
            .collect();
        ids.sort();
        ids
    }

    /// Returns whether every member is selected.
    pub fn is_full(&self) -> bool {
        !self.members.is_empty() && self.selected.len() == self.members.len()
    }

    /// Flips selection of `id`; unknown ids are ignored.
    ///
    /// Deselecting the primary clears the primary designation.
    pub fn toggle(&mut self, id: Id) {
        if !self.members.contains(&id) {
            return;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        } else if self.primary == Some(id) {
            self.primary = None;
        }
    }

    /// Returns whether `id` may be designated primary right now.
    pub fn can_designate(&self, id: Id) -> bool {
        self.selected.contains(&id)
    }

    /// Designates `id` as primary. No-op returning `false` when not selected.
    pub fn designate_primary(&mut self, id: Id) -> bool {
        if !self.can_designate(id) {
            return false;
        }
        self.primary = Some(id);
        true
    }

    pub fn clear_primary(&mut self) {
        self.primary = None;
    }

    pub fn select_all(&mut self) {
        self.selected = self.members.iter().copied().collect();
        self.prune_primary();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
        self.prune_primary();
    }

    /// Drops members rejected by `keep` from the list, selection and primary.
    pub fn retain_members(&mut self, mut keep: impl FnMut(Id) -> bool) {
        self.members.retain(|id| keep(*id));
        let members = &self.members;
        self.selected.retain(|id| members.contains(id));
        self.prune_primary();
    }

    fn prune_primary(&mut self) {
        if let Some(primary) = self.primary {
            if !self.selected.contains(&primary) {
                self.primary = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionState;

    #[test]
    fn toggle_off_primary_clears_designation() {
        let mut state = SelectionState::all_selected(vec![1, 2, 3]);
        assert!(state.designate_primary(2));

        state.toggle(2);
        assert!(!state.is_selected(2));
        assert_eq!(state.primary(), None);

        state.toggle(2);
        assert!(state.is_selected(2));
        assert_eq!(state.primary(), None);
    }

    #[test]
    fn toggle_off_other_member_keeps_primary() {
        let mut state = SelectionState::all_selected(vec![1, 2, 3]);
        state.designate_primary(1);
        state.toggle(3);
        assert_eq!(state.primary(), Some(1));
    }

    #[test]
    fn designate_unselected_is_noop() {
        let mut state = SelectionState::none_selected(vec![5, 6]);
        assert!(!state.designate_primary(5));
        assert_eq!(state.primary(), None);

        state.toggle(6);
        state.designate_primary(6);
        assert!(!state.designate_primary(5));
        assert_eq!(state.primary(), Some(6));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut state = SelectionState::none_selected(vec![1]);
        state.toggle(99);
        assert_eq!(state.selected_count(), 0);
        assert!(!state.designate_primary(99));
    }

    #[test]
    fn select_none_clears_primary_and_select_all_restores_members() {
        let mut state = SelectionState::all_selected(vec![3, 1, 2]);
        state.designate_primary(3);
        state.select_none();
        assert_eq!(state.primary(), None);
        assert_eq!(state.unselected(), vec![1, 2, 3]);

        state.select_all();
        assert!(state.is_full());
        assert_eq!(state.selected(), vec![1, 2, 3]);
    }

    #[test]
    fn retain_members_prunes_selection_and_primary() {
        let mut state = SelectionState::all_selected(vec![1, 2, 3]);
        state.designate_primary(2);
        state.retain_members(|id| id != 2);
        assert_eq!(state.members(), &[1, 3]);
        assert_eq!(state.selected(), vec![1, 3]);
        assert_eq!(state.primary(), None);
    }
}
