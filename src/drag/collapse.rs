use std::collections::HashSet;

use crate::model::board::Board;

/// Per-group collapsed flags plus a board-wide "force all collapsed" flag.
///
/// While forced, every group reads as collapsed but the remembered per-group
/// state is kept (and can still be changed) underneath; releasing the force
/// reveals it again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseCoordinator {
    collapsed: HashSet<String>,
    forced: bool,
}

impl CollapseCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a remembered set of collapsed group ids
    pub fn from_collapsed(ids: impl IntoIterator<Item = String>) -> Self {
        CollapseCoordinator {
            collapsed: ids.into_iter().collect(),
            forced: false,
        }
    }

    /// Effective state, as the renderer should show it
    pub fn is_collapsed(&self, group_id: &str) -> bool {
        self.forced || self.collapsed.contains(group_id)
    }

    /// The group's own remembered state, ignoring the force flag
    pub fn remembered(&self, group_id: &str) -> bool {
        self.collapsed.contains(group_id)
    }

    pub fn set_collapsed(&mut self, group_id: &str, collapsed: bool) {
        if collapsed {
            self.collapsed.insert(group_id.to_string());
        } else {
            self.collapsed.remove(group_id);
        }
    }

    /// Flip the remembered state; returns the new remembered value
    pub fn toggle(&mut self, group_id: &str) -> bool {
        let now = !self.remembered(group_id);
        self.set_collapsed(group_id, now);
        now
    }

    pub fn is_forced(&self) -> bool {
        self.forced
    }

    pub fn force_collapse(&mut self) {
        self.forced = true;
    }

    pub fn release(&mut self) {
        self.forced = false;
    }

    /// Forget groups that are no longer on the board
    pub fn retain_board(&mut self, board: &Board) {
        self.collapsed.retain(|id| board.group_index(id).is_some());
    }

    /// Remembered collapsed ids, sorted
    pub fn collapsed_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.collapsed.iter().cloned().collect();
        ids.sort();
        ids
    }
}
