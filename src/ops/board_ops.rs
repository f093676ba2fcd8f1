use std::sync::Arc;

use crate::model::board::{Board, Group};

/// Error type for board reorder operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("group not found: {0}")]
    GroupNotFound(String),
    #[error("task {task} not found in group {group}")]
    TaskNotFound { task: String, group: String },
    #[error("index {index} out of range (0..{len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

// ---------------------------------------------------------------------------
// Fallible forms
// ---------------------------------------------------------------------------

/// Move the group at `from` so that it ends up at `to`.
pub fn try_reorder_groups(board: &Board, from: usize, to: usize) -> Result<Board, BoardError> {
    let len = board.groups.len();
    check_index(from, len)?;
    check_index(to, len)?;

    let mut next = board.clone();
    let group = next.groups.remove(from);
    next.groups.insert(to, group);
    Ok(next)
}

/// Move one task within its group. The task keeps its `group_id`.
pub fn try_move_task_within_group(
    board: &Board,
    group_id: &str,
    from: usize,
    to: usize,
) -> Result<Board, BoardError> {
    let gi = board
        .group_index(group_id)
        .ok_or_else(|| BoardError::GroupNotFound(group_id.to_string()))?;
    let len = board.groups[gi].tasks.len();
    check_index(from, len)?;
    check_index(to, len)?;

    let mut next = board.clone();
    let group = Arc::make_mut(&mut next.groups[gi]);
    let task = group.tasks.remove(from);
    group.tasks.insert(to, task);
    Ok(next)
}

/// Move a task out of `source_group_id` and into `target_group_id` at
/// `insert_index`, clamped to the target's length after removal.
///
/// When source and target are the same group this is a within-group move.
pub fn try_move_task_across_groups(
    board: &Board,
    source_group_id: &str,
    task_id: &str,
    target_group_id: &str,
    insert_index: usize,
) -> Result<Board, BoardError> {
    let si = board
        .group_index(source_group_id)
        .ok_or_else(|| BoardError::GroupNotFound(source_group_id.to_string()))?;
    let ti = board
        .group_index(target_group_id)
        .ok_or_else(|| BoardError::GroupNotFound(target_group_id.to_string()))?;
    let from = board.groups[si]
        .task_index(task_id)
        .ok_or_else(|| BoardError::TaskNotFound {
            task: task_id.to_string(),
            group: source_group_id.to_string(),
        })?;

    if si == ti {
        let last = board.groups[si].tasks.len() - 1;
        return try_move_task_within_group(board, source_group_id, from, insert_index.min(last));
    }

    let mut next = board.clone();
    let mut task = Arc::make_mut(&mut next.groups[si]).tasks.remove(from);
    task.group_id = target_group_id.to_string();
    let target: &mut Group = Arc::make_mut(&mut next.groups[ti]);
    let at = clamp_index(insert_index, target.tasks.len());
    target.tasks.insert(at, task);
    Ok(next)
}

// ---------------------------------------------------------------------------
// No-op-on-failure forms
// ---------------------------------------------------------------------------

/// Reorder groups; returns the board unchanged when either index is out of
/// bounds.
pub fn reorder_groups(board: &Board, from: usize, to: usize) -> Board {
    or_unchanged(board, try_reorder_groups(board, from, to))
}

/// Reorder a task within a group; returns the board unchanged on an
/// unknown group or out-of-bounds index.
pub fn move_task_within_group(board: &Board, group_id: &str, from: usize, to: usize) -> Board {
    or_unchanged(board, try_move_task_within_group(board, group_id, from, to))
}

/// Move a task between groups; returns the board unchanged when the task is
/// not in the source group or either group is unknown.
pub fn move_task_across_groups(
    board: &Board,
    source_group_id: &str,
    task_id: &str,
    target_group_id: &str,
    insert_index: usize,
) -> Board {
    or_unchanged(
        board,
        try_move_task_across_groups(board, source_group_id, task_id, target_group_id, insert_index),
    )
}

/// Clamp an insertion index to `[0, len]`
pub fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len)
}

fn check_index(index: usize, len: usize) -> Result<(), BoardError> {
    if index < len {
        Ok(())
    } else {
        Err(BoardError::IndexOutOfBounds { index, len })
    }
}

fn or_unchanged(board: &Board, result: Result<Board, BoardError>) -> Board {
    match result {
        Ok(next) => next,
        Err(e) => {
            tracing::debug!(board = %board.id, error = %e, "reorder skipped");
            board.clone()
        }
    }
}
