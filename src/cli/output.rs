use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::drag::collapse::CollapseCoordinator;
use crate::drag::session::{DragOutcome, Placement};
use crate::model::board::{Board, Group};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct BoardViewJson<'a> {
    pub board: &'a Board,
    pub collapsed: Vec<String>,
}

/// Result of move-group / move-task
#[derive(Serialize)]
pub struct MoveJson {
    pub moved: String,
    /// Destination group (task moves only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub index: usize,
}

#[derive(Serialize)]
pub struct CollapseJson {
    pub group: String,
    pub collapsed: bool,
}

#[derive(Serialize)]
pub struct ReplayJson {
    pub outcomes: Vec<String>,
    pub committed: bool,
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Render the board as text. Collapsed groups show only their header.
pub fn format_board(board: &Board, collapse: &CollapseCoordinator) -> Vec<String> {
    let mut lines = vec![board.name.clone()];
    for group in &board.groups {
        lines.extend(format_group(group, collapse.is_collapsed(&group.id)));
    }
    lines
}

pub fn format_group(group: &Group, collapsed: bool) -> Vec<String> {
    let marker = if collapsed { '▸' } else { '▾' };
    let mut lines = vec![format!(
        "{} {} [{}] ({})",
        marker,
        group.name,
        group.id,
        group.tasks.len()
    )];
    if collapsed {
        return lines;
    }
    if group.tasks.is_empty() {
        lines.push("    (empty)".to_string());
        return lines;
    }
    let id_width = group
        .tasks
        .iter()
        .map(|t| UnicodeWidthStr::width(t.id.as_str()))
        .max()
        .unwrap_or(0);
    for task in &group.tasks {
        let pad = id_width - UnicodeWidthStr::width(task.id.as_str());
        lines.push(format!(
            "    {}{}  {}",
            task.id,
            " ".repeat(pad),
            task.title
        ));
    }
    lines
}

/// One-line description of a drag outcome
pub fn format_outcome(outcome: &DragOutcome) -> String {
    match outcome {
        DragOutcome::Started => "started".to_string(),
        DragOutcome::Ignored(reason) => format!("ignored ({:?})", reason),
        DragOutcome::Previewed => "previewed".to_string(),
        DragOutcome::Coalesced => "coalesced".to_string(),
        DragOutcome::Committed(p) => format!("committed: {}", format_placement(p)),
        DragOutcome::Cancelled => "cancelled".to_string(),
        DragOutcome::CommitRejected(msg) => format!("rejected: {}", msg),
    }
}

pub fn format_placement(placement: &Placement) -> String {
    match placement {
        Placement::Groups { from, to } => format!("group {} -> {}", from, to),
        Placement::WithinGroup { group_id, from, to } => {
            format!("task {} -> {} in {}", from, to, group_id)
        }
        Placement::AcrossGroups {
            source,
            task_id,
            target,
            index,
        } => format!("{} from {} -> {} at {}", task_id, source, target, index),
    }
}
