use crate::model::entity::EntityRef;
use crate::model::geometry::Rect;

/// Error type for insertion index resolution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("no geometry available for {0}")]
    GeometryUnavailable(EntityRef),
}

/// Insertion index when the pointer is over another task's row.
///
/// Below the row's midpoint inserts after the target; at or above it
/// inserts before. The exact midpoint always resolves to "before".
pub fn index_over_task(pointer_y: f64, target_index: usize, target_row: &Rect) -> usize {
    if pointer_y > target_row.mid_y() {
        target_index + 1
    } else {
        target_index
    }
}

/// Insertion index when the pointer is over a group container rather than
/// a specific row: the position of the first row whose midpoint lies below
/// the pointer, or the row count when there is none.
///
/// `rows` are the group's task rows in order; unmeasured rows are skipped.
/// Fails only when the group has rows and none of them could be measured.
pub fn index_in_group(
    pointer_y: f64,
    group: &EntityRef,
    rows: &[Option<Rect>],
) -> Result<usize, PositionError> {
    if !rows.is_empty() && rows.iter().all(Option::is_none) {
        return Err(PositionError::GeometryUnavailable(group.clone()));
    }
    Ok(rows
        .iter()
        .position(|row| row.is_some_and(|r| r.mid_y() > pointer_y))
        .unwrap_or(rows.len()))
}
