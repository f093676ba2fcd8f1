//! The drag session state machine.
//!
//! `Idle --start--> Dragging --end/cancel--> Idle`. While dragging, every
//! move recomputes a speculative preview from the committed board; only
//! `end` writes, and only through the [`BoardStore`]. Nothing here returns
//! an error: events that do not fit the current state are ignored, stale
//! ids resolve to no change, and a rejected commit leaves the committed
//! board as it was.

use crate::drag::collapse::CollapseCoordinator;
use crate::drag::preview::{DragInput, PreviewController};
use crate::io::store::{BoardStore, MemoryStore};
use crate::model::board::{Board, Group, Task};
use crate::model::config::DragConfig;
use crate::model::entity::{EntityKind, EntityRef};
use crate::model::geometry::GeometryProvider;
use crate::ops::board_ops;
use crate::ops::collision::{self, Droppable};
use crate::ops::position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dragging,
}

/// The entity being dragged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDrag {
    pub entity: EntityRef,
    /// Group the task was in when the drag started (tasks only)
    pub origin_group: Option<String>,
}

/// A resolved drop: which mutation to apply to the committed board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Groups {
        from: usize,
        to: usize,
    },
    WithinGroup {
        group_id: String,
        from: usize,
        to: usize,
    },
    AcrossGroups {
        source: String,
        task_id: String,
        target: String,
        index: usize,
    },
}

impl Placement {
    pub fn apply(&self, board: &Board) -> Board {
        match self {
            Placement::Groups { from, to } => board_ops::reorder_groups(board, *from, *to),
            Placement::WithinGroup { group_id, from, to } => {
                board_ops::move_task_within_group(board, group_id, *from, *to)
            }
            Placement::AcrossGroups {
                source,
                task_id,
                target,
                index,
            } => board_ops::move_task_across_groups(board, source, task_id, target, *index),
        }
    }
}

/// Where the last resolved placement sent the dragged entity, kept by id
/// so it can be placed again on a board that changed underneath the drag
#[derive(Debug, Clone, PartialEq, Eq)]
enum LastTarget {
    /// Group drag: the group whose slot the dragged group takes
    Group(String),
    /// Task drag: destination group and index
    Task { group_id: String, index: usize },
}

impl LastTarget {
    fn of(placement: &Placement, board: &Board) -> Option<Self> {
        match placement {
            Placement::Groups { to, .. } => {
                board.groups.get(*to).map(|g| LastTarget::Group(g.id.clone()))
            }
            Placement::WithinGroup { group_id, to, .. } => Some(LastTarget::Task {
                group_id: group_id.clone(),
                index: *to,
            }),
            Placement::AcrossGroups { target, index, .. } => Some(LastTarget::Task {
                group_id: target.clone(),
                index: *index,
            }),
        }
    }
}

/// Why an event was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// move/end/cancel/tick while idle
    NotDragging,
    /// start while a drag is already active
    AlreadyDragging,
    /// start with an id that is not on the board
    UnknownEntity,
    /// tick with no coalesced move waiting
    NothingPending,
}

/// Result of feeding one event to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    Started,
    Ignored(IgnoreReason),
    /// The preview was recomputed (it may be unchanged if nothing resolved)
    Previewed,
    /// The move was held back by the coalescing window
    Coalesced,
    Committed(Placement),
    Cancelled,
    /// The store refused the new board; the committed board is unchanged
    CommitRejected(String),
}

/// What the drag overlay should show
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActiveItem<'a> {
    Group(&'a Group),
    Task { task: &'a Task, group: &'a Group },
}

enum Resolution {
    Place(Placement),
    NoTarget,
}

/// One board's drag-and-drop session
pub struct DragSession<S: BoardStore = MemoryStore> {
    board: Board,
    store: S,
    phase: Phase,
    active: Option<ActiveDrag>,
    preview: PreviewController,
    collapse: CollapseCoordinator,
    collapse_during_drag: bool,
    last_target: Option<LastTarget>,
}

impl<S: BoardStore> DragSession<S> {
    pub fn new(board: Board, store: S, config: &DragConfig) -> Self {
        DragSession {
            board,
            store,
            phase: Phase::Idle,
            active: None,
            preview: PreviewController::new(config.coalesce_window()),
            collapse: CollapseCoordinator::new(),
            collapse_during_drag: config.collapse_during_drag,
            last_target: None,
        }
    }

    pub fn with_collapse(mut self, collapse: CollapseCoordinator) -> Self {
        self.collapse = collapse;
        self
    }

    // -----------------------------------------------------------------------
    // Observable state
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    /// The committed board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The board the renderer should show: the preview while dragging,
    /// otherwise the committed board
    pub fn preview_board(&self) -> &Board {
        self.preview.preview().unwrap_or(&self.board)
    }

    pub fn collapse(&self) -> &CollapseCoordinator {
        &self.collapse
    }

    pub fn collapse_mut(&mut self) -> &mut CollapseCoordinator {
        &mut self.collapse
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// The dragged group, or the dragged task with its current group
    pub fn active_item(&self) -> Option<ActiveItem<'_>> {
        let active = self.active.as_ref()?;
        match active.entity.kind {
            EntityKind::Group => self.board.group(&active.entity.id).map(ActiveItem::Group),
            EntityKind::Task => {
                let loc = self.board.locate_task(&active.entity.id)?;
                let group = self.board.groups[loc.group_index].as_ref();
                Some(ActiveItem::Task {
                    task: &group.tasks[loc.task_index],
                    group,
                })
            }
        }
    }

    /// Replace the committed board with an externally updated one. An
    /// active drag keeps going against the new board, and its preview is
    /// rebuilt from it.
    pub fn sync(&mut self, board: Board) {
        self.collapse.retain_board(&board);
        self.board = board;
        if self.phase != Phase::Dragging {
            return;
        }
        let placement = match (&self.active, &self.last_target) {
            (Some(active), Some(last)) => self.place_again(&active.entity, last),
            _ => None,
        };
        let preview = match placement {
            Some(p) => p.apply(&self.board),
            None => self.board.clone(),
        };
        self.preview.set_preview(preview);
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Begin dragging `entity`. Ignored while another drag is active or
    /// when the entity is not on the board.
    pub fn start(&mut self, entity: EntityRef) -> DragOutcome {
        if self.phase == Phase::Dragging {
            tracing::debug!(%entity, "start ignored: already dragging");
            return DragOutcome::Ignored(IgnoreReason::AlreadyDragging);
        }
        let origin_group = match entity.kind {
            EntityKind::Group => {
                if self.board.group_index(&entity.id).is_none() {
                    tracing::debug!(%entity, "start ignored: unknown group");
                    return DragOutcome::Ignored(IgnoreReason::UnknownEntity);
                }
                None
            }
            EntityKind::Task => match self.board.locate_task(&entity.id) {
                Some(loc) => Some(self.board.groups[loc.group_index].id.clone()),
                None => {
                    tracing::debug!(%entity, "start ignored: unknown task");
                    return DragOutcome::Ignored(IgnoreReason::UnknownEntity);
                }
            },
        };

        tracing::debug!(%entity, "drag started");
        self.active = Some(ActiveDrag {
            entity,
            origin_group,
        });
        self.phase = Phase::Dragging;
        self.last_target = None;
        self.preview.begin(&self.board);
        if self.collapse_during_drag {
            self.collapse.force_collapse();
        }
        DragOutcome::Started
    }

    /// Begin dragging the entity with `id`, classified by board lookup
    pub fn start_id(&mut self, id: &str) -> DragOutcome {
        match self.board.classify(id) {
            Some(kind) => self.start(EntityRef::new(kind, id)),
            None if self.phase == Phase::Dragging => {
                DragOutcome::Ignored(IgnoreReason::AlreadyDragging)
            }
            None => DragOutcome::Ignored(IgnoreReason::UnknownEntity),
        }
    }

    /// Pointer moved. Recomputes the preview unless the move falls inside
    /// the coalescing window.
    pub fn on_move(
        &mut self,
        input: DragInput,
        candidates: &[EntityRef],
        geometry: &impl GeometryProvider,
    ) -> DragOutcome {
        if self.phase != Phase::Dragging {
            return DragOutcome::Ignored(IgnoreReason::NotDragging);
        }
        match self.preview.offer(input) {
            Some(input) => {
                self.refresh_preview(&input, candidates, geometry);
                DragOutcome::Previewed
            }
            None => DragOutcome::Coalesced,
        }
    }

    /// Apply a coalesced move whose window has elapsed by `now`.
    pub fn tick(
        &mut self,
        now: std::time::Duration,
        candidates: &[EntityRef],
        geometry: &impl GeometryProvider,
    ) -> DragOutcome {
        if self.phase != Phase::Dragging {
            return DragOutcome::Ignored(IgnoreReason::NotDragging);
        }
        match self.preview.due(now) {
            Some(input) => {
                self.refresh_preview(&input, candidates, geometry);
                DragOutcome::Previewed
            }
            None if self.preview.has_pending() => DragOutcome::Coalesced,
            None => DragOutcome::Ignored(IgnoreReason::NothingPending),
        }
    }

    /// Drop. The target is recomputed from `input`, never taken from the
    /// preview; any pending coalesced move is discarded. Commits when a
    /// target resolves, otherwise behaves like `cancel`.
    pub fn end(
        &mut self,
        input: DragInput,
        candidates: &[EntityRef],
        geometry: &impl GeometryProvider,
    ) -> DragOutcome {
        if self.phase != Phase::Dragging {
            return DragOutcome::Ignored(IgnoreReason::NotDragging);
        }
        let resolution = self.resolve(&input, candidates, geometry);
        let outcome = match resolution {
            Resolution::Place(placement) => {
                let next = placement.apply(&self.board);
                match self.store.commit(&next) {
                    Ok(()) => {
                        tracing::info!(board = %next.id, ?placement, "drop committed");
                        self.board = next;
                        DragOutcome::Committed(placement)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "drop rejected by store");
                        DragOutcome::CommitRejected(e.to_string())
                    }
                }
            }
            Resolution::NoTarget => {
                tracing::debug!("drop without target, cancelling");
                DragOutcome::Cancelled
            }
        };
        self.finish();
        outcome
    }

    /// Abandon the drag. The committed board is untouched.
    pub fn cancel(&mut self) -> DragOutcome {
        if self.phase != Phase::Dragging {
            return DragOutcome::Ignored(IgnoreReason::NotDragging);
        }
        tracing::debug!("drag cancelled");
        self.finish();
        DragOutcome::Cancelled
    }

    fn finish(&mut self) {
        self.phase = Phase::Idle;
        self.active = None;
        self.last_target = None;
        self.preview.discard();
        self.collapse.release();
    }

    fn refresh_preview(
        &mut self,
        input: &DragInput,
        candidates: &[EntityRef],
        geometry: &impl GeometryProvider,
    ) {
        if let Resolution::Place(placement) = self.resolve(input, candidates, geometry) {
            self.preview.set_preview(placement.apply(&self.board));
            self.last_target = LastTarget::of(&placement, &self.board);
        }
    }

    // -----------------------------------------------------------------------
    // Target resolution
    // -----------------------------------------------------------------------

    fn resolve(
        &self,
        input: &DragInput,
        candidates: &[EntityRef],
        geometry: &impl GeometryProvider,
    ) -> Resolution {
        let Some(active) = &self.active else {
            return Resolution::NoTarget;
        };

        let eligible: Vec<&EntityRef> = candidates
            .iter()
            .filter(|c| **c != active.entity)
            .filter(|c| active.entity.is_task() || c.is_group())
            .collect();
        let droppables: Vec<Droppable> = eligible
            .iter()
            .filter_map(|c| geometry.bounds(c).map(|r| Droppable::new((*c).clone(), r)))
            .collect();

        if droppables.is_empty() {
            // Candidates exist but none could be measured: place the dragged
            // entity where the last resolved target sent it, if any.
            let placement = match &self.last_target {
                Some(last) if !eligible.is_empty() => self.place_again(&active.entity, last),
                _ => None,
            };
            return match placement {
                Some(p) => Resolution::Place(p),
                None => Resolution::NoTarget,
            };
        }

        let Some(over) = collision::resolve(&input.dragged, &droppables) else {
            return Resolution::NoTarget;
        };

        let placement = match active.entity.kind {
            EntityKind::Group => self.place_group(&active.entity, &over.target),
            EntityKind::Task => self.place_task(&active.entity, over, input, geometry),
        };
        match placement {
            Some(p) => Resolution::Place(p),
            None => Resolution::NoTarget,
        }
    }

    fn place_group(&self, active: &EntityRef, over: &EntityRef) -> Option<Placement> {
        let from = self.board.group_index(&active.id)?;
        let to = self.board.group_index(&over.id)?;
        Some(Placement::Groups { from, to })
    }

    fn place_task(
        &self,
        active: &EntityRef,
        over: &Droppable,
        input: &DragInput,
        geometry: &impl GeometryProvider,
    ) -> Option<Placement> {
        let loc = self.board.locate_task(&active.id)?;
        let source = self.board.groups[loc.group_index].as_ref();
        let pointer_y = input.pointer.y;

        let (target, index) = match over.target.kind {
            EntityKind::Task => {
                let tloc = self.board.locate_task(&over.target.id)?;
                let index = position::index_over_task(pointer_y, tloc.task_index, &over.rect);
                let target = self.board.groups[tloc.group_index].as_ref();
                if target.id == source.id && loc.task_index < index {
                    // the dragged row is removed before reinsertion
                    (target, index - 1)
                } else {
                    (target, index)
                }
            }
            EntityKind::Group => {
                let target = self.board.group(&over.target.id)?;
                let rows: Vec<_> = target
                    .tasks
                    .iter()
                    .filter(|t| t.id != active.id)
                    .map(|t| geometry.bounds(&EntityRef::task(&t.id)))
                    .collect();
                let index = match position::index_in_group(pointer_y, &over.target, &rows) {
                    Ok(i) => i,
                    Err(e) => {
                        tracing::debug!(error = %e, "falling back to last known index");
                        self.fallback_index(&target.id, rows.len())
                    }
                };
                (target, index)
            }
        };
        self.place_in_group(active, target, index)
    }

    /// Move the active task to `index` of `target`, wherever it sits now
    fn place_in_group(&self, active: &EntityRef, target: &Group, index: usize) -> Option<Placement> {
        let loc = self.board.locate_task(&active.id)?;
        let source = self.board.groups[loc.group_index].as_ref();
        if target.id == source.id {
            let last = source.tasks.len() - 1;
            Some(Placement::WithinGroup {
                group_id: source.id.clone(),
                from: loc.task_index,
                to: index.min(last),
            })
        } else {
            Some(Placement::AcrossGroups {
                source: source.id.clone(),
                task_id: active.id.clone(),
                target: target.id.clone(),
                index: board_ops::clamp_index(index, target.tasks.len()),
            })
        }
    }

    /// Resolve the last target again against the current board. Indices
    /// are looked up afresh, so only the dragged entity ever moves.
    fn place_again(&self, active: &EntityRef, last: &LastTarget) -> Option<Placement> {
        match (active.kind, last) {
            (EntityKind::Group, LastTarget::Group(over)) => {
                self.place_group(active, &EntityRef::group(over.as_str()))
            }
            (EntityKind::Task, LastTarget::Task { group_id, index }) => {
                let target = self.board.group(group_id)?;
                self.place_in_group(active, target, *index)
            }
            _ => None,
        }
    }

    /// Last index used for this destination group, or append
    fn fallback_index(&self, group_id: &str, len: usize) -> usize {
        match &self.last_target {
            Some(LastTarget::Task { group_id: g, index }) if g == group_id => *index,
            _ => len,
        }
    }
}
