//! Recorded drag gestures.
//!
//! A script pairs a measured layout with a sequence of drag events, so a
//! gesture captured from the UI can be replayed against a board file:
//!
//! ```json
//! {
//!   "layout": [{"kind": "group", "id": "A", "x": 0, "y": 0, "width": 300, "height": 160}],
//!   "events": [
//!     {"type": "start", "kind": "task", "id": "t1"},
//!     {"type": "move", "pointer": {"x": 10, "y": 20}, "dragged": {...}, "at": 0},
//!     {"type": "end",  "pointer": {"x": 10, "y": 90}, "dragged": {...}, "at": 80}
//!   ]
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::drag::preview::DragInput;
use crate::drag::session::{DragOutcome, DragSession};
use crate::io::store::BoardStore;
use crate::model::entity::EntityRef;
use crate::model::geometry::Layout;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub layout: Layout,
    pub events: Vec<ReplayEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplayEvent {
    Start(EntityRef),
    Move(DragInput),
    Tick {
        at: u64,
    },
    End(DragInput),
    Cancel,
}

/// Feed every event to the session, returning the outcome of each
pub fn run<S: BoardStore>(session: &mut DragSession<S>, script: &ReplayScript) -> Vec<DragOutcome> {
    let candidates = script.layout.candidates();
    let layout = &script.layout;
    script
        .events
        .iter()
        .map(|event| match event {
            ReplayEvent::Start(entity) => session.start(entity.clone()),
            ReplayEvent::Move(input) => session.on_move(*input, &candidates, layout),
            ReplayEvent::Tick { at } => {
                session.tick(Duration::from_millis(*at), &candidates, layout)
            }
            ReplayEvent::End(input) => session.end(*input, &candidates, layout),
            ReplayEvent::Cancel => session.cancel(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::session::Placement;
    use crate::io::store::MemoryStore;
    use crate::model::board::{Board, Group, Task};
    use crate::model::config::DragConfig;

    fn board() -> Board {
        let mut a = Group::new("A", "Backlog");
        a.tasks = vec![Task::new("t1", "A", "One"), Task::new("t2", "A", "Two")];
        Board::new("b", "Board", vec![a, Group::new("B", "Done")])
    }

    const SCRIPT: &str = r#"{
        "layout": [
            {"kind": "group", "id": "A", "x": 0, "y": 0, "width": 300, "height": 120},
            {"kind": "task", "id": "t1", "x": 0, "y": 40, "width": 300, "height": 40},
            {"kind": "task", "id": "t2", "x": 0, "y": 80, "width": 300, "height": 40},
            {"kind": "group", "id": "B", "x": 400, "y": 0, "width": 300, "height": 40}
        ],
        "events": [
            {"type": "start", "kind": "task", "id": "t1"},
            {"type": "move", "pointer": {"x": 200, "y": 60}, "dragged": {"x": 50, "y": 45, "width": 300, "height": 30}, "at": 0},
            {"type": "move", "pointer": {"x": 400, "y": 40}, "dragged": {"x": 250, "y": 25, "width": 300, "height": 30}, "at": 20},
            {"type": "tick", "at": 60},
            {"type": "end", "pointer": {"x": 550, "y": 20}, "dragged": {"x": 400, "y": 5, "width": 300, "height": 30}, "at": 90}
        ]
    }"#;

    #[test]
    fn parses_and_replays_script() {
        let script: ReplayScript = serde_json::from_str(SCRIPT).unwrap();
        assert_eq!(script.layout.len(), 4);
        assert_eq!(script.events.len(), 5);

        let mut session = DragSession::new(board(), MemoryStore::new(), &DragConfig::default());
        let outcomes = run(&mut session, &script);
        assert_eq!(
            outcomes,
            vec![
                DragOutcome::Started,
                DragOutcome::Previewed,
                DragOutcome::Coalesced,
                DragOutcome::Previewed,
                DragOutcome::Committed(Placement::AcrossGroups {
                    source: "A".into(),
                    task_id: "t1".into(),
                    target: "B".into(),
                    index: 0,
                }),
            ]
        );
        assert_eq!(session.board().group("B").unwrap().tasks[0].id, "t1");
        assert_eq!(session.store().commits.len(), 1);
    }

    #[test]
    fn cancel_event_leaves_board() {
        let script: ReplayScript = serde_json::from_str(
            r#"{"events": [{"type": "start", "kind": "group", "id": "B"}, {"type": "cancel"}]}"#,
        )
        .unwrap();
        let mut session = DragSession::new(board(), MemoryStore::new(), &DragConfig::default());
        let outcomes = run(&mut session, &script);
        assert_eq!(outcomes, vec![DragOutcome::Started, DragOutcome::Cancelled]);
        assert_eq!(session.board(), &board());
    }
}
