use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::entity::EntityKind;

/// A single work item on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: String,
    /// Id of the group whose task list currently holds this task
    #[serde(alias = "groupId")]
    pub group_id: String,
    #[serde(alias = "taskTitle", default)]
    pub title: String,
    /// Display attributes (status, priority, members, dates, ...) in
    /// source order. The engine never looks inside these.
    #[serde(flatten)]
    pub attributes: IndexMap<String, serde_json::Value>,
}

impl Task {
    pub fn new(id: impl Into<String>, group_id: impl Into<String>, title: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            group_id: group_id.into(),
            title: title.into(),
            attributes: IndexMap::new(),
        }
    }
}

/// A named, colored, ordered list of tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Group {
            id: id.into(),
            name: name.into(),
            color: String::new(),
            tasks: Vec::new(),
        }
    }

    /// Position of a task within this group
    pub fn task_index(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }
}

/// Where a task currently sits on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskLocation {
    pub group_index: usize,
    pub task_index: usize,
}

/// An immutable board snapshot.
///
/// Groups are reference counted so that a snapshot derived from another
/// shares every group it did not touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub groups: Vec<Arc<Group>>,
}

impl Board {
    pub fn new(id: impl Into<String>, name: impl Into<String>, groups: Vec<Group>) -> Self {
        Board {
            id: id.into(),
            name: name.into(),
            color: String::new(),
            groups: groups.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn group_index(&self, group_id: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.id == group_id)
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id).map(|g| g.as_ref())
    }

    /// Find a task anywhere on the board
    pub fn locate_task(&self, task_id: &str) -> Option<TaskLocation> {
        self.groups.iter().enumerate().find_map(|(group_index, g)| {
            g.task_index(task_id).map(|task_index| TaskLocation {
                group_index,
                task_index,
            })
        })
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        let loc = self.locate_task(task_id)?;
        Some(&self.groups[loc.group_index].tasks[loc.task_index])
    }

    /// Classify an id by looking it up on the board. Group ids win if an id
    /// is somehow used for both.
    pub fn classify(&self, id: &str) -> Option<EntityKind> {
        if self.group_index(id).is_some() {
            Some(EntityKind::Group)
        } else if self.locate_task(id).is_some() {
            Some(EntityKind::Task)
        } else {
            None
        }
    }

    /// Total number of tasks across all groups
    pub fn task_count(&self) -> usize {
        self.groups.iter().map(|g| g.tasks.len()).sum()
    }

    /// Every task's `group_id` names the group that holds it, and no task
    /// id appears twice.
    pub fn is_consistent(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.groups.iter().all(|g| {
            g.tasks
                .iter()
                .all(|t| t.group_id == g.id && seen.insert(t.id.as_str()))
        })
    }

    pub fn group_ids(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Board {
        let mut a = Group::new("A", "Backlog");
        a.tasks = vec![Task::new("t1", "A", "One"), Task::new("t2", "A", "Two")];
        let mut b = Group::new("B", "Doing");
        b.tasks = vec![Task::new("t3", "B", "Three")];
        Board::new("b1", "Board", vec![a, b])
    }

    #[test]
    fn locate_and_classify() {
        let board = sample();
        assert_eq!(
            board.locate_task("t3"),
            Some(TaskLocation {
                group_index: 1,
                task_index: 0
            })
        );
        assert_eq!(board.classify("A"), Some(EntityKind::Group));
        assert_eq!(board.classify("t2"), Some(EntityKind::Task));
        assert_eq!(board.classify("nope"), None);
        assert_eq!(board.task_count(), 3);
    }

    #[test]
    fn consistency_detects_wrong_group_id() {
        let mut board = sample();
        assert!(board.is_consistent());
        Arc::make_mut(&mut board.groups[0]).tasks[0].group_id = "B".into();
        assert!(!board.is_consistent());
    }

    #[test]
    fn consistency_detects_duplicate_task() {
        let mut board = sample();
        Arc::make_mut(&mut board.groups[1])
            .tasks
            .push(Task::new("t1", "B", "Dup"));
        assert!(!board.is_consistent());
    }

    #[test]
    fn deserializes_legacy_field_names() {
        let json = r##"{
            "_id": "board1",
            "name": "Board numero uno",
            "color": "#339ecd",
            "groups": [{
                "_id": "group1",
                "name": "Backlog",
                "color": "#339ecd",
                "tasks": [{
                    "_id": "task101",
                    "groupId": "group1",
                    "taskTitle": "Design homepage UI",
                    "status": "wip",
                    "priority": "high"
                }]
            }]
        }"##;
        let board: Board = serde_json::from_str(json).unwrap();
        let task = board.task("task101").unwrap();
        assert_eq!(task.group_id, "group1");
        assert_eq!(task.title, "Design homepage UI");
        assert_eq!(task.attributes["status"], "wip");
        assert_eq!(task.attributes["priority"], "high");
        assert!(board.is_consistent());
    }

    #[test]
    fn attributes_round_trip_in_order() {
        let mut task = Task::new("t1", "A", "One");
        task.attributes.insert("status".into(), "done".into());
        task.attributes.insert("date".into(), "15-01-2025".into());
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(
            json,
            r#"{"id":"t1","group_id":"A","title":"One","status":"done","date":"15-01-2025"}"#
        );
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }
}
