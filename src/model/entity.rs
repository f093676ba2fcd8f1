use serde::{Deserialize, Serialize};

/// The kind of entity that can be dragged or dropped onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Group,
    Task,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Group => write!(f, "group"),
            EntityKind::Task => write!(f, "task"),
        }
    }
}

/// A tagged reference to a group or task on the board.
///
/// The kind travels with the id so nothing ever has to guess it from the
/// id text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        EntityRef {
            kind,
            id: id.into(),
        }
    }

    pub fn group(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Group, id)
    }

    pub fn task(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Task, id)
    }

    pub fn is_group(&self) -> bool {
        self.kind == EntityKind::Group
    }

    pub fn is_task(&self) -> bool {
        self.kind == EntityKind::Task
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
