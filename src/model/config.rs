use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration from taskboard.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub drag: DragConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Moves closer together than this are coalesced (latest wins).
    /// Zero disables coalescing.
    #[serde(default = "default_coalesce_window_ms")]
    pub coalesce_window_ms: u64,
    /// Collapse every group while a drag is in progress
    #[serde(default = "default_true")]
    pub collapse_during_drag: bool,
}

impl DragConfig {
    pub fn coalesce_window(&self) -> Duration {
        Duration::from_millis(self.coalesce_window_ms)
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        DragConfig {
            coalesce_window_ms: default_coalesce_window_ms(),
            collapse_during_drag: true,
        }
    }
}

fn default_coalesce_window_ms() -> u64 {
    50
}

fn default_true() -> bool {
    true
}
