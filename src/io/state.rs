use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::drag::collapse::CollapseCoordinator;
use crate::io::board_io;
use crate::model::board::Board;

/// Persisted view state for one board (written to `.<board>.state.json`)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BoardUiState {
    /// Ids of groups the user collapsed
    #[serde(default)]
    pub collapsed: Vec<String>,
}

impl BoardUiState {
    /// Build a coordinator, forgetting groups no longer on `board`
    pub fn into_coordinator(self, board: &Board) -> CollapseCoordinator {
        let mut coordinator = CollapseCoordinator::from_collapsed(self.collapsed);
        coordinator.retain_board(board);
        coordinator
    }

    pub fn from_coordinator(coordinator: &CollapseCoordinator) -> Self {
        BoardUiState {
            collapsed: coordinator.collapsed_ids(),
        }
    }
}

/// Path of the state file belonging to `board_path`
pub fn state_path(board_path: &Path) -> PathBuf {
    let stem = board_path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "board".to_string());
    board_path.with_file_name(format!(".{}.state.json", stem))
}

/// Read the state file; missing or malformed files read as `None`
pub fn read_ui_state(board_path: &Path) -> Option<BoardUiState> {
    let content = fs::read_to_string(state_path(board_path)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Save the state file, replacing it atomically
pub fn write_ui_state(board_path: &Path, state: &BoardUiState) -> Result<(), std::io::Error> {
    let mut content = serde_json::to_string_pretty(state)?;
    content.push('\n');
    board_io::atomic_write(&state_path(board_path), content.as_bytes())
}
