use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::cli::replay::{self, ReplayScript};
use crate::drag::collapse::CollapseCoordinator;
use crate::drag::session::{DragOutcome, DragSession};
use crate::io::store::{BoardStore, FileStore, MemoryStore};
use crate::io::{board_io, config_io, state};
use crate::model::board::Board;
use crate::model::config::EngineConfig;
use crate::ops::board_ops;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let board_path = PathBuf::from(&cli.board);
    let config_path = cli
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| config_io::default_config_path(&board_path));

    match cli.command {
        Commands::Show => cmd_show(&board_path, json),
        Commands::MoveGroup(args) => cmd_move_group(&board_path, args, json),
        Commands::MoveTask(args) => cmd_move_task(&board_path, args, json),
        Commands::Collapse(args) => cmd_collapse(&board_path, args, json),
        Commands::Replay(args) => {
            let config = config_io::read_config(&config_path)?;
            cmd_replay(&board_path, &config, args, json)
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_collapse(board_path: &Path, board: &Board) -> CollapseCoordinator {
    state::read_ui_state(board_path)
        .unwrap_or_default()
        .into_coordinator(board)
}

fn commit(board_path: &Path, board: &Board) -> Result<(), Box<dyn std::error::Error>> {
    FileStore::new(board_path).commit(board)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_show(board_path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let board = board_io::read_board(board_path)?;
    let collapse = load_collapse(board_path, &board);

    if json {
        let view = BoardViewJson {
            board: &board,
            collapsed: collapse.collapsed_ids(),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        for line in format_board(&board, &collapse) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_move_group(
    board_path: &Path,
    args: MoveGroupArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let board = board_io::read_board(board_path)?;
    let next = board_ops::try_reorder_groups(&board, args.from, args.to)?;
    commit(board_path, &next)?;

    let moved = next.groups[args.to].id.clone();
    if json {
        let out = MoveJson {
            moved,
            group: None,
            index: args.to,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("moved {} to position {}", moved, args.to);
    }
    Ok(())
}

fn cmd_move_task(
    board_path: &Path,
    args: MoveTaskArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let board = board_io::read_board(board_path)?;
    let loc = board
        .locate_task(&args.task)
        .ok_or_else(|| format!("task not found: {}", args.task))?;
    let source = board.groups[loc.group_index].id.clone();

    let index = args.index.unwrap_or(usize::MAX);
    let next =
        board_ops::try_move_task_across_groups(&board, &source, &args.task, &args.group, index)?;
    commit(board_path, &next)?;

    let landed = next
        .group(&args.group)
        .and_then(|g| g.task_index(&args.task))
        .unwrap_or_default();
    if json {
        let out = MoveJson {
            moved: args.task,
            group: Some(args.group),
            index: landed,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("moved {} to {} at {}", args.task, args.group, landed);
    }
    Ok(())
}

fn cmd_collapse(
    board_path: &Path,
    args: CollapseArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let board = board_io::read_board(board_path)?;
    if board.group_index(&args.group).is_none() {
        return Err(format!("group not found: {}", args.group).into());
    }
    let mut collapse = load_collapse(board_path, &board);
    let collapsed = collapse.toggle(&args.group);
    state::write_ui_state(board_path, &state::BoardUiState::from_coordinator(&collapse))?;
    if json {
        let out = CollapseJson {
            group: args.group,
            collapsed,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "{} {}",
            if collapsed { "collapsed" } else { "expanded" },
            args.group
        );
    }
    Ok(())
}

fn cmd_replay(
    board_path: &Path,
    config: &EngineConfig,
    args: ReplayArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&args.script)
        .map_err(|e| format!("could not read {}: {}", args.script, e))?;
    let script: ReplayScript = serde_json::from_str(&text)
        .map_err(|e| format!("could not parse {}: {}", args.script, e))?;
    let board = board_io::read_board(board_path)?;
    let collapse = load_collapse(board_path, &board);

    let outcomes = if args.dry_run {
        run_script(board, MemoryStore::new(), collapse, config, &script)
    } else {
        run_script(board, FileStore::new(board_path), collapse, config, &script)
    };

    let committed = outcomes
        .iter()
        .any(|o| matches!(o, DragOutcome::Committed(_)));
    if json {
        let out = ReplayJson {
            outcomes: outcomes.iter().map(format_outcome).collect(),
            committed,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for outcome in &outcomes {
            println!("{}", format_outcome(outcome));
        }
    }
    Ok(())
}

fn run_script<S: BoardStore>(
    board: Board,
    store: S,
    collapse: CollapseCoordinator,
    config: &EngineConfig,
    script: &ReplayScript,
) -> Vec<DragOutcome> {
    let mut session = DragSession::new(board, store, &config.drag).with_collapse(collapse);
    replay::run(&mut session, script)
}
