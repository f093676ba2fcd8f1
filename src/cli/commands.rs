use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tb", about = concat!("taskboard v", env!("CARGO_PKG_VERSION"), " - drag your backlog into shape"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Board file to operate on
    #[arg(short = 'b', long = "board", global = true, default_value = "board.json")]
    pub board: String,

    /// Engine config (default: taskboard.toml next to the board)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the board
    Show,
    /// Move a group to a new position
    MoveGroup(MoveGroupArgs),
    /// Move a task within its group or into another group
    MoveTask(MoveTaskArgs),
    /// Toggle a group's collapsed state
    Collapse(CollapseArgs),
    /// Replay a recorded drag gesture against the board
    Replay(ReplayArgs),
}

#[derive(Args)]
pub struct MoveGroupArgs {
    /// Current position (0-indexed)
    pub from: usize,
    /// New position (0-indexed)
    pub to: usize,
}

#[derive(Args)]
pub struct MoveTaskArgs {
    /// Task ID
    pub task: String,
    /// Destination group ID
    pub group: String,
    /// Insertion index in the destination group (default: append)
    #[arg(long)]
    pub index: Option<usize>,
}

#[derive(Args)]
pub struct CollapseArgs {
    /// Group ID
    pub group: String,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Drag script (JSON with `layout` and `events`)
    pub script: String,
    /// Resolve the gesture and print the result without saving
    #[arg(long)]
    pub dry_run: bool,
}
