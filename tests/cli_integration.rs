//! Integration tests for the `tb` CLI.
//!
//! Each test copies the fixture board into a temp directory, runs `tb` as a
//! subprocess, and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `tb` binary.
fn tb_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tb");
    path
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Copy the fixture board into `root`.
fn create_test_board(root: &Path) {
    fs::copy(fixture("board.json"), root.join("board.json")).unwrap();
}

/// Run `tb` with the given args in the given directory, returning (stdout, stderr, success).
fn run_tb(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(tb_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run tb");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tb` expecting success, return stdout.
fn run_tb_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tb(dir, args);
    if !success {
        panic!(
            "tb {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn read_board(dir: &Path) -> serde_json::Value {
    let text = fs::read_to_string(dir.join("board.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn task_ids(board: &serde_json::Value, group_index: usize) -> Vec<String> {
    board["groups"][group_index]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

#[test]
fn test_show_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_tb_ok(tmp.path(), &["show"]);
    assert!(out.starts_with("Sprint 12\n"));
    assert!(out.contains("▾ Backlog [A] (3)"));
    assert!(out.contains("t1  Design homepage UI"));
    assert!(out.contains("▾ Done [C] (0)"));
    assert!(out.contains("(empty)"));
}

#[test]
fn test_show_json_normalizes_legacy_keys() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_tb_ok(tmp.path(), &["show", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let t1 = &parsed["board"]["groups"][0]["tasks"][0];
    assert_eq!(t1["id"], "t1");
    assert_eq!(t1["group_id"], "A");
    assert_eq!(t1["title"], "Design homepage UI");
    // unknown attributes pass through
    assert_eq!(t1["priority"], "high");
    assert_eq!(parsed["collapsed"], serde_json::json!([]));
}

#[test]
fn test_show_with_board_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("boards")).unwrap();
    fs::copy(fixture("board.json"), tmp.path().join("boards/sprint.json")).unwrap();

    let out = run_tb_ok(tmp.path(), &["show", "-b", "boards/sprint.json"]);
    assert!(out.contains("Sprint 12"));
}

#[test]
fn test_missing_board_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_tb(tmp.path(), &["show"]);
    assert!(!success);
    assert!(stderr.contains("error:"));
}

// ---------------------------------------------------------------------------
// move-group / move-task
// ---------------------------------------------------------------------------

#[test]
fn test_move_group() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_tb_ok(tmp.path(), &["move-group", "0", "2"]);
    assert!(out.contains("moved A to position 2"));

    let board = read_board(tmp.path());
    let ids: Vec<&str> = board["groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["B", "C", "A"]);
}

#[test]
fn test_move_group_out_of_bounds() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());
    let before = fs::read_to_string(tmp.path().join("board.json")).unwrap();

    let (_, stderr, success) = run_tb(tmp.path(), &["move-group", "0", "7"]);
    assert!(!success);
    assert!(stderr.contains("error:"));
    let after = fs::read_to_string(tmp.path().join("board.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_move_task_across_groups_appends() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_tb_ok(tmp.path(), &["move-task", "t2", "B"]);
    assert!(out.contains("moved t2 to B at 1"));

    let board = read_board(tmp.path());
    assert_eq!(task_ids(&board, 0), vec!["t1", "t3"]);
    assert_eq!(task_ids(&board, 1), vec!["t4", "t2"]);
    assert_eq!(board["groups"][1]["tasks"][1]["group_id"], "B");
}

#[test]
fn test_move_task_with_index() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    run_tb_ok(tmp.path(), &["move-task", "t3", "B", "--index", "0"]);
    let board = read_board(tmp.path());
    assert_eq!(task_ids(&board, 1), vec!["t3", "t4"]);
}

#[test]
fn test_move_task_within_group() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    run_tb_ok(tmp.path(), &["move-task", "t1", "A", "--index", "2"]);
    let board = read_board(tmp.path());
    assert_eq!(task_ids(&board, 0), vec!["t2", "t3", "t1"]);
}

#[test]
fn test_move_unknown_task_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let (_, stderr, success) = run_tb(tmp.path(), &["move-task", "nope", "B"]);
    assert!(!success);
    assert!(stderr.contains("task not found: nope"));
}

// ---------------------------------------------------------------------------
// collapse
// ---------------------------------------------------------------------------

#[test]
fn test_collapse_toggles_and_persists() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_tb_ok(tmp.path(), &["collapse", "A"]);
    assert_eq!(out.trim(), "collapsed A");
    assert!(tmp.path().join(".board.state.json").exists());

    let shown = run_tb_ok(tmp.path(), &["show"]);
    assert!(shown.contains("▸ Backlog [A] (3)"));
    assert!(!shown.contains("Design homepage UI"));

    let out = run_tb_ok(tmp.path(), &["collapse", "A"]);
    assert_eq!(out.trim(), "expanded A");
    let shown = run_tb_ok(tmp.path(), &["show"]);
    assert!(shown.contains("Design homepage UI"));
}

#[test]
fn test_collapse_unknown_group_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let (_, stderr, success) = run_tb(tmp.path(), &["collapse", "Z"]);
    assert!(!success);
    assert!(stderr.contains("group not found: Z"));
}

#[test]
fn test_mutating_commands_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_tb_ok(tmp.path(), &["move-group", "0", "1", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed, serde_json::json!({"moved": "A", "index": 1}));

    let out = run_tb_ok(tmp.path(), &["move-task", "t2", "C", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!({"moved": "t2", "group": "C", "index": 0})
    );

    let out = run_tb_ok(tmp.path(), &["collapse", "B", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed, serde_json::json!({"group": "B", "collapsed": true}));
}

// ---------------------------------------------------------------------------
// replay
// ---------------------------------------------------------------------------

#[test]
fn test_replay_commits_drop() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());
    let script = fixture("drag_t1_to_b.json");

    let out = run_tb_ok(tmp.path(), &["replay", script.to_str().unwrap()]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "started",
            "previewed",
            "coalesced",
            "committed: t1 from A -> B at 1",
        ]
    );

    let board = read_board(tmp.path());
    assert_eq!(task_ids(&board, 0), vec!["t2", "t3"]);
    assert_eq!(task_ids(&board, 1), vec!["t4", "t1"]);
    assert_eq!(board["groups"][1]["tasks"][1]["group_id"], "B");
}

#[test]
fn test_replay_dry_run_leaves_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());
    let before = fs::read_to_string(tmp.path().join("board.json")).unwrap();
    let script = fixture("drag_t1_to_b.json");

    let out = run_tb_ok(
        tmp.path(),
        &["replay", script.to_str().unwrap(), "--dry-run", "--json"],
    );
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["committed"], true);
    assert_eq!(parsed["outcomes"][3], "committed: t1 from A -> B at 1");

    let after = fs::read_to_string(tmp.path().join("board.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_replay_cancel_leaves_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());
    let before = fs::read_to_string(tmp.path().join("board.json")).unwrap();
    let script = fixture("drag_cancelled.json");

    let out = run_tb_ok(tmp.path(), &["replay", script.to_str().unwrap()]);
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec!["started", "previewed", "cancelled"]
    );
    let after = fs::read_to_string(tmp.path().join("board.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_replay_respects_coalesce_window_from_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());
    fs::write(
        tmp.path().join("taskboard.toml"),
        "[drag]\ncoalesce_window_ms = 0\n",
    )
    .unwrap();
    let script = fixture("drag_t1_to_b.json");

    let out = run_tb_ok(
        tmp.path(),
        &["replay", script.to_str().unwrap(), "--dry-run"],
    );
    // with no window every move is applied immediately
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec![
            "started",
            "previewed",
            "previewed",
            "committed: t1 from A -> B at 1",
        ]
    );
}

#[test]
fn test_replay_bad_config_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());
    fs::write(tmp.path().join("custom.toml"), "[drag\n").unwrap();
    let script = fixture("drag_t1_to_b.json");

    let (_, stderr, success) = run_tb(
        tmp.path(),
        &["replay", script.to_str().unwrap(), "--config", "custom.toml"],
    );
    assert!(!success);
    assert!(stderr.contains("error:"));
}
