//! End-to-end CLI integration tests for the `tack` binary.
//!
//! Each test creates its own temporary directory, initializes a board, and
//! exercises the `tack` binary as a subprocess via `assert_cmd`.

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a `Command` targeting the cargo-built `tack` binary.
fn tack(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tack").unwrap();
    cmd.current_dir(tmp.path())
        .env("NO_COLOR", "1")
        .env_remove("TACK_DIR")
        .env_remove("TACK_PROJECT")
        .env_remove("RUST_LOG");
    cmd
}

/// Initialize a fresh board in a temp directory and return the handle.
fn init_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tack(&tmp).args(["init", "--prefix", "T", "--quiet"]).assert().success();
    tmp
}

/// Run a command with `--json` and parse its stdout.
fn json(tmp: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = tack(tmp).args(args).arg("--json").output().unwrap();
    assert!(
        output.status.success(),
        "{:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Create a task and return its id.
fn create_task(tmp: &TempDir, title: &str, extra_args: &[&str]) -> String {
    let mut args = vec!["create", title];
    args.extend_from_slice(extra_args);
    json(tmp, &args)["id"].as_str().unwrap().to_string()
}

fn list_ids(tmp: &TempDir, extra_args: &[&str]) -> Vec<String> {
    let mut args = vec!["list"];
    args.extend_from_slice(extra_args);
    json(tmp, &args)
        .as_array()
        .expect("list --json should return an array")
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Init and create
// ---------------------------------------------------------------------------

#[test]
fn init_twice_requires_force() {
    let tmp = init_project();
    tack(&tmp)
        .args(["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    tack(&tmp).args(["init", "--force", "--quiet"]).assert().success();
}

#[test]
fn commands_outside_a_board_fail() {
    let tmp = TempDir::new().unwrap();
    tack(&tmp)
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tack init"));
}

#[test]
fn create_issues_sequential_ids_into_first_column() {
    let tmp = init_project();
    let id1 = create_task(&tmp, "Write docs", &[]);
    let id2 = create_task(&tmp, "Fix login", &["-t", "bug", "-p", "high", "--tag", "auth,web"]);
    assert_eq!(id1, "T-1");
    assert_eq!(id2, "T-2");

    let tasks = json(&tmp, &["list"]);
    let arr = tasks.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["status"], "TODO");
    assert_eq!(arr[1]["type"], "BUG");
    assert_eq!(arr[1]["priority"], "HIGH");
    assert_eq!(arr[1]["tags"], serde_json::json!(["auth", "web"]));
}

#[test]
fn create_with_custom_prefix() {
    let tmp = TempDir::new().unwrap();
    tack(&tmp)
        .args(["init", "--prefix", "WEB-", "--quiet"])
        .assert()
        .success();
    assert_eq!(create_task(&tmp, "Landing page", &[]), "WEB-1");
}

#[test]
fn create_rejects_blank_title() {
    let tmp = init_project();
    tack(&tmp).args(["create", "   "]).assert().failure();
    assert!(list_ids(&tmp, &[]).is_empty());
}

// ---------------------------------------------------------------------------
// Board, move and columns
// ---------------------------------------------------------------------------

#[test]
fn board_shows_columns_and_cards() {
    let tmp = init_project();
    create_task(&tmp, "Write docs", &[]);
    tack(&tmp)
        .args(["board"])
        .assert()
        .success()
        .stdout(predicate::str::contains("To Do (1)"))
        .stdout(predicate::str::contains("In Progress (0)"))
        .stdout(predicate::str::contains("Write docs"));
}

#[test]
fn move_task_between_columns() {
    let tmp = init_project();
    let id = create_task(&tmp, "Write docs", &[]);

    let moved = json(&tmp, &["move", &id, "IN_PROGRESS"]);
    assert_eq!(moved["moved"], true);
    assert_eq!(list_ids(&tmp, &["--status", "IN_PROGRESS"]), vec![id.clone()]);

    let again = json(&tmp, &["move", &id, "IN_PROGRESS"]);
    assert_eq!(again["moved"], false);

    tack(&tmp)
        .args(["move", &id, "NOWHERE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NOWHERE"));
    assert_eq!(list_ids(&tmp, &["--status", "IN_PROGRESS"]), vec![id]);
}

#[test]
fn column_add_rename_reorder_persist() {
    let tmp = init_project();

    tack(&tmp)
        .args(["column", "add", "REVIEW", "Review", "--color", "#ff00ff"])
        .assert()
        .success();
    tack(&tmp)
        .args(["column", "add", "BAD", "Bad", "--color", "pink"])
        .assert()
        .failure();
    tack(&tmp)
        .args(["column", "rename", "TODO", "Backlog"])
        .assert()
        .success();
    let layout = json(&tmp, &["column", "reorder", "REVIEW", "TODO"]);
    let ids: Vec<&str> = layout
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["REVIEW", "TODO", "IN_PROGRESS", "DONE"]);

    let board = json(&tmp, &["board"]);
    let columns = board.as_array().unwrap();
    assert_eq!(columns[0]["id"], "REVIEW");
    assert_eq!(columns[1]["name"], "Backlog");
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[test]
fn filters_combine_and_save() {
    let tmp = init_project();
    let docs = create_task(&tmp, "Write docs", &["-p", "low"]);
    let login = create_task(&tmp, "Fix login", &["-p", "high", "-a", "alice"]);
    let logout = create_task(&tmp, "Fix logout", &["-p", "high", "--due", "2000-01-01"]);

    assert_eq!(list_ids(&tmp, &["--text", "FIX"]), vec![login.clone(), logout.clone()]);
    assert_eq!(list_ids(&tmp, &["--priority", "high", "--assignee", "alice"]), vec![login.clone()]);
    assert_eq!(list_ids(&tmp, &["--due", "overdue"]), vec![logout.clone()]);
    assert_eq!(list_ids(&tmp, &["--due", "none"]).len(), 3);

    list_ids(&tmp, &["--text", "fix", "--save"]);
    assert_eq!(list_ids(&tmp, &["--saved"]), vec![login.clone(), logout]);
    assert_eq!(list_ids(&tmp, &["--saved", "--priority", "high", "--assignee", "alice"]), vec![login]);
    assert_eq!(list_ids(&tmp, &[]).len(), 3);
    assert!(list_ids(&tmp, &["--text", "docs"]).contains(&docs));
}

// ---------------------------------------------------------------------------
// Bulk actions
// ---------------------------------------------------------------------------

#[test]
fn bulk_priority_and_move() {
    let tmp = init_project();
    let a = create_task(&tmp, "A", &[]);
    let b = create_task(&tmp, "B", &[]);
    let c = create_task(&tmp, "C", &[]);

    let result = json(&tmp, &["bulk", "priority", "urgent", "--all"]);
    assert_eq!(result["count"], 3);
    assert_eq!(list_ids(&tmp, &["--priority", "urgent"]).len(), 3);

    let ids = format!("{a},{b},{a}");
    let result = json(&tmp, &["bulk", "move", "DONE", "--ids", &ids]);
    assert_eq!(result["count"], 2);
    assert_eq!(list_ids(&tmp, &["--status", "DONE"]), vec![a, b]);
    assert_eq!(list_ids(&tmp, &["--status", "TODO"]), vec![c]);
}

#[test]
fn bulk_assign_respects_filter() {
    let tmp = init_project();
    let bug = create_task(&tmp, "Crash on save", &["-t", "bug"]);
    create_task(&tmp, "Write docs", &[]);

    let result = json(&tmp, &["bulk", "assign", "bob", "--all", "--text", "crash"]);
    assert_eq!(result["count"], 1);
    assert_eq!(list_ids(&tmp, &["--assignee", "bob"]), vec![bug.clone()]);

    let result = json(&tmp, &["bulk", "assign", "--ids", &bug]);
    assert_eq!(result["count"], 1);
    assert!(list_ids(&tmp, &["--assignee", "bob"]).is_empty());
}

#[test]
fn bulk_rejects_hidden_ids() {
    let tmp = init_project();
    let a = create_task(&tmp, "Alpha", &[]);
    tack(&tmp)
        .args(["bulk", "priority", "high", "--ids", &a, "--text", "beta"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("hidden by the filter"));
    tack(&tmp)
        .args(["bulk", "priority", "high", "--ids", "T-99"])
        .assert()
        .failure();
}

#[test]
fn bulk_send_prints_to_channel() {
    let tmp = init_project();
    create_task(&tmp, "Ship it", &[]);
    tack(&tmp)
        .args(["bulk", "send", "#release", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[#release] T-1 Ship it (TODO)"));
    tack(&tmp)
        .args(["bulk", "send", " ", "--all"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not send").or(predicate::str::contains("empty")));
}

// ---------------------------------------------------------------------------
// Quick actions and context menu
// ---------------------------------------------------------------------------

#[test]
fn quick_actions_update_fields() {
    let tmp = init_project();
    let id = create_task(&tmp, "Write docs", &[]);

    let result = json(&tmp, &["quick", &id, "m", "alice"]);
    assert_eq!(result["task"]["assignee_id"], "alice");
    assert_eq!(result["action"], "assign");

    let result = json(&tmp, &["quick", &id, "d", "2030-01-15"]);
    assert_eq!(result["task"]["due_date"], "2030-01-15");

    let result = json(&tmp, &["quick", &id, "t", "docs, web"]);
    assert_eq!(result["task"]["tags"], serde_json::json!(["docs", "web"]));

    let result = json(&tmp, &["quick", &id, "m", "none"]);
    assert!(result["task"].get("assignee_id").is_none());
}

#[test]
fn quick_rejects_bad_input() {
    let tmp = init_project();
    let id = create_task(&tmp, "Write docs", &[]);
    tack(&tmp)
        .args(["quick", &id, "x", "value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown shortcut"));
    tack(&tmp)
        .args(["quick", &id, "d", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
    tack(&tmp).args(["quick", "T-42", "m", "bob"]).assert().failure();
}

#[test]
fn toggle_type_and_delete() {
    let tmp = init_project();
    let id = create_task(&tmp, "Crash", &[]);

    assert_eq!(json(&tmp, &["toggle-type", &id])["type"], "BUG");
    assert_eq!(json(&tmp, &["toggle-type", &id])["type"], "TASK");

    tack(&tmp)
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Deleted {id}")));
    assert!(list_ids(&tmp, &[]).is_empty());
    tack(&tmp).args(["show", &id]).assert().failure();
}

#[test]
fn show_prints_details() {
    let tmp = init_project();
    let id = create_task(&tmp, "Write docs", &["-d", "All of them", "-a", "carol"]);
    tack(&tmp)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Column:   To Do (TODO)"))
        .stdout(predicate::str::contains("Assignee: carol"))
        .stdout(predicate::str::contains("All of them"));

    let detail = json(&tmp, &["show", &id]);
    assert_eq!(detail["column"], "To Do");
    assert_eq!(detail["tracked_secs"], 0);
}

// ---------------------------------------------------------------------------
// Timers
// ---------------------------------------------------------------------------

#[test]
fn timer_start_stop() {
    let tmp = init_project();
    let id = create_task(&tmp, "Write docs", &[]);

    assert_eq!(json(&tmp, &["timer", "start", &id])["running"], true);
    tack(&tmp)
        .args(["timer", "start", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("already running"));
    assert_eq!(json(&tmp, &["timer", "stop", &id])["running"], false);
    assert_eq!(json(&tmp, &["timer", "show", &id])["running"], false);
    tack(&tmp).args(["timer", "start", "T-77"]).assert().failure();
}

#[test]
fn deleted_task_id_and_timer_are_not_reused() {
    let tmp = init_project();
    create_task(&tmp, "First", &[]);
    let second = create_task(&tmp, "Second", &[]);
    json(&tmp, &["timer", "start", &second]);
    tack(&tmp).args(["delete", &second]).assert().success();

    let third = create_task(&tmp, "Third", &[]);
    assert_eq!(second, "T-2");
    assert_eq!(third, "T-3");
    assert_eq!(json(&tmp, &["timer", "show", &third])["running"], false);
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

#[test]
fn json_errors_go_to_stderr() {
    let tmp = init_project();
    let output = tack(&tmp).args(["show", "T-404", "--json"]).output().unwrap();
    assert!(!output.status.success());
    let err: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert!(err["error"].as_str().unwrap().contains("T-404"));
}

#[test]
fn dir_flag_targets_another_board() {
    let tmp = init_project();
    let elsewhere = TempDir::new().unwrap();
    let dir = tmp.path().to_str().unwrap();
    tack(&elsewhere)
        .args(["--dir", dir, "create", "Remote", "--quiet"])
        .assert()
        .success();
    assert_eq!(list_ids(&tmp, &[]), vec!["T-1".to_string()]);
}

#[test]
fn completion_generates_script() {
    let tmp = TempDir::new().unwrap();
    tack(&tmp)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tack"));
}
