use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;

fn run(state: &Path, args: &[&str]) -> (bool, Value) {
    let (code, json) = run_with_code(state, args);
    (code == Some(0), json)
}

fn run_with_code(state: &Path, args: &[&str]) -> (Option<i32>, Value) {
    let output = cargo_bin_cmd!("btree-cli")
        .env_remove("BTREE_STATE_FILE")
        .env_remove("BTREE_PRETTY")
        .env_remove("RUST_LOG")
        .arg("--state")
        .arg(state)
        .args(args)
        .output()
        .expect("run btree-cli");
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    let json: Value = serde_json::from_str(stdout.trim()).expect("json envelope");
    (output.status.code(), json)
}

#[test]
fn test_commands_share_state_through_file() {
    let dir = TempDir::new().expect("tempdir");
    let state = dir.path().join("tree.json");

    let (ok, json) = run(&state, &["init", "2"]);
    assert!(ok);
    assert_eq!(json["message"], "B-tree initialized with minimum degree 2");
    assert_eq!(json["data"]["snapshot"]["tree"]["leaf"], true);

    for key in ["10", "20", "5", "6", "12", "30", "7", "17"] {
        let (ok, json) = run(&state, &["insert", key]);
        assert!(ok, "{json}");
    }

    let (ok, json) = run(&state, &["traverse"]);
    assert!(ok);
    assert_eq!(json["data"]["keys"], serde_json::json!([5, 6, 7, 10, 12, 17, 20, 30]));

    let saved: Value = serde_json::from_str(&fs::read_to_string(&state).unwrap()).unwrap();
    assert_eq!(saved["degree"], 2);
    assert_eq!(saved["tree"]["keys"], serde_json::json!([10, 20]));
}

#[test]
fn test_failures_exit_with_status_one() {
    let dir = TempDir::new().expect("tempdir");
    let state = dir.path().join("tree.json");

    let (ok, json) = run(&state, &["insert", "1"]);
    assert!(!ok);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "not_initialized");
    assert!(!state.exists());

    run(&state, &["init", "3"]);
    run(&state, &["insert", "-4"]);
    let (ok, json) = run(&state, &["insert", "-4"]);
    assert!(!ok);
    assert_eq!(json["error"], "duplicate_key");

    let (ok, json) = run(&state, &["delete", "99"]);
    assert!(!ok);
    assert_eq!(json["error"], "key_not_found");
}

#[test]
fn test_search_reports_not_found_as_success() {
    let dir = TempDir::new().expect("tempdir");
    let state = dir.path().join("tree.json");
    run(&state, &["init", "2"]);
    run(&state, &["insert", "3"]);

    let (ok, json) = run(&state, &["search", "4"]);
    assert!(ok);
    assert_eq!(json["message"], "Not found: 4");
    assert_eq!(json["data"]["found"], false);

    let (ok, json) = run(&state, &["search", "3"]);
    assert!(ok);
    assert_eq!(json["data"]["found"], true);
    assert_eq!(json["data"]["path"][0]["keys"], serde_json::json!([3]));
}

#[test]
fn test_corrupted_state_file_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let state = dir.path().join("tree.json");
    fs::write(
        &state,
        r#"{"degree":2,"tree":{"keys":[3,1],"leaf":true}}"#,
    )
    .unwrap();

    let (code, json) = run_with_code(&state, &["traverse"]);
    assert_eq!(code, Some(1));
    assert_eq!(json["error"], "corrupted_snapshot");

    fs::write(
        &state,
        r#"{"degree":18446744073709551615,"tree":{"keys":[],"leaf":true}}"#,
    )
    .unwrap();
    let (code, json) = run_with_code(&state, &["traverse"]);
    assert_eq!(code, Some(1));
    assert_eq!(json["error"], "corrupted_snapshot");
}

#[test]
fn test_show_prints_structure() {
    let dir = TempDir::new().expect("tempdir");
    let state = dir.path().join("tree.json");
    run(&state, &["init", "2"]);
    for key in ["1", "2", "3", "4"] {
        run(&state, &["insert", key]);
    }

    let (ok, json) = run(&state, &["show"]);
    assert!(ok);
    assert_eq!(json["message"], "Current tree structure (height 2)");
    assert_eq!(json["data"]["kind"], "levels");
    assert_eq!(json["data"]["height"], 2);
    assert_eq!(json["data"]["levels"], serde_json::json!([[[2]], [[1], [3, 4]]]));
    assert_eq!(json["data"]["snapshot"]["tree"]["keys"], serde_json::json!([2]));
}

#[test]
fn test_malformed_arguments_return_envelopes() {
    let dir = TempDir::new().expect("tempdir");
    let state = dir.path().join("tree.json");
    run(&state, &["init", "2"]);

    for args in [
        ["insert", "abc"],
        ["insert", "99999999999999999999"],
        ["search", "1.5"],
        ["delete", "1e3"],
        ["init", "two"],
    ] {
        let (code, json) = run_with_code(&state, &args);
        assert_eq!(code, Some(1), "{args:?}");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "invalid_argument", "{args:?}");
    }

    let (code, json) = run_with_code(&state, &["init", "1"]);
    assert_eq!(code, Some(1));
    assert_eq!(json["error"], "invalid_degree");

    let (ok, json) = run(&state, &["insert", "-7"]);
    assert!(ok, "{json}");
}

#[test]
fn test_huge_degree_is_accepted() {
    let dir = TempDir::new().expect("tempdir");
    let state = dir.path().join("tree.json");

    let (ok, json) = run(&state, &["init", "4611686018427387903"]);
    assert!(ok, "{json}");
    for key in ["3", "1", "2"] {
        let (ok, json) = run(&state, &["insert", key]);
        assert!(ok, "{json}");
    }
    let (ok, json) = run(&state, &["traverse"]);
    assert!(ok);
    assert_eq!(json["data"]["keys"], serde_json::json!([1, 2, 3]));
}

#[test]
fn test_repl_prints_one_envelope_per_line() {
    let dir = TempDir::new().expect("tempdir");
    let state = dir.path().join("tree.json");

    let output = cargo_bin_cmd!("btree-cli")
        .env_remove("RUST_LOG")
        .arg("--state")
        .arg(&state)
        .arg("repl")
        .write_stdin("init 2\ninsert 5\n\ninsert x\nsearch 5\ntraverse\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[2]["error"], "invalid_argument");
    assert_eq!(lines[3]["data"]["found"], true);
    assert_eq!(lines[4]["data"]["keys"], serde_json::json!([5]));

    let saved = fs::read_to_string(&state).unwrap();
    assert!(saved.contains("\"degree\": 2"));
}

#[test]
fn test_repl_exit_status_follows_last_line() {
    let dir = TempDir::new().expect("tempdir");
    let state = dir.path().join("tree.json");

    let assert = cargo_bin_cmd!("btree-cli")
        .env_remove("RUST_LOG")
        .arg("--state")
        .arg(&state)
        .arg("repl")
        .write_stdin("init 2\ninsert 1\ndelete 9\n")
        .assert()
        .code(1);
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let last: Value = serde_json::from_str(stdout.lines().last().unwrap()).unwrap();
    assert_eq!(last["error"], "key_not_found");

    cargo_bin_cmd!("btree-cli")
        .env_remove("RUST_LOG")
        .arg("--state")
        .arg(&state)
        .arg("repl")
        .write_stdin("insert x\nshow\n")
        .assert()
        .success();
}
