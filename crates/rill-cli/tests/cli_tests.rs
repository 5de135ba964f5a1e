//! End-to-end tests for the `rill` binary
//!
//! These tests verify the full pipeline for `rill run`:
//! - Successful execution paths
//! - Exit codes for static (65) and runtime (70) errors
//! - Diagnostic output formatting (human-readable and JSON)
//! - Help messages and aliases

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn rill_cmd() -> Command {
    Command::cargo_bin("rill").unwrap()
}

/// Create a temporary directory with a test file
fn create_test_file(content: &str) -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.rill");
    fs::write(&file_path, content).unwrap();
    (temp_dir, file_path.to_str().unwrap().to_string())
}

// ============================================================================
// rill run - Success Cases
// ============================================================================

#[test]
fn test_run_prints_output() {
    let (_dir, path) = create_test_file(r#"print "hello world";"#);

    rill_cmd()
        .arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout("hello world\n");
}

#[test]
fn test_run_arithmetic() {
    let (_dir, path) = create_test_file("print 1 + 2 * 3;");

    rill_cmd()
        .arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout("7\n");
}

#[test]
fn test_run_whole_numbers_print_without_decimal() {
    let (_dir, path) = create_test_file("print 8 / 2; print 7 / 2;");

    rill_cmd()
        .arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout("4\n3.5\n");
}

#[test]
fn test_run_class_program() {
    let (_dir, path) = create_test_file(
        r#"
        class Greeter {
            init(name) { this.name = name; }
            greet() { print "hi, " + this.name; }
        }
        Greeter("cli").greet();
        "#,
    );

    rill_cmd()
        .arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout("hi, cli\n");
}

#[test]
fn test_run_alias() {
    let (_dir, path) = create_test_file("print 1;");

    rill_cmd().arg("r").arg(&path).assert().success().stdout("1\n");
}

// ============================================================================
// rill run - Exit Codes
// ============================================================================

#[test]
fn test_static_error_exits_65() {
    let (_dir, path) = create_test_file("return 1;");

    rill_cmd()
        .arg("run")
        .arg(&path)
        .assert()
        .code(65)
        .stderr(predicate::str::contains("RL0303"));
}

#[test]
fn test_parse_error_exits_65() {
    let (_dir, path) = create_test_file("var = 1;");

    rill_cmd()
        .arg("run")
        .arg(&path)
        .assert()
        .code(65)
        .stderr(predicate::str::contains("RL0201"));
}

#[test]
fn test_runtime_error_exits_70() {
    let (_dir, path) = create_test_file("print missing;");

    rill_cmd()
        .arg("run")
        .arg(&path)
        .assert()
        .code(70)
        .stderr(predicate::str::contains("RL0402"))
        .stderr(predicate::str::contains("missing"));
}

#[test]
fn test_output_before_runtime_error_is_kept() {
    let (_dir, path) = create_test_file(r#"print "before"; nil();"#);

    rill_cmd()
        .arg("run")
        .arg(&path)
        .assert()
        .code(70)
        .stdout("before\n")
        .stderr(predicate::str::contains("RL0404"));
}

#[test]
fn test_warnings_do_not_block_execution() {
    let (_dir, path) = create_test_file(r#"{ var unused = 1; } print "ran";"#);

    rill_cmd()
        .arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout("ran\n")
        .stderr(predicate::str::contains("RL0390"));
}

#[test]
fn test_missing_file_fails() {
    rill_cmd()
        .arg("run")
        .arg("no_such_file.rill")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no_such_file.rill"));
}

// ============================================================================
// JSON Output
// ============================================================================

#[test]
fn test_json_flag_emits_machine_readable_diagnostics() {
    let (_dir, path) = create_test_file("break;");

    let output = rill_cmd()
        .arg("run")
        .arg(&path)
        .arg("--json")
        .assert()
        .code(65)
        .get_output()
        .clone();

    let stderr = String::from_utf8(output.stderr).unwrap();
    let line = stderr.lines().next().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(parsed["code"], "RL0305");
    assert_eq!(parsed["level"], "error");
    assert_eq!(parsed["line"], 1);
}

#[test]
fn test_json_via_environment_variable() {
    let (_dir, path) = create_test_file("print ghost;");

    let output = rill_cmd()
        .arg("run")
        .arg(&path)
        .env("RILL_JSON", "1")
        .assert()
        .code(70)
        .get_output()
        .clone();

    let stderr = String::from_utf8(output.stderr).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(stderr.lines().next().unwrap()).unwrap();
    assert_eq!(parsed["code"], "RL0402");
}

// ============================================================================
// Help Messages
// ============================================================================

#[test]
fn test_main_help_shows_commands() {
    rill_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("repl"));
}

#[test]
fn test_run_help_mentions_json() {
    rill_cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_version_flag() {
    rill_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rill"));
}
