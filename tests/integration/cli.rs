//! Integration tests for the `ng` binary

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn ng(args: &[&std::ffi::OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ng"))
        .args(args)
        .arg("--color=never")
        .output()
        .unwrap()
}

/// Helper function to create a test file
fn create_test_file(
    dir: &TempDir,
    name: &str,
    content: &str,
) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_check_valid_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(&temp_dir, "valid.ng", "x := 1 + 2\nprint(x)\n");
    let output = ng(&["check".as_ref(), file.as_os_str()]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("valid.ng: ok"), "{}", stderr);
}

#[test]
fn test_check_invalid_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(&temp_dir, "invalid.ng", "x := 1\nprint(unknown_var)\n");
    let output = ng(&["check".as_ref(), file.as_os_str()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("undeclared identifier: unknown_var"), "{}", stderr);
}

#[test]
fn test_check_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(&temp_dir, "bad.ng", "var a int = \"s\"\n");
    let output = ng(&["check".as_ref(), "--json".as_ref(), file.as_os_str()]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let diagnostics: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(diagnostics.as_array().is_some_and(|a| !a.is_empty()), "{}", stdout);
}

#[test]
fn test_check_cyclic_import() {
    let temp_dir = TempDir::new().unwrap();
    let a = create_test_file(&temp_dir, "a.ng", "import \"b.ng\"\n");
    create_test_file(&temp_dir, "b.ng", "import \"a.ng\"\n");
    let output = ng(&["check".as_ref(), a.as_os_str()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("package import cycle: a.ng -> b.ng -> a.ng"), "{}", stderr);
}

#[test]
fn test_tokens_command() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(&temp_dir, "t.ng", "x := 42\n");
    let output = ng(&["tokens".as_ref(), "--json".as_ref(), file.as_os_str()]);
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows[0]["line"], 1);
    assert_eq!(rows[0]["column"], 1);
    assert!(rows.iter().any(|r| r["literal"] == "42"));
}

#[test]
fn test_parse_command() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(&temp_dir, "p.ng", "func f(a int) int {\n\treturn a * 2\n}\n");
    let output = ng(&["parse".as_ref(), file.as_os_str()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("func f(a int) int"), "{}", stdout);
}

#[test]
fn test_parse_errors_fail() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(&temp_dir, "p.ng", "x := (1 +\n");
    let output = ng(&["parse".as_ref(), file.as_os_str()]);
    assert!(!output.status.success());
}

#[test]
fn test_missing_file() {
    let output = ng(&["check".as_ref(), "/nonexistent/none.ng".as_ref()]);
    assert!(!output.status.success());
}
