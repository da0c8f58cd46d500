// Command-line tests for packsel
//
// These run the built binary against catalog files in a temp directory and
// feed the interactive menu through stdin.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const CATALOG: &str = r#"{
  "packs": [
    { "id": "core", "name": "$APP Core", "size": 100, "required": true },
    { "id": "docs", "name": "Docs", "size": 20, "depends": ["core"] },
    { "id": "samples", "name": "Samples", "size": 30, "depends": ["docs"] },
    { "id": "gpu", "size": 5, "condition": "has.gpu" }
  ],
  "variables": { "APP": "Frob" }
}"#;

fn write_catalog(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, content).expect("write catalog");
    path
}

fn packsel(args: &[&str], catalog: &Path, stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_packsel"))
        .args(args)
        .arg("--catalog")
        .arg(catalog)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn packsel");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for packsel")
}

#[test]
fn test_select_interactive_session() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir, CATALOG);

    // toggle Samples, leave menu, continue
    let output = packsel(&["select"], &catalog, "3\n0\n1\n");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stdout: {}", stdout);
    assert!(stdout.contains("[Frob Core]"));
    assert!(stdout.contains("Total space required: 150 bytes"));
    assert!(stdout.contains("  samples (30 bytes)"));
    assert!(stdout.contains("Total: 150 bytes"));
    assert!(!stdout.contains("gpu"), "unmet condition must hide the pack");
}

#[test]
fn test_select_quit_fails() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir, CATALOG);

    let output = packsel(&["select"], &catalog, "0\n2\n");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Installation aborted."));
}

#[test]
fn test_select_with_condition_and_yes() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir, CATALOG);

    let output = packsel(&["select", "--condition", "has.gpu", "--yes"], &catalog, "4\n");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stdout: {}", stdout);
    assert!(stdout.contains("  gpu (5 bytes)"));
}

#[test]
fn test_resolve_json() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir, CATALOG);

    let output = packsel(&["resolve", "--json", "samples"], &catalog, "");
    assert!(output.status.success());

    let packs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = packs
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["core", "docs", "samples"]);
}

#[test]
fn test_resolve_without_required_fails() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir, CATALOG);

    let output = packsel(&["resolve", "--without", "core"], &catalog, "");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cannot leave out 'core'"));
}

#[test]
fn test_validate_reports_unknown_dependency() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(
        &dir,
        r#"{"packs": [{"id": "docs", "size": 1, "depends": ["core"]}]}"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_packsel"))
        .arg("validate")
        .arg(&catalog)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown pack 'core'"));
}

#[test]
fn test_validate_ok() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir, CATALOG);

    let output = Command::new(env!("CARGO_BIN_EXE_packsel"))
        .arg("validate")
        .arg(&catalog)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Catalog is valid: 4 packs"));
}
