//! CLI end-to-end tests that run the binary against the shared fixture schemas.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../tests/schemas");

#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin("schema-refsync").expect("binary should exist")
}

fn copy_fixture(dir: &TempDir, name: &str) -> PathBuf {
    let dest = dir.path().join(name);
    fs::copy(Path::new(FIXTURES_DIR).join(name), &dest)
        .unwrap_or_else(|e| panic!("Fixture {name} missing: {e}"));
    dest
}

// ── E2E: Sync fixtures ──────────────────────────────────────────────────────

#[test]
fn test_cli_e2e_sync_fixtures() {
    let dir = TempDir::new().unwrap();
    let derived = copy_fixture(&dir, "derived.json");
    let base = format!("{FIXTURES_DIR}/base.json");

    cmd()
        .args([derived.to_str().unwrap(), &base])
        .assert()
        .success()
        .stdout(
            "Updating $ref for key: Identifier -> common.schema.json#/$defs/Identifier\n\
             Updating $ref for key: Identifier -> common.schema.json#/$defs/Identifier\n\
             Updating $ref for key: Timestamp -> common.schema.json#/$defs/Timestamp\n\
             Updating $ref for key: Timestamp -> common.schema.json#/$defs/Timestamp\n",
        );

    let content = fs::read_to_string(&derived).unwrap();
    let data: serde_json::Value = serde_json::from_str(&content).expect("valid JSON");
    assert_eq!(
        data["$defs"]["Record"]["properties"]["Identifier"]["$ref"],
        serde_json::json!("common.schema.json#/$defs/Identifier")
    );
    assert!(data["$defs"]["Quantity"].get("$ref").is_none());
}

// ── E2E: Second run is stable ───────────────────────────────────────────────

#[test]
fn test_cli_e2e_rerun_is_stable() {
    let dir = TempDir::new().unwrap();
    let derived = copy_fixture(&dir, "derived.json");
    let base = format!("{FIXTURES_DIR}/base.json");

    cmd()
        .args([derived.to_str().unwrap(), &base])
        .assert()
        .success();
    let first = fs::read_to_string(&derived).unwrap();

    cmd()
        .args([derived.to_str().unwrap(), &base])
        .assert()
        .success();
    let second = fs::read_to_string(&derived).unwrap();

    assert_eq!(first, second);
}

// ── E2E: Verbose logging stays on stderr ────────────────────────────────────

#[test]
fn test_cli_e2e_verbose_logs_to_stderr() {
    let dir = TempDir::new().unwrap();
    let derived = copy_fixture(&dir, "derived.json");
    let base = format!("{FIXTURES_DIR}/base.json");

    cmd()
        .args([derived.to_str().unwrap(), &base, "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("collected base references").not())
        .stderr(predicate::str::contains("collected base references"));
}

// ── E2E: Fixture without $defs ──────────────────────────────────────────────

#[test]
fn test_cli_e2e_no_defs_fixture() {
    let dir = TempDir::new().unwrap();
    let derived = copy_fixture(&dir, "no_defs.json");
    let base = format!("{FIXTURES_DIR}/base.json");
    let before = fs::read_to_string(&derived).unwrap();

    cmd()
        .args([derived.to_str().unwrap(), &base])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error extracting keys"));

    assert_eq!(fs::read_to_string(&derived).unwrap(), before);
}
