//! Integration tests for configuration layering.
//!
//! Tests the full priority chain: hardcoded defaults < XDG config < project config < CLI args

#![allow(clippy::unwrap_used)] // Test code uses unwrap for brevity
#![allow(deprecated)] // cargo_bin deprecation warning

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use pairset_test_support::ScanBuilder;
use predicates::prelude::*;
use serde_json::Value;

/// Workspace with `front/` holding one document page and one faded page.
fn workspace() -> tempfile::TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    let front = temp_dir.path().join("front");
    fs::create_dir_all(&front).unwrap();
    fs::create_dir_all(temp_dir.path().join("back")).unwrap();
    ScanBuilder::save(&ScanBuilder::document_page("A.png"), &front).unwrap();
    ScanBuilder::save(&ScanBuilder::faded_page("B.png"), &front).unwrap();
    temp_dir
}

fn pairset(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pairset").unwrap();
    cmd.current_dir(cwd)
        .env("XDG_CONFIG_HOME", cwd.join("xdg"))
        .env_remove("RUST_LOG");
    cmd
}

fn write_project_config(dir: &Path, toml: &str) {
    fs::write(dir.join(".pairset.toml"), toml).unwrap();
}

fn score_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_defaults_without_config() {
    let temp_dir = workspace();

    pairset(temp_dir.path())
        .args(["score", "--front", "front"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Scored front"));

    assert!(temp_dir.path().join("quality_report.csv").is_file());
}

#[test]
fn test_project_config_applies_format() {
    let temp_dir = workspace();
    write_project_config(
        temp_dir.path(),
        r"
[output]
format = 'json'
",
    );

    pairset(temp_dir.path())
        .args(["score", "--front", "front"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_cli_overrides_project_config() {
    let temp_dir = workspace();
    write_project_config(
        temp_dir.path(),
        r"
[output]
format = 'json'
",
    );

    pairset(temp_dir.path())
        .args(["score", "--front", "front", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Scored"));
}

#[test]
fn test_project_config_found_in_parent_directory() {
    let temp_dir = workspace();
    write_project_config(
        temp_dir.path(),
        r"
[output]
format = 'json'
",
    );
    let nested = temp_dir.path().join("nested/deeper");
    fs::create_dir_all(&nested).unwrap();

    pairset(&nested)
        .args(["score", "--front", "../../front"])
        .args(["--report", "report.csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_config_paths_replace_flags() {
    let temp_dir = workspace();
    write_project_config(
        temp_dir.path(),
        r#"
[paths]
front_dir = "front"
quality_report = "reports/quality.csv"
"#,
    );

    pairset(temp_dir.path()).arg("score").assert().success();

    assert!(temp_dir.path().join("reports/quality.csv").is_file());
}

#[test]
fn test_config_preset_changes_labels() {
    let temp_dir = workspace();

    let document = score_json(
        pairset(temp_dir.path()).args(["score", "--front", "front", "--format", "json"]),
    );
    assert_eq!(document["stats"]["good"], 1);
    assert_eq!(document["stats"]["poor"], 1);

    write_project_config(
        temp_dir.path(),
        r#"
[quality]
preset = "strict"
"#,
    );
    let strict = score_json(
        pairset(temp_dir.path()).args(["score", "--front", "front", "--format", "json"]),
    );
    assert_eq!(strict["stats"]["good"], 2);
    assert_eq!(strict["stats"]["poor"], 0);
}

#[test]
fn test_config_contrast_check_disabled() {
    let temp_dir = workspace();
    write_project_config(
        temp_dir.path(),
        r"
[quality]
contrast_check = false
",
    );

    let summary = score_json(
        pairset(temp_dir.path()).args(["score", "--front", "front", "--format", "json"]),
    );
    assert_eq!(summary["stats"]["good"], 2);
}

#[test]
fn test_invalid_policy_in_config_is_fatal() {
    let temp_dir = workspace();
    write_project_config(
        temp_dir.path(),
        r#"
[split]
policy = "random"
"#,
    );

    pairset(temp_dir.path())
        .args(["score", "--front", "front"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("split.policy must be"));
    assert!(!temp_dir.path().join("quality_report.csv").exists());
}

#[test]
fn test_invalid_ratio_table_in_config_is_fatal() {
    let temp_dir = workspace();
    write_project_config(
        temp_dir.path(),
        r"
[split]
good_ratios = { train = 0.9, val = 0.2, test = 0.0 }
",
    );

    pairset(temp_dir.path())
        .args(["split", "--front", "front", "--back", "back"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("split.good_ratios"));
}

#[test]
fn test_unparsable_config_is_ignored() {
    let temp_dir = workspace();
    write_project_config(temp_dir.path(), "this is [not toml");

    pairset(temp_dir.path())
        .args(["score", "--front", "front"])
        .assert()
        .success()
        .stderr(predicate::str::contains(".pairset.toml"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_project_config_overrides_xdg_config() {
    let temp_dir = workspace();
    let xdg = temp_dir.path().join("xdg/pairset");
    fs::create_dir_all(&xdg).unwrap();
    fs::write(
        xdg.join("config.toml"),
        r#"
[output]
format = "json"

[paths]
front_dir = "front"
"#,
    )
    .unwrap();

    // XDG alone applies
    pairset(temp_dir.path())
        .arg("score")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));

    // Project config wins over XDG
    write_project_config(
        temp_dir.path(),
        r#"
[output]
format = "text"
"#,
    );
    pairset(temp_dir.path())
        .arg("score")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Scored"));
}
