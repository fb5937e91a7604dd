//! Integration tests for mernkit-cli.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `mernkit` invocation isolated from the user's home and config.
fn mernkit(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mernkit").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("NO_COLOR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    mernkit(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("MERN"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    mernkit(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_new_command_help() {
    let temp = TempDir::new().unwrap();
    mernkit(temp.path())
        .args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bundler"))
        .stdout(predicate::str::contains("--orm"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_new_project_dry_run() {
    let temp = TempDir::new().unwrap();

    mernkit(temp.path())
        .args([
            "new",
            "shop",
            "--orm",
            "mongoose",
            "--css",
            "tailwind",
            "--testing",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("npm install mongoose"))
        .stdout(predicate::str::contains("backend/node_modules"));

    assert!(!temp.path().join("shop").exists());
}

#[test]
fn test_dry_run_json_is_a_single_document() {
    let temp = TempDir::new().unwrap();

    let assert = mernkit(temp.path())
        .args([
            "--output-format",
            "json",
            "new",
            "shop",
            "--bundler",
            "webpack",
            "--orm",
            "sequelize",
            "--dry-run",
        ])
        .assert()
        .success();

    let doc: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(doc["dry_run"], true);
    assert_eq!(doc["project"]["bundler"], "webpack");
    assert_eq!(doc["project"]["orm"], "sequelize");
    assert!(doc["plan"]["steps"].as_array().unwrap().len() > 10);
    assert!(!temp.path().join("shop").exists());
}

#[test]
fn test_defaults_come_from_environment() {
    let temp = TempDir::new().unwrap();

    mernkit(temp.path())
        .env("MERNKIT_DEFAULTS__BUNDLER", "webpack")
        .args(["config", "get", "defaults.bundler"])
        .assert()
        .success()
        .stdout(predicate::str::contains("defaults.bundler = webpack"));
}

#[test]
fn test_init_local_then_config_path() {
    let temp = TempDir::new().unwrap();

    mernkit(temp.path())
        .args(["init", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration created"));
    assert!(temp.path().join("mernkit.toml").is_file());

    mernkit(temp.path())
        .args(["init", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    mernkit(temp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mernkit.toml"));
}

#[test]
fn test_local_config_sets_defaults() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("mernkit.toml"),
        "[defaults]\norm = \"sequelize\"\n",
    )
    .unwrap();

    mernkit(temp.path())
        .args(["new", "blog", "--yes", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("npm install sequelize pg pg-hstore"));
}

#[test]
fn test_config_list() {
    let temp = TempDir::new().unwrap();
    mernkit(temp.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[rollback]"))
        .stdout(predicate::str::contains("max_attempts = 3"));
}

#[test]
fn test_completions() {
    let temp = TempDir::new().unwrap();
    mernkit(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mernkit"));
}

#[test]
fn test_log_file_receives_json_lines() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("logs/mernkit.log");

    mernkit(temp.path())
        .args(["-v", "new", "shop", "--dry-run", "--log-file"])
        .arg(&log)
        .assert()
        .success();

    let text = std::fs::read_to_string(&log).unwrap();
    assert!(text.lines().any(|l| l.starts_with('{')));
}

/// With no `sh` on PATH the first external command cannot start, so every
/// directory created before it must be rolled back.
#[cfg(unix)]
#[test]
fn test_failed_provisioning_rolls_back() {
    let temp = TempDir::new().unwrap();
    let empty_path = TempDir::new().unwrap();

    mernkit(temp.path())
        .env("PATH", empty_path.path())
        .env("MERNKIT_ROLLBACK__SETTLE_MS", "0")
        .env("MERNKIT_ROLLBACK__BACKOFF_MS", "0")
        .args(["new", "shop", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to start"))
        .stderr(predicate::str::contains("Rolled back"));

    assert!(!temp.path().join("shop").exists());
}

#[cfg(unix)]
#[test]
fn test_failed_provisioning_json_report() {
    let temp = TempDir::new().unwrap();
    let empty_path = TempDir::new().unwrap();

    let assert = mernkit(temp.path())
        .env("PATH", empty_path.path())
        .env("MERNKIT_ROLLBACK__SETTLE_MS", "0")
        .args(["--output-format", "json", "new", "shop", "--yes"])
        .assert()
        .code(1);

    let doc: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(doc["rolled_back"], true);
    assert!(doc["report"]["failed"].as_array().unwrap().is_empty());
    assert!(!doc["report"]["removed"].as_array().unwrap().is_empty());
}
