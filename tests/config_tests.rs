//! Configuration system tests
//!
//! Tests settings file loading, validation, and environment overrides
//! through the binary.

mod common;

use std::fs;

use predicates::prelude::*;

use common::TestWorkspace;

// ─────────────────────────────────────────────────────────────────
// Valid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_settings_file_in_working_directory() {
    let ws = TestWorkspace::new();
    ws.write_file(
        "bootloader.toml",
        r#"
[paths]
proposal_file = "review/PROPOSAL.md"
"#,
    );

    ws.scan();

    assert!(ws.repo_path().join("review/PROPOSAL.md").exists());
    assert!(!ws.proposal_path().exists());
}

#[test]
fn test_explicit_config_flag() {
    let ws = TestWorkspace::new();
    let config = ws.write_file(
        "settings/custom.toml",
        r#"
[paths]
templates_dir = "my-templates"
personalize_file = "my-templates/personalize.md"

[logging]
level = "debug"
"#,
    );

    ws.cmd()
        .arg("--config")
        .arg(&config)
        .arg("--scan")
        .assert()
        .success();

    assert!(ws.repo_path().join("my-templates/personalize.md").exists());
}

#[test]
fn test_cli_flag_beats_settings_file() {
    let ws = TestWorkspace::new();
    let other = tempfile::TempDir::new().unwrap();
    ws.write_file(
        "bootloader.toml",
        &format!("[paths]\nworkspace_root = \"{}\"\n", other.path().display()),
    );

    // cmd() passes --workspace-root for the fixture workspace
    ws.scan();

    let proposal = fs::read_to_string(ws.proposal_path()).unwrap();
    assert!(proposal.contains(&ws.default_docs().display().to_string()));
}

#[test]
fn test_on_disk_template_takes_precedence() {
    let ws = TestWorkspace::new();
    ws.write_file(
        "templates/routing-contract.md",
        "Custom contract for {{operator_name}}.\n",
    );
    ws.scan();
    ws.write_personalize("operator_name: Atlas\napprove_install: true\n");

    ws.cmd().arg("--apply").arg("--dry-run").assert().success();

    let contract =
        fs::read_to_string(ws.default_docs().join("persona-routing-contract.md")).unwrap();
    assert_eq!(contract, "Custom contract for Atlas.\n");
}

// ─────────────────────────────────────────────────────────────────
// Invalid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_missing_explicit_config() {
    let ws = TestWorkspace::new();
    ws.cmd()
        .arg("--config")
        .arg("/nonexistent/bootloader.toml")
        .arg("--scan")
        .assert()
        .code(10)
        .stderr(predicate::str::contains("E100"));
}

#[test]
fn test_malformed_toml() {
    let ws = TestWorkspace::new();
    ws.write_file("bootloader.toml", "[paths\nrepo_root = ");

    ws.cmd()
        .arg("--scan")
        .assert()
        .code(10)
        .stderr(predicate::str::contains("E101"));
}

#[test]
fn test_invalid_base_url() {
    let ws = TestWorkspace::new();
    ws.write_file("bootloader.toml", "[remote]\nbase_url = \"ftp://example.com\"\n");

    ws.cmd()
        .arg("--scan")
        .assert()
        .code(10)
        .stderr(predicate::str::contains("E102"));
}

#[test]
fn test_invalid_mode_in_settings() {
    let ws = TestWorkspace::new();
    ws.write_file("bootloader.toml", "[remote]\nmode = \"telepathy\"\n");

    ws.cmd().arg("--scan").assert().code(10);
}

#[test]
fn test_invalid_log_level_from_env() {
    let ws = TestWorkspace::new();
    ws.cmd()
        .env("BOOTLOADER_LOG_LEVEL", "shouty")
        .arg("--scan")
        .assert()
        .code(10)
        .stderr(predicate::str::contains("level"));
}
