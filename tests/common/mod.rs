//! Common test utilities and fixtures
//!
//! Every test gets its own repository root, workspace root and home
//! directory so no settings file or credential leaks in from the host.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Credential variable used by tests instead of the real one.
pub const TEST_TOKEN_ENV: &str = "BOOTLOADER_TEST_TOKEN";

const CLEARED_VARS: [&str; 12] = [
    "BOOTLOADER_CONFIG",
    "BOOTLOADER_REPO_ROOT",
    "BOOTLOADER_WORKSPACE_ROOT",
    "BOOTLOADER_TEMPLATES_DIR",
    "BOOTLOADER_MODE",
    "BOOTLOADER_BASE_URL",
    "BOOTLOADER_TOKEN_ENV",
    "BOOTLOADER_TIMEOUT_SECS",
    "BOOTLOADER_LOG_LEVEL",
    "BOOTLOADER_LOG_FILE",
    "BOOTLOADER_LOG_JSON",
    "ZO_CLIENT_IDENTITY_TOKEN",
];

pub struct TestWorkspace {
    pub repo: TempDir,
    pub workspace: TempDir,
    pub home: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            repo: TempDir::new().unwrap(),
            workspace: TempDir::new().unwrap(),
            home: TempDir::new().unwrap(),
        }
    }

    pub fn repo_path(&self) -> &Path {
        self.repo.path()
    }

    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    pub fn proposal_path(&self) -> PathBuf {
        self.repo.path().join("INSTALL_PROPOSAL.md")
    }

    pub fn personalize_path(&self) -> PathBuf {
        self.repo.path().join("templates").join("personalize.md")
    }

    /// `<workspace>/Documents/System`, where an empty workspace maps to.
    pub fn default_docs(&self) -> PathBuf {
        self.workspace.path().join("Documents").join("System")
    }

    pub fn write_personalize(&self, text: &str) {
        let path = self.personalize_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    pub fn write_file(&self, rel: &str, text: &str) -> PathBuf {
        let path = self.repo.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    /// The binary, isolated from the host environment, pointed at this fixture.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("persona-bootloader").unwrap();
        for var in CLEARED_VARS {
            cmd.env_remove(var);
        }
        cmd.env_remove(TEST_TOKEN_ENV)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env("BOOTLOADER_TOKEN_ENV", TEST_TOKEN_ENV)
            .current_dir(self.repo.path())
            .arg("--repo-root")
            .arg(self.repo.path())
            .arg("--workspace-root")
            .arg(self.workspace.path());
        cmd
    }

    /// Run --scan and assert it succeeded.
    pub fn scan(&self) {
        self.cmd().arg("--scan").assert().success();
    }
}
