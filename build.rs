//! Build script for the persona bootloader
//!
//! Embeds build-time information into the binary:
//! - Git commit hash
//! - Build timestamp
//! - Target triple and profile

use std::env;
use std::process::Command;

fn main() {
    // Rerun if git HEAD or the bundled templates change
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=templates");

    let git_hash = get_git_hash();
    let git_dirty = is_git_dirty();

    let build_timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=BOOTLOADER_GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=BOOTLOADER_GIT_DIRTY={}", git_dirty);
    println!("cargo:rustc-env=BOOTLOADER_BUILD_TIMESTAMP={}", build_timestamp);
    println!("cargo:rustc-env=BOOTLOADER_TARGET={}", target);
    println!("cargo:rustc-env=BOOTLOADER_PROFILE={}", profile);
}

/// Get the current git commit hash (short form)
fn get_git_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout).ok()
            } else {
                None
            }
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Check if the git working directory is dirty
fn is_git_dirty() -> &'static str {
    Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .map(|output| {
            if output.status.success() && !output.stdout.is_empty() {
                "true"
            } else {
                "false"
            }
        })
        .unwrap_or("false")
}
