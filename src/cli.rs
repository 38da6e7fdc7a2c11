//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the persona bootloader.

use clap::{ArgGroup, Parser};

use crate::config::InstallMode;

/// Persona bootloader - install a persona set in two reviewed steps
///
/// Run --scan to write INSTALL_PROPOSAL.md, review it, edit
/// templates/personalize.md and set approve_install: true, then run --apply.
#[derive(Parser, Debug)]
#[command(name = "persona-bootloader")]
#[command(author, version, about, long_about = None)]
#[command(long_version = crate::version::long_version())]
#[command(group(ArgGroup::new("action").args(["scan", "apply"])))]
pub struct Cli {
    /// Scan the workspace and write the install proposal
    #[arg(long)]
    pub scan: bool,

    /// Install personas and rules (requires approve_install: true)
    #[arg(long)]
    pub apply: bool,

    /// Render and write local files but install nothing remotely (with --apply)
    #[arg(long, conflicts_with = "scan")]
    pub dry_run: bool,

    /// Install strategy: direct or delegated
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<InstallMode>,

    /// Path to configuration file
    #[arg(short, long, env = "BOOTLOADER_CONFIG")]
    pub config: Option<String>,

    /// Directory holding templates/ and INSTALL_PROPOSAL.md
    #[arg(long, env = "BOOTLOADER_REPO_ROOT")]
    pub repo_root: Option<String>,

    /// Directory the workspace scan walks
    #[arg(long, env = "BOOTLOADER_WORKSPACE_ROOT")]
    pub workspace_root: Option<String>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// What the invocation asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Scan,
    Apply { dry_run: bool },
}

impl Cli {
    /// `None` when neither --scan nor --apply was given.
    pub fn action(&self) -> Option<Action> {
        if self.apply {
            Some(Action::Apply {
                dry_run: self.dry_run,
            })
        } else if self.scan {
            Some(Action::Scan)
        } else {
            None
        }
    }
}

fn parse_mode(s: &str) -> Result<InstallMode, String> {
    s.parse()
}

/// Printed when no action flag is given.
pub const GUIDANCE: &str = "\
Nothing to do. Choose one step:
  persona-bootloader --scan     scan the workspace and write INSTALL_PROPOSAL.md
  persona-bootloader --apply    install after setting approve_install: true in templates/personalize.md

Run with --help for all options.";
