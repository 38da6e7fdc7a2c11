//! Persona bootloader
//!
//! Installs a set of seven personas and their routing rules in two steps:
//! `--scan` proposes where files go and writes a proposal for review;
//! `--apply` renders the personalized templates and installs them once the
//! personalization document approves it.

mod cli;
mod config;
mod document;
mod error;
mod installer;
mod logging;
mod persona;
mod personalize;
mod pipeline;
mod proposal;
mod version;
mod workspace;

use clap::Parser;
use tracing::info;

use crate::cli::{Action, Cli, GUIDANCE};
use crate::config::BootloaderConfig;
use crate::error::{Error, Result};
use crate::pipeline::{ApplyPlan, ApplyReport, ScanReport};

/// Exit status when no action flag is given
const EXIT_NO_ACTION: i32 = 2;

fn main() {
    let cli = Cli::parse();

    let Some(action) = cli.action() else {
        eprintln!("{}", GUIDANCE);
        std::process::exit(EXIT_NO_ACTION);
    };

    if let Err(e) = run(&cli, action) {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &Cli, action: Action) -> Result<()> {
    let config = load_config(cli)?;

    // The guards must be kept alive until the process exits
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = version::build_info();
    info!(
        binary = build.name,
        version = %build.full_version(),
        target = %build.target,
        profile = %build.profile,
        "Starting persona bootloader"
    );

    match action {
        Action::Scan => {
            let report = pipeline::run_scan(&config)?;
            print_scan_report(&report);
        }
        Action::Apply { dry_run } => {
            let report = run_apply(&config, dry_run)?;
            print_apply_report(&report, dry_run);
        }
    }

    Ok(())
}

/// Settings file and environment, then command-line overrides on top.
fn load_config(cli: &Cli) -> Result<BootloaderConfig> {
    let mut config = BootloaderConfig::load(cli.config.as_deref())?;

    if let Some(root) = &cli.repo_root {
        config.paths.repo_root = root.clone();
    }
    if let Some(root) = &cli.workspace_root {
        config.paths.workspace_root = root.clone();
    }
    if let Some(mode) = cli.mode {
        config.remote.mode = mode;
    }

    Ok(config)
}

fn run_apply(config: &BootloaderConfig, dry_run: bool) -> Result<ApplyReport> {
    let plan = ApplyPlan::prepare(config)?;
    let installer = installer::create_installer(&config.remote, dry_run)?;

    info!(
        mode = %config.remote.mode,
        installer = installer.name(),
        "Applying install"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create runtime: {}", e)))?;

    runtime.block_on(plan.execute(installer.as_ref()))
}

fn print_scan_report(report: &ScanReport) {
    println!("Wrote {}", report.proposal_path.display());
    println!(
        "  documents_system_path: {}",
        report.mapping.documents_system_path.display()
    );
    println!(
        "  learning_ledger_path:  {}",
        report.mapping.learning_ledger_path.display()
    );
    if report.candidates.len() > 1 {
        println!("  ({} candidate directories found, using the first)", report.candidates.len());
    }
    if let Some(path) = &report.seeded_personalize {
        println!("Created {}", path.display());
    }
    println!();
    println!("Review it and update templates/personalize.md, then run --apply.");
}

fn print_apply_report(report: &ApplyReport, dry_run: bool) {
    println!("Wrote {}", report.routing_contract_path.display());
    if report.ledger_created {
        println!("Created {}", report.learning_ledger_path.display());
    }
    println!(
        "Installed {} personas and {} rules via {}",
        report.summary.personas.len(),
        report.summary.rules.len(),
        report.installer
    );
    for record in report.summary.personas.iter().chain(&report.summary.rules) {
        match &record.id {
            Some(id) => println!("  {} ({})", record.name, id),
            None => println!("  {}", record.name),
        }
    }
    if dry_run {
        println!("Dry run: nothing was sent to the persona service.");
    } else {
        println!("Install complete.");
    }
}
