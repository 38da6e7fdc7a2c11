//! The two bootloader runs.
//!
//! `--scan`: scan the workspace, propose a mapping, write the proposal.
//! `--apply`: check the proposal and approval, render everything, write the
//! routing contract and ledger, then hand the manifest to an installer.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::config::BootloaderConfig;
use crate::document::{substitute, write_document};
use crate::error::{Error, Result};
use crate::installer::{InstallSummary, Installer};
use crate::persona::{Manifest, TemplateKind, TemplateStore};
use crate::personalize::PersonalizationConfig;
use crate::proposal::{frontmatter_header, write_proposal};
use crate::workspace::{PathMapping, WorkspaceScanner};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ─────────────────────────────────────────────────────────────────
// Scan
// ─────────────────────────────────────────────────────────────────

/// What a scan did.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub proposal_path: PathBuf,
    pub mapping: PathMapping,
    pub candidates: Vec<PathBuf>,
    /// Set when the personalization document was missing and got seeded.
    pub seeded_personalize: Option<PathBuf>,
}

pub fn run_scan(config: &BootloaderConfig) -> Result<ScanReport> {
    let workspace_root = config.workspace_root();
    let scan = WorkspaceScanner::new(&workspace_root).scan();
    let mapping = PathMapping::propose(&scan, &workspace_root);
    info!(
        documents_system = %mapping.documents_system_path.display(),
        learning_ledger = %mapping.learning_ledger_path.display(),
        "Mapping proposed"
    );

    let personalize_path = config.personalize_path();
    let personalize = PersonalizationConfig::load_or_default(&personalize_path)?;
    let seeded_personalize = if personalize_path.exists() {
        None
    } else {
        let store = TemplateStore::new(config.templates_dir());
        let text = store.load(TemplateKind::Personalize)?;
        write_document(&personalize_path, &text)?;
        info!(path = %personalize_path.display(), "Personalization document seeded");
        Some(personalize_path)
    };

    let proposal_path = config.proposal_path();
    write_proposal(&proposal_path, &mapping, &personalize.persona_names(), today())?;

    Ok(ScanReport {
        proposal_path,
        mapping,
        candidates: scan.documents_system,
        seeded_personalize,
    })
}

// ─────────────────────────────────────────────────────────────────
// Apply
// ─────────────────────────────────────────────────────────────────

/// Everything an apply will write and send, computed before any side effect.
#[derive(Debug, Clone)]
pub struct ApplyPlan {
    pub mapping: PathMapping,
    pub manifest: Manifest,
    pub routing_contract: String,
}

/// What an apply did.
#[derive(Debug, Clone)]
pub struct ApplyReport {
    pub installer: &'static str,
    pub routing_contract_path: PathBuf,
    pub learning_ledger_path: PathBuf,
    pub ledger_created: bool,
    pub summary: InstallSummary,
}

impl ApplyPlan {
    /// Check preconditions and render. Touches nothing on disk.
    pub fn prepare(config: &BootloaderConfig) -> Result<Self> {
        let proposal_path = config.proposal_path();
        if !proposal_path.exists() {
            return Err(Error::ProposalMissing {
                path: proposal_path,
            });
        }

        let personalize_path = config.personalize_path();
        let personalize = PersonalizationConfig::load(&personalize_path)?;
        if !personalize.is_install_approved() {
            return Err(Error::ApprovalNotGranted {
                path: personalize_path,
            });
        }

        let workspace_root = config.workspace_root();
        let scan = WorkspaceScanner::new(&workspace_root).scan();
        let mapping = PathMapping::propose(&scan, &workspace_root).with_overrides(&personalize);
        let names = personalize.persona_names();

        let store = TemplateStore::new(config.templates_dir());
        let routing_contract = substitute(
            &store.load(TemplateKind::RoutingContract)?,
            &names.substitutions(),
        );
        let manifest = Manifest::build(
            &store,
            &names,
            &mapping.learning_ledger_path.to_string_lossy(),
            personalize.rule_prefix(),
        )?;

        info!(
            personas = manifest.personas.len(),
            rules = manifest.rules.len(),
            rule_prefix = personalize.rule_prefix(),
            "Install plan ready"
        );

        Ok(Self {
            mapping,
            manifest,
            routing_contract,
        })
    }

    /// Write the routing contract (always) and the ledger (only if missing).
    /// Returns whether the ledger was created.
    pub fn write_local_files(&self) -> Result<bool> {
        let contract_path = self.mapping.routing_contract_path();
        write_document(&contract_path, &self.routing_contract)?;
        info!(path = %contract_path.display(), "Routing contract written");

        let ledger = &self.mapping.learning_ledger_path;
        if ledger.exists() {
            debug!(path = %ledger.display(), "Learning ledger exists, leaving it alone");
            return Ok(false);
        }
        write_document(ledger, &seed_ledger(today()))?;
        info!(path = %ledger.display(), "Learning ledger created");
        Ok(true)
    }

    /// Write local files, install, and fail if the summary reports failure.
    pub async fn execute(self, installer: &dyn Installer) -> Result<ApplyReport> {
        let ledger_created = self.write_local_files()?;

        info!(installer = installer.name(), "Installing personas and rules");
        let summary = installer.install(&self.manifest).await?.into_result()?;
        info!(
            personas = summary.personas.len(),
            rules = summary.rules.len(),
            "Install complete"
        );

        Ok(ApplyReport {
            installer: installer.name(),
            routing_contract_path: self.mapping.routing_contract_path(),
            learning_ledger_path: self.mapping.learning_ledger_path,
            ledger_created,
            summary,
        })
    }
}

/// Initial learning ledger contents.
pub fn seed_ledger(date: NaiveDate) -> String {
    format!(
        "{}\n# Persona Learnings\n\n- \n",
        frontmatter_header(date, "bootloader-install")
    )
}
