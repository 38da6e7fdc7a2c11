//! Remote installers.
//!
//! An [`Installer`] takes a finished [`Manifest`] and creates its personas and
//! rules somewhere. Three strategies exist:
//! - **direct**: one create call per persona and per rule
//! - **delegated**: one natural-language instruction, JSON summary parsed
//!   out of the reply text
//! - **dry-run**: no network, fabricated identifiers

mod client;
mod delegated;
mod direct;
mod dry_run;
pub mod extract;

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{InstallMode, RemoteSettings};
use crate::error::{Error, Result};
use crate::persona::Manifest;

pub use client::ApiClient;
pub use delegated::DelegatedInstaller;
pub use direct::DirectInstaller;
pub use dry_run::DryRunInstaller;

// ─────────────────────────────────────────────────────────────────
// Install Summary
// ─────────────────────────────────────────────────────────────────

/// One created persona or rule as reported back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordRepr")]
pub struct InstalledRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Replies list records either as bare names or as `{name, id}` objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordRepr {
    Name(String),
    Full {
        #[serde(default)]
        name: String,
        #[serde(default)]
        id: Option<serde_json::Value>,
    },
}

impl From<RecordRepr> for InstalledRecord {
    fn from(repr: RecordRepr) -> Self {
        match repr {
            RecordRepr::Name(name) => Self { name, id: None },
            RecordRepr::Full { name, id } => Self {
                name,
                id: id.as_ref().and_then(value_as_id),
            },
        }
    }
}

/// Identifier fields come back as strings or numbers.
pub(crate) fn value_as_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Outcome of an install.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallSummary {
    pub success: bool,
    pub personas: Vec<InstalledRecord>,
    pub rules: Vec<InstalledRecord>,
    #[serde(alias = "error_message", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
}

impl InstallSummary {
    /// Failed summary carrying a message and the text it came from.
    pub fn failure(message: impl Into<String>, raw_output: Option<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            raw_output,
            ..Default::default()
        }
    }

    /// Turn a reported failure into [`Error::InstallFailed`].
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        Err(Error::InstallFailed {
            message: self
                .error
                .unwrap_or_else(|| "service reported success: false".to_string()),
            raw_output: self.raw_output,
        })
    }
}

// ─────────────────────────────────────────────────────────────────
// Installer Trait
// ─────────────────────────────────────────────────────────────────

/// Strategy that creates a manifest's personas and rules.
#[async_trait]
pub trait Installer: Send + Sync {
    /// Strategy name for logs ("direct", "delegated", "dry-run")
    fn name(&self) -> &'static str;

    /// Create everything in the manifest. Transport and protocol failures are
    /// errors; a service-reported failure is a summary with `success: false`.
    async fn install(&self, manifest: &Manifest) -> Result<InstallSummary>;
}

/// Read the bearer credential. Unset and empty are both missing.
pub fn read_credential(var: &str) -> Result<String> {
    match env::var(var) {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(Error::CredentialMissing {
            var: var.to_string(),
        }),
    }
}

/// Build the installer selected by settings.
///
/// The credential is read here, before anything is written or sent.
pub fn create_installer(settings: &RemoteSettings, dry_run: bool) -> Result<Box<dyn Installer>> {
    if dry_run {
        debug!("Dry run, no credential required");
        return Ok(Box::new(DryRunInstaller));
    }

    let token = read_credential(&settings.token_env)?;
    let client = ApiClient::new(
        &settings.base_url,
        token,
        Duration::from_secs(settings.timeout_secs),
    )?;

    Ok(match settings.mode {
        InstallMode::Direct => Box::new(DirectInstaller::new(client)),
        InstallMode::Delegated => Box::new(DelegatedInstaller::new(
            client,
            settings.delegated_endpoint.clone(),
        )),
    })
}
