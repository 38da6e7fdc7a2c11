//! Dry-run installer: logs what would be created and fabricates ids.

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::persona::Manifest;

use super::{InstallSummary, InstalledRecord, Installer};

pub struct DryRunInstaller;

#[async_trait]
impl Installer for DryRunInstaller {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn install(&self, manifest: &Manifest) -> Result<InstallSummary> {
        let personas = manifest
            .personas
            .iter()
            .map(|p| {
                info!(role = %p.role, name = %p.name, chars = p.rendered_prompt.len(), "Would create persona");
                InstalledRecord {
                    name: p.name.clone(),
                    id: Some(format!("dry-run-{}", p.role.slug())),
                }
            })
            .collect();

        let rules = manifest
            .rules
            .iter()
            .enumerate()
            .map(|(i, r)| {
                info!(rule = %r.name, kind = %r.kind, "Would create rule");
                InstalledRecord {
                    name: r.name.clone(),
                    id: Some(format!("dry-run-rule-{}", i + 1)),
                }
            })
            .collect();

        Ok(InstallSummary {
            success: true,
            personas,
            rules,
            ..Default::default()
        })
    }
}
