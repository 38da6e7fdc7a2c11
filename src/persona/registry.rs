//! Template registry: loads template documents from the templates
//! directory, falling back to the copies bundled into the binary.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};

use super::types::PersonaRole;

/// Template documents the bootloader knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Routing contract written next to the learning ledger.
    RoutingContract,
    /// Starting personalization document written by `--scan`.
    Personalize,
    /// Prompt for one persona role.
    Persona(PersonaRole),
}

impl TemplateKind {
    /// Path relative to the templates directory.
    pub fn relative_path(&self) -> PathBuf {
        match self {
            TemplateKind::RoutingContract => PathBuf::from("routing-contract.md"),
            TemplateKind::Personalize => PathBuf::from("personalize.md"),
            TemplateKind::Persona(role) => {
                PathBuf::from("personas").join(format!("{}.md", role.slug()))
            }
        }
    }

    /// Bundled copy compiled into the binary.
    pub fn bundled(&self) -> &'static str {
        match self {
            TemplateKind::RoutingContract => include_str!("../../templates/routing-contract.md"),
            TemplateKind::Personalize => include_str!("../../templates/personalize.md"),
            TemplateKind::Persona(role) => match role {
                PersonaRole::Operator => include_str!("../../templates/personas/operator.md"),
                PersonaRole::Builder => include_str!("../../templates/personas/builder.md"),
                PersonaRole::Debugger => include_str!("../../templates/personas/debugger.md"),
                PersonaRole::Strategist => include_str!("../../templates/personas/strategist.md"),
                PersonaRole::Writer => include_str!("../../templates/personas/writer.md"),
                PersonaRole::Researcher => include_str!("../../templates/personas/researcher.md"),
                PersonaRole::Teacher => include_str!("../../templates/personas/teacher.md"),
            },
        }
    }
}

/// Reads templates from disk.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full on-disk path for a template.
    pub fn path_of(&self, kind: TemplateKind) -> PathBuf {
        self.dir.join(kind.relative_path())
    }

    /// Load a template, preferring the on-disk copy.
    pub fn load(&self, kind: TemplateKind) -> Result<String> {
        let path = self.path_of(kind);
        if path.is_file() {
            return fs::read_to_string(&path).map_err(|e| Error::io_read(&path, e));
        }

        let bundled = kind.bundled();
        if bundled.trim().is_empty() {
            return Err(Error::TemplateNotFound {
                name: kind.relative_path().display().to_string(),
            });
        }

        debug!(path = %path.display(), "Template not on disk, using bundled copy");
        Ok(bundled.to_string())
    }
}
