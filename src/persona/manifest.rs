//! Manifest builder: the full set of personas and rules one install creates.

use tracing::debug;

use crate::document::{learning_block, render};
use crate::error::Result;

use super::registry::{TemplateKind, TemplateStore};
use super::rules::{build_rules, RuleDefinition};
use super::types::{PersonaNames, PersonaRole};

/// One persona to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaManifestEntry {
    pub role: PersonaRole,
    pub name: String,
    pub rendered_prompt: String,
}

/// Everything the installer sends to the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub personas: Vec<PersonaManifestEntry>,
    pub rules: Vec<RuleDefinition>,
}

impl Manifest {
    /// Render every role's template and build the rule list.
    pub fn build(
        store: &TemplateStore,
        names: &PersonaNames,
        ledger_path: &str,
        rule_prefix: &str,
    ) -> Result<Self> {
        let values = names.substitutions();
        let ledger = learning_block(ledger_path);

        let mut personas = Vec::with_capacity(PersonaRole::all().len());
        for role in PersonaRole::all() {
            let template = store.load(TemplateKind::Persona(*role))?;
            let rendered_prompt = render(&template, &values, &ledger);
            debug!(role = %role, chars = rendered_prompt.len(), "Rendered persona prompt");

            personas.push(PersonaManifestEntry {
                role: *role,
                name: names.get(*role).to_string(),
                rendered_prompt,
            });
        }

        Ok(Self {
            personas,
            rules: build_rules(rule_prefix, names),
        })
    }

    pub fn persona(&self, role: PersonaRole) -> Option<&PersonaManifestEntry> {
        self.personas.iter().find(|p| p.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::template::LEDGER_TOKEN;
    use std::fs;
    use tempfile::TempDir;

    fn names() -> PersonaNames {
        PersonaNames::from_lookup(|role| match role {
            PersonaRole::Operator => Some("Atlas"),
            PersonaRole::Builder => Some("Forge"),
            _ => None,
        })
    }

    #[test]
    fn test_builds_seven_personas_and_six_rules() {
        let tmp = TempDir::new().unwrap();
        let store = TemplateStore::new(tmp.path());

        let manifest = Manifest::build(&store, &names(), "/ws/ledger.md", "persona").unwrap();

        assert_eq!(manifest.personas.len(), 7);
        assert_eq!(manifest.rules.len(), 6);
        let roles: Vec<_> = manifest.personas.iter().map(|p| p.role).collect();
        assert_eq!(roles, PersonaRole::all().to_vec());
        assert_eq!(manifest.persona(PersonaRole::Operator).unwrap().name, "Atlas");
    }

    #[test]
    fn test_prompts_carry_every_name_and_the_ledger() {
        let tmp = TempDir::new().unwrap();
        let store = TemplateStore::new(tmp.path());

        let manifest = Manifest::build(&store, &names(), "/ws/ledger.md", "persona").unwrap();
        for entry in &manifest.personas {
            assert!(!entry.rendered_prompt.contains("_name}}"), "{} left a name placeholder", entry.role);
            assert!(!entry.rendered_prompt.contains(LEDGER_TOKEN));
            assert_eq!(entry.rendered_prompt.matches("/ws/ledger.md").count(), 1);
        }
        let operator = manifest.persona(PersonaRole::Operator).unwrap();
        assert!(operator.rendered_prompt.contains("Forge"));
    }

    #[test]
    fn test_custom_template_without_token_gets_ledger_appended() {
        let tmp = TempDir::new().unwrap();
        let store = TemplateStore::new(tmp.path());
        let path = store.path_of(TemplateKind::Persona(PersonaRole::Teacher));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "---\nversion: 2\n---\nI am {{teacher_name}}.\n").unwrap();

        let manifest = Manifest::build(&store, &names(), "/ledger.md", "persona").unwrap();
        let teacher = manifest.persona(PersonaRole::Teacher).unwrap();

        assert!(teacher.rendered_prompt.starts_with("I am Teacher.\n"));
        assert!(teacher.rendered_prompt.trim_end().ends_with("/ledger.md"));
    }
}
