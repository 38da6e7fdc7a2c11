//! Personalization document reader.
//!
//! The personalization document is a human-edited markdown file: an optional
//! front-matter block followed by `key: value` lines. Blank lines and `#`
//! comments are skipped, lines without a colon are ignored, and later
//! duplicates overwrite earlier values while keeping their first position.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::document::strip_frontmatter;
use crate::error::{Error, Result};
use crate::persona::{PersonaNames, PersonaRole};

/// Key that must be `true` before `--apply` will install anything.
pub const APPROVE_KEY: &str = "approve_install";
/// Key for the rule name prefix.
pub const RULE_PREFIX_KEY: &str = "rule_prefix";
/// Rule name prefix used when the document does not set one.
pub const DEFAULT_RULE_PREFIX: &str = "persona";
/// Override for the proposed documents-system directory.
pub const DOCUMENTS_SYSTEM_KEY: &str = "documents_system_path";
/// Override for the proposed learning-ledger file.
pub const LEARNING_LEDGER_KEY: &str = "learning_ledger_path";

/// Flat, ordered key-value view of a personalization document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalizationConfig {
    entries: Vec<(String, String)>,
}

impl PersonalizationConfig {
    /// Parse document text.
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();

        for line in strip_frontmatter(text).lines() {
            if line.is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };

            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            config.insert(key, value);
        }

        config
    }

    /// Read and parse the document at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io_read(path, e))?;
        let config = Self::parse(&text);
        debug!(path = %path.display(), keys = config.entries.len(), "Personalization loaded");
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing document yields defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "Personalization document not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }


    /// `approve_install` is `true` (case-insensitive). Absent means not approved.
    pub fn is_install_approved(&self) -> bool {
        self.get(APPROVE_KEY)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn rule_prefix(&self) -> &str {
        self.non_empty(RULE_PREFIX_KEY).unwrap_or(DEFAULT_RULE_PREFIX)
    }

    pub fn documents_system_path(&self) -> Option<PathBuf> {
        self.non_empty(DOCUMENTS_SYSTEM_KEY).map(PathBuf::from)
    }

    pub fn learning_ledger_path(&self) -> Option<PathBuf> {
        self.non_empty(LEARNING_LEDGER_KEY).map(PathBuf::from)
    }

    /// Display names for every role, falling back to each role's default.
    pub fn persona_names(&self) -> PersonaNames {
        PersonaNames::from_lookup(|role: PersonaRole| self.non_empty(&role.name_key()))
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_after_frontmatter_in_order() {
        let doc = "---\ncreated: 2026-02-10\nversion: 1.0\n---\n\
                   operator_name: Atlas\n\
                   builder_name: \"Forge\"\n\
                   # a comment\n\
                   \n\
                   not a pair\n\
                   rule_prefix: zo\n";
        let config = PersonalizationConfig::parse(doc);

        assert_eq!(config.entries.len(), 3);
        assert_eq!(config.get("operator_name"), Some("Atlas"));
        assert_eq!(config.get("builder_name"), Some("Forge"));
        assert_eq!(config.get("rule_prefix"), Some("zo"));
        assert!(config.get("created").is_none());
    }

    #[test]
    fn later_duplicates_overwrite_in_place() {
        let config = PersonalizationConfig::parse("a: 1\nb: 2\na: 3\n");
        assert_eq!(config.entries.len(), 2);
        assert_eq!(config.get("a"), Some("3"));
        assert_eq!(config.get("b"), Some("2"));
    }

    #[test]
    fn value_keeps_colons_after_the_first() {
        let config = PersonalizationConfig::parse("documents_system_path: C:/Docs/System\n");
        assert_eq!(config.get(DOCUMENTS_SYSTEM_KEY), Some("C:/Docs/System"));
    }

    #[test]
    fn indented_comments_and_empty_keys_are_skipped() {
        let config = PersonalizationConfig::parse("   # operator_name: X\n: orphan\nk:v\n");
        assert_eq!(config.entries.len(), 1);
        assert_eq!(config.get("k"), Some("v"));
    }

    #[test]
    fn approval_requires_literal_true() {
        assert!(PersonalizationConfig::parse("approve_install: TRUE").is_install_approved());
        assert!(PersonalizationConfig::parse("approve_install: \"true\"").is_install_approved());
        assert!(!PersonalizationConfig::parse("approve_install: yes").is_install_approved());
        assert!(!PersonalizationConfig::parse("operator_name: Atlas").is_install_approved());
    }

    #[test]
    fn names_fall_back_to_defaults() {
        let config = PersonalizationConfig::parse("operator_name: Atlas\nwriter_name:\n");
        let names = config.persona_names();

        assert_eq!(names.get(PersonaRole::Operator), "Atlas");
        assert_eq!(names.get(PersonaRole::Writer), "Writer");
        assert_eq!(names.get(PersonaRole::Teacher), "Teacher");
    }

    #[test]
    fn rule_prefix_default() {
        assert_eq!(PersonalizationConfig::default().rule_prefix(), "persona");
        assert_eq!(PersonalizationConfig::parse("rule_prefix: team").rule_prefix(), "team");
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("personalize.md");

        assert!(PersonalizationConfig::load_or_default(&missing)
            .unwrap()
            .entries
            .is_empty());
        assert!(matches!(
            PersonalizationConfig::load(&missing),
            Err(Error::IoRead { .. })
        ));
    }
}
