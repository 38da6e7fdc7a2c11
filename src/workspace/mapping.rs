//! Path mapping proposal.

use std::path::{Path, PathBuf};

use crate::personalize::PersonalizationConfig;

use super::scanner::{preferred_documents_system, ScanResult};

/// File name of the learning ledger inside the documents directory.
pub const LEDGER_FILE_NAME: &str = "persona-learnings.md";
/// File name of the rendered routing contract inside the documents directory.
pub const ROUTING_CONTRACT_FILE_NAME: &str = "persona-routing-contract.md";

/// Where the install writes its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapping {
    pub documents_system_path: PathBuf,
    pub learning_ledger_path: PathBuf,
}

impl PathMapping {
    /// First candidate wins; with none, `<workspace>/Documents/System`.
    pub fn propose(scan: &ScanResult, workspace_root: &Path) -> Self {
        let documents_system_path = scan
            .documents_system
            .first()
            .cloned()
            .unwrap_or_else(|| preferred_documents_system(workspace_root));
        let learning_ledger_path = documents_system_path.join(LEDGER_FILE_NAME);

        Self {
            documents_system_path,
            learning_ledger_path,
        }
    }

    /// Apply the personalization document's path overrides.
    ///
    /// A documents directory override moves the ledger with it unless the
    /// ledger is overridden too.
    pub fn with_overrides(mut self, personalize: &PersonalizationConfig) -> Self {
        if let Some(path) = personalize.documents_system_path() {
            self.learning_ledger_path = path.join(LEDGER_FILE_NAME);
            self.documents_system_path = path;
        }
        if let Some(path) = personalize.learning_ledger_path() {
            self.learning_ledger_path = path;
        }
        self
    }

    pub fn routing_contract_path(&self) -> PathBuf {
        self.documents_system_path.join(ROUTING_CONTRACT_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scan_uses_default() {
        let mapping = PathMapping::propose(&ScanResult::default(), Path::new("/home/workspace"));

        assert_eq!(
            mapping.documents_system_path,
            PathBuf::from("/home/workspace/Documents/System")
        );
        assert_eq!(
            mapping.learning_ledger_path,
            PathBuf::from("/home/workspace/Documents/System/persona-learnings.md")
        );
    }

    #[test]
    fn test_first_candidate_wins() {
        let scan = ScanResult {
            documents_system: vec![PathBuf::from("/w/a/docs/system"), PathBuf::from("/w/b/docs/system")],
        };
        let mapping = PathMapping::propose(&scan, Path::new("/w"));

        assert_eq!(mapping.documents_system_path, PathBuf::from("/w/a/docs/system"));
        assert_eq!(
            mapping.routing_contract_path(),
            PathBuf::from("/w/a/docs/system/persona-routing-contract.md")
        );
    }

    #[test]
    fn test_documents_override_moves_ledger() {
        let mapping = PathMapping::propose(&ScanResult::default(), Path::new("/w"));
        // Empty ledger override is ignored
        let personalize = PersonalizationConfig::parse(
            "documents_system_path: /custom/System\nlearning_ledger_path:\n",
        );

        let mapping = mapping.with_overrides(&personalize);
        assert_eq!(mapping.documents_system_path, PathBuf::from("/custom/System"));
        assert_eq!(
            mapping.learning_ledger_path,
            PathBuf::from("/custom/System/persona-learnings.md")
        );
    }

    #[test]
    fn test_ledger_override_alone() {
        let mapping = PathMapping::propose(&ScanResult::default(), Path::new("/w"));
        let personalize = PersonalizationConfig::parse("learning_ledger_path: /notes/ledger.md\n");

        let mapping = mapping.with_overrides(&personalize);
        assert_eq!(mapping.documents_system_path, PathBuf::from("/w/Documents/System"));
        assert_eq!(mapping.learning_ledger_path, PathBuf::from("/notes/ledger.md"));
    }
}
