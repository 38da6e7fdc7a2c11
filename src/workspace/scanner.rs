//! Workspace scanner: finds `Documents/System`-style directories.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace};
use walkdir::WalkDir;

/// Deepest directory level (relative to the root) that is inspected.
pub const MAX_SCAN_DEPTH: usize = 3;

const SYSTEM_DIR: &str = "system";
const DOCUMENTS_DIRS: [&str; 2] = ["documents", "docs"];

/// Candidate locations found by a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// `system` directories under a `documents`/`docs` parent, preferred first.
    pub documents_system: Vec<PathBuf>,
}

/// Walks a workspace root to a bounded depth.
#[derive(Debug, Clone)]
pub struct WorkspaceScanner {
    root: PathBuf,
    max_depth: usize,
}

impl WorkspaceScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_depth: MAX_SCAN_DEPTH,
        }
    }

    /// `<root>/Documents/System`, used ahead of anything the walk finds.
    pub fn preferred_path(&self) -> PathBuf {
        preferred_documents_system(&self.root)
    }

    /// Walk the workspace. Never fails: unreadable entries are skipped and an
    /// empty result means nothing matched.
    pub fn scan(&self) -> ScanResult {
        let mut found = Vec::new();

        let preferred = self.preferred_path();
        if preferred.is_dir() {
            debug!(path = %preferred.display(), "Preferred documents directory present");
            found.push(preferred);
        }

        let walker = WalkDir::new(&self.root)
            .max_depth(self.max_depth)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    trace!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_dir() && is_documents_system(entry.path()) {
                found.push(entry.into_path());
            }
        }

        let documents_system = dedup_by_canonical_path(found);
        info!(
            root = %self.root.display(),
            candidates = documents_system.len(),
            "Workspace scan complete"
        );

        ScanResult { documents_system }
    }
}

/// `<root>/Documents/System`.
pub fn preferred_documents_system(root: &Path) -> PathBuf {
    root.join("Documents").join("System")
}

/// A directory named `system` whose parent is `documents` or `docs`, any case.
fn is_documents_system(path: &Path) -> bool {
    let name_is = |p: Option<&Path>, wanted: &[&str]| {
        p.and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .map(|n| wanted.iter().any(|w| n.eq_ignore_ascii_case(w)))
            .unwrap_or(false)
    };

    name_is(Some(path), &[SYSTEM_DIR]) && name_is(path.parent(), &DOCUMENTS_DIRS)
}

/// Keep the first occurrence of every directory, comparing canonical paths.
fn dedup_by_canonical_path(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|p| {
            let key = fs::canonicalize(p).unwrap_or_else(|_| p.clone());
            seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mkdirs(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    #[test]
    fn test_empty_workspace() {
        let tmp = TempDir::new().unwrap();
        assert!(WorkspaceScanner::new(tmp.path()).scan().documents_system.is_empty());
    }

    #[test]
    fn test_missing_root_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = WorkspaceScanner::new(tmp.path().join("nope")).scan();
        assert!(result.documents_system.is_empty());
    }

    #[test]
    fn test_matches_case_insensitively() {
        let tmp = TempDir::new().unwrap();
        let a = mkdirs(tmp.path(), "proj/docs/SYSTEM");
        let b = mkdirs(tmp.path(), "proj/DOCUMENTS/system");
        mkdirs(tmp.path(), "proj/notes/system");

        let result = WorkspaceScanner::new(tmp.path()).scan();
        assert_eq!(result.documents_system.len(), 2);
        assert!(result.documents_system.contains(&a));
        assert!(result.documents_system.contains(&b));
    }

    #[test]
    fn test_depth_is_bounded() {
        let tmp = TempDir::new().unwrap();
        let shallow = mkdirs(tmp.path(), "a/docs/system");
        mkdirs(tmp.path(), "a/b/docs/system");

        let result = WorkspaceScanner::new(tmp.path()).scan();
        assert_eq!(result.documents_system, vec![shallow]);
    }

    #[test]
    fn test_preferred_path_first_and_not_duplicated() {
        let tmp = TempDir::new().unwrap();
        mkdirs(tmp.path(), "aaa/docs/system");
        let preferred = mkdirs(tmp.path(), "Documents/System");

        let result = WorkspaceScanner::new(tmp.path()).scan();

        assert_eq!(result.documents_system[0], preferred);
        assert_eq!(result.documents_system.len(), 2);
    }

    #[test]
    fn test_root_itself_can_match() {
        let tmp = TempDir::new().unwrap();
        let root = mkdirs(tmp.path(), "docs/system");

        let result = WorkspaceScanner::new(&root).scan();
        assert_eq!(result.documents_system, vec![root]);
    }
}
