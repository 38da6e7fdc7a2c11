//! Plain-text document handling shared by the personalization reader and
//! the template renderer.
//!
//! Documents are UTF-8 markdown with an optional leading front-matter block
//! delimited by `---` lines.

pub mod frontmatter;
pub mod template;

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

pub use frontmatter::strip_frontmatter;
pub use template::{learning_block, render, substitute, Substitutions};

/// Write a document, creating missing parent directories first.
pub fn write_document(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io_write(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| Error::io_write(path, e))
}
