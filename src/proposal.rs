//! Install proposal document written by `--scan` for human review.

use std::fmt::Write as _;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::document::write_document;
use crate::error::Result;
use crate::persona::rules::{rule_count, HARD_SWITCH_RULES, METHODOLOGY_RULES};
use crate::persona::{PersonaNames, PersonaRole};
use crate::workspace::PathMapping;

/// Front-matter version stamped on generated documents.
pub const DOCUMENT_VERSION: &str = "1.0";

const REVIEW_QUESTIONS: [&str; 5] = [
    "Which personas are you installing, and why those?",
    "Where will the routing contract and learning ledger live?",
    "What rule prefix avoids collisions in your system?",
    "What would break if rules mis-route a request?",
    "How will you verify switching correctness?",
];

/// `---` block with creation metadata.
pub fn frontmatter_header(date: NaiveDate, provenance: &str) -> String {
    let day = date.format("%Y-%m-%d");
    format!(
        "---\ncreated: {day}\nlast_edited: {day}\nversion: {DOCUMENT_VERSION}\nprovenance: {provenance}\n---\n"
    )
}

/// Render the proposal text.
pub fn render_proposal(mapping: &PathMapping, names: &PersonaNames, date: NaiveDate) -> String {
    let mut doc = frontmatter_header(date, "bootloader-scan");

    // Writing into a String cannot fail
    let _ = writeln!(doc);
    let _ = writeln!(doc, "# Install Proposal (Socratic Step)");
    let _ = writeln!(doc);
    let _ = writeln!(doc, "## Proposed Paths");
    let _ = writeln!(
        doc,
        "- documents_system_path: {}",
        mapping.documents_system_path.display()
    );
    let _ = writeln!(
        doc,
        "- learning_ledger_path: {}",
        mapping.learning_ledger_path.display()
    );
    let _ = writeln!(doc);

    let _ = writeln!(doc, "## Personas to Create");
    for (role, name) in names.iter() {
        let _ = writeln!(doc, "- {}: {}", role, name);
    }
    let _ = writeln!(doc);

    let _ = writeln!(doc, "## What Will Be Installed");
    let _ = writeln!(doc, "- Routing contract file");
    let _ = writeln!(doc, "- Learning ledger file (if not exists)");
    let _ = writeln!(doc, "- {} persona prompts", PersonaRole::all().len());
    let _ = writeln!(
        doc,
        "- {} rules ({} hard-switch, {} methodology)",
        rule_count(),
        HARD_SWITCH_RULES.len(),
        METHODOLOGY_RULES.len()
    );
    let _ = writeln!(doc);

    let _ = writeln!(doc, "## How ad-hoc changes are applied across the board");
    let _ = writeln!(doc, "- All persona names are injected into prompts and rule instructions");
    let _ = writeln!(doc, "- The routing contract uses the same names");
    let _ = writeln!(doc, "- Paths from personalization override defaults before writing files");
    let _ = writeln!(doc);

    let _ = writeln!(doc, "## Socratic questions (answer in templates/personalize.md)");
    for (i, question) in REVIEW_QUESTIONS.iter().enumerate() {
        let _ = writeln!(doc, "{}. {}", i + 1, question);
    }

    doc
}

/// Render and write the proposal, replacing any previous one.
pub fn write_proposal(
    path: &Path,
    mapping: &PathMapping,
    names: &PersonaNames,
    date: NaiveDate,
) -> Result<()> {
    write_document(path, &render_proposal(mapping, names, date))?;
    info!(path = %path.display(), "Install proposal written");
    Ok(())
}
