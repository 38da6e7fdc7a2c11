//! Placeholder substitution for template documents.
//!
//! Placeholders are written `{{key}}`. Keys without a value are left in the
//! output verbatim. The learning-ledger block has its own token and is either
//! substituted in place or appended to the end of the document.

use std::collections::BTreeMap;

use super::frontmatter::strip_frontmatter;

/// Placeholder values keyed by placeholder name (without braces).
pub type Substitutions = BTreeMap<String, String>;

/// Token replaced by the learning-ledger block.
pub const LEDGER_TOKEN: &str = "{{LEARNING_LEDGER_BLOCK}}";

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replace every `{{key}}` that has a value in `values`.
///
/// Single pass: substituted values are never re-scanned, so a value that
/// itself contains `{{...}}` is emitted as-is.
pub fn substitute(text: &str, values: &Substitutions) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];

        let Some(end) = after.find(CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        if key.contains(OPEN) {
            // "{{ {{key}}": keep the stray opener, rescan from the next one
            out.push_str(OPEN);
            rest = after;
            continue;
        }

        match values.get(key) {
            Some(value) => out.push_str(value),
            None => {
                out.push_str(OPEN);
                out.push_str(key);
                out.push_str(CLOSE);
            }
        }
        rest = &after[end + CLOSE.len()..];
    }

    out.push_str(rest);
    out
}

/// The note injected into persona prompts pointing at the learning ledger.
/// Empty when no ledger path is configured.
pub fn learning_block(ledger_path: &str) -> String {
    if ledger_path.is_empty() {
        return String::new();
    }
    format!(
        "## Learning Ledger\n\n\
         If you learn something that should persist beyond this task, append a brief note to:\n\
         {}\n",
        ledger_path
    )
}

/// Put the ledger block where the template asks for it, or at the end.
///
/// The first token receives the block and any further tokens are removed, so
/// the block appears exactly once. A template without the token gets the
/// block appended unless the block is empty.
pub fn inject_learning_ledger(text: &str, block: &str) -> String {
    if text.contains(LEDGER_TOKEN) {
        return text.replacen(LEDGER_TOKEN, block, 1).replace(LEDGER_TOKEN, "");
    }

    if block.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + block.len() + 2);
    out.push_str(text);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(block);
    out
}

/// Strip front-matter, substitute placeholders, then place the ledger block.
pub fn render(template: &str, values: &Substitutions, ledger_block: &str) -> String {
    let body = substitute(strip_frontmatter(template), values);
    inject_learning_ledger(&body, ledger_block)
}
