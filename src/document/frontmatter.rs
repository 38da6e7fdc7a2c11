//! Front-matter detection.

const DELIMITER: &str = "---";

/// Split a document into `(front_matter, body)`.
///
/// Returns `None` unless the first line is exactly `---` and a later line is
/// exactly `---`. Only the first block is consumed.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix(DELIMITER)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(|c| c == '\r' || c == '\n') == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

/// Drop a leading front-matter block, returning the document unchanged when
/// there is none (or when it is never closed).
pub fn strip_frontmatter(content: &str) -> &str {
    split_frontmatter(content)
        .map(|(_, body)| body)
        .unwrap_or(content)
}
