//! Short excerpts for cards, taken straight from raw markdown

/// First line that is non-blank and not a heading, or an empty string.
///
/// Only a leading `#` marks a heading; indented lines are kept as they are.
pub fn extract_preview(markdown: &str) -> &str {
    markdown
        .lines()
        .find(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .unwrap_or("")
}
