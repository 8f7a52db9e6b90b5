//! Small parsing helpers shared by the extraction passes.

use regex::Regex;
use sysaudit_core::extract_block;

/// The block belonging to a definition header that ends at `header_end`,
/// if the next non-whitespace character opens one. Definitions closed with
/// `;` have no block and must not steal the next definition's.
pub fn block_after(content: &str, header_end: usize) -> Option<&str> {
    let rest = &content[header_end..];
    let offset = rest.len() - rest.trim_start().len();
    if rest.trim_start().starts_with('{') {
        extract_block(content, header_end + offset)
    } else {
        None
    }
}

/// First `doc /* … */` comment in a block, trimmed.
pub fn doc_comment(block: &str) -> Option<String> {
    let pattern = Regex::new(r"(?s)doc\s*/\*(.*?)\*/").expect("static pattern");
    pattern
        .captures(block)
        .map(|c| c[1].trim().to_string())
        .filter(|doc| !doc.is_empty())
}
