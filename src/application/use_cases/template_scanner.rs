// ============================================================
// TEMPLATE SCANNER
// ============================================================

use std::collections::BTreeSet;

use docx_rs::Docx;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::infrastructure::docx::{for_each_paragraph, paragraph_text};

/// `{TOKEN}` with no nested braces.
pub static PLACEHOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^{}]+\}").unwrap());

/// Distinct placeholders of a text, sorted.
pub fn placeholders_in_text(text: &str) -> BTreeSet<String> {
    PLACEHOLDER_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Distinct placeholders in body and table-cell paragraphs, sorted. Runs are
/// concatenated first so placeholders split across runs are found too.
pub fn scan_placeholders(docx: &Docx) -> Vec<String> {
    let mut found = BTreeSet::new();
    for_each_paragraph(docx, &mut |paragraph| {
        found.extend(placeholders_in_text(&paragraph_text(paragraph)));
    });

    debug!(count = found.len(), "Scanned template placeholders");
    found.into_iter().collect()
}
