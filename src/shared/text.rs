//! Whitespace normalisation and filename slugs shared by the engine.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static UNSAFE_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());

/// Maximum slug length, in characters.
pub const MAX_SLUG_CHARS: usize = 120;

/// Collapse every whitespace run (including non-breaking spaces) into a
/// single space and trim both ends.
pub fn normalize_spaces(value: &str) -> String {
    WHITESPACE_PATTERN.replace_all(value, " ").trim().to_string()
}

/// Filesystem-safe form of a display string: word characters and dashes
/// only, spaces turned into underscores, at most [`MAX_SLUG_CHARS`] long.
pub fn slugify(value: &str) -> String {
    let normalized = normalize_spaces(value);
    let stripped = UNSAFE_SLUG_CHARS.replace_all(&normalized, "");
    stripped
        .trim()
        .replace(' ', "_")
        .chars()
        .take(MAX_SLUG_CHARS)
        .collect()
}
