use regex::Regex;
use std::sync::LazyLock;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern should be valid"));

/// Collapses every run of whitespace into a single space and trims both ends
///
/// This is the normalization both sides of a parity comparison go through:
/// - Leading and trailing whitespace is dropped
/// - Newlines, tabs and repeated spaces become one space
/// - Punctuation and character case are left alone
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes anything that looks like a markup tag
pub fn strip_tags(text: &str) -> String {
    TAG_PATTERN.replace_all(text, "").into_owned()
}

/// Counts whitespace-separated words once tags are stripped
pub fn word_count(text: &str) -> usize {
    strip_tags(text).split_whitespace().count()
}

/// Whether the text carries a markup delimiter
pub fn contains_markup(text: &str) -> bool {
    text.contains('<')
}

/// Whether the text has no leading or trailing whitespace
pub fn is_trimmed(text: &str) -> bool {
    text == text.trim()
}
