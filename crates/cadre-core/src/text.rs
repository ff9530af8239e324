use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// NFC-normalize a name. macOS and some NAS shares hand out decomposed
/// accents, which would otherwise slip past the regexes and generic lists.
pub fn nfc(s: &str) -> String {
    s.nfc().collect()
}

/// Collapse whitespace runs to one space and trim both ends
pub fn squash_spaces(s: &str) -> String {
    SPACES_RE.replace_all(s, " ").trim().to_string()
}

/// Check if a folder name contains any generic entry (case-insensitive substring)
pub fn is_generic(folder_name: &str, generic_folders: &[String]) -> bool {
    let name = nfc(folder_name).to_lowercase();
    generic_folders
        .iter()
        .map(|g| nfc(g).to_lowercase())
        .any(|g| !g.is_empty() && name.contains(&g))
}

/// Uppercase the first character only; the rest is left untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
