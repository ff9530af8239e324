use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::text;

static PARENS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[()]").unwrap());
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_|\-]").unwrap());
static FULL_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{1,4}[-\s./][0-9]{1,2}[-\s./][0-9]{1,4}\b").unwrap());
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[0-9]{4}\b").unwrap());

/// Folder names that carry no place information once cleaned
static EMPTY_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(ann[eé]e|chargement appareil photo)$").unwrap());

/// Name of the folder that describes `path`: the parent directory, or the
/// grandparent when the parent is a generic folder. Only one level is climbed.
pub fn label_folder(path: &Path, generic_folders: &[String]) -> String {
    let Some(parent) = path.parent() else {
        return String::new();
    };
    let name = dir_name(parent);

    if text::is_generic(&name, generic_folders) {
        return parent.parent().map(dir_name).unwrap_or_default();
    }
    name
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn clean_once(name: &str) -> String {
    let s = text::nfc(name);
    let s = PARENS_RE.replace_all(&s, "");
    // `_` is a word character for `\b`, so separators go first or
    // "Vacances_2019" would keep its year.
    let s = SEPARATOR_RE.replace_all(&s, " ");
    let s = FULL_DATE_RE.replace_all(&s, "");
    let s = YEAR_RE.replace_all(&s, "");
    text::squash_spaces(&s)
}

/// Strip dates, years and separators from a folder name, leaving the
/// place-like words. Returns an empty string when nothing useful is left.
pub fn clean_folder_name(name: &str) -> String {
    // Removing a date can leave three numbers next to each other, so run
    // until nothing changes.
    let mut cleaned = clean_once(name);
    loop {
        let next = clean_once(&cleaned);
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    if cleaned.is_empty() || EMPTY_LABEL_RE.is_match(&cleaned) {
        return String::new();
    }
    cleaned
}

/// Place-like label taken from the folder structure of `path`
pub fn best_folder_label(path: &Path, generic_folders: &[String]) -> String {
    clean_folder_name(&label_folder(path, generic_folders))
}
