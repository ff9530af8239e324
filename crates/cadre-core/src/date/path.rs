use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use super::month_name;
use crate::folder;

// The day group is matched but never used in the label.
static FULL_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<year>[0-9]{4})[-\s.](?P<month>[0-9]{2})[-\s.](?P<day>[0-9]{2})").unwrap()
});
// Letters and digits around the year disqualify it, `_` does not.
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\p{L}\p{N}])(?P<year>(?:19|20)[0-9]{2})(?:$|[^\p{L}\p{N}])").unwrap()
});

/// Guess a "<Mois> <YYYY>" or bare "YYYY" label from the folder holding `path`.
/// Returns an empty string when the folder name has no usable date.
pub fn extract_date_from_path(path: &Path, generic_folders: &[String]) -> String {
    let folder_name = folder::label_folder(path, generic_folders);
    guess_date_from_folder(&folder_name)
}

/// Date label from a single folder name
pub fn guess_date_from_folder(folder_name: &str) -> String {
    if let Some(caps) = FULL_DATE_RE.captures(folder_name) {
        let month = caps["month"].parse::<u32>().ok().and_then(month_name);
        if let Some(month) = month {
            return format!("{} {}", month, &caps["year"]);
        }
    }

    if let Some(caps) = YEAR_RE.captures(folder_name) {
        return caps["year"].to_string();
    }

    String::new()
}
