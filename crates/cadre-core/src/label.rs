use serde::{Deserialize, Serialize};

use crate::text::{capitalize, squash_spaces};

/// Caption shown on a video without any derived label
pub const VIDEO_FALLBACK_CAPTION: &str = "Vidéo Perso";

/// Final caption record for one media file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaLabel {
    /// Empty, "<Place>", "<date>" or "<Place> - <date>"
    pub caption: String,
    /// Full-precision date when known, else the coarse date label
    pub full_date: String,
    pub source_path: String,
}

/// Join a location and a date into one caption.
/// Only the location gets capitalized; date labels are already cased.
pub fn compose(location: &str, date: &str) -> String {
    let location = squash_spaces(location);
    let date = squash_spaces(date);
    match (location.is_empty(), date.is_empty()) {
        (false, false) => format!("{} - {}", capitalize(&location), date),
        (false, true) => capitalize(&location),
        (true, false) => date,
        (true, true) => String::new(),
    }
}
