pub mod exif;
pub mod path;

use chrono::{Datelike, NaiveDateTime, Timelike};

pub const MONTHS_FR: [&str; 12] = [
    "Janvier", "Février", "Mars", "Avril", "Mai", "Juin",
    "Juillet", "Août", "Septembre", "Octobre", "Novembre", "Décembre",
];

/// French month name for a 1-based month number
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTHS_FR.get(idx).copied()
}

/// "Juin 2021"
pub fn month_year_label(dt: &NaiveDateTime) -> String {
    // chrono months are always 1..=12
    let month = month_name(dt.month()).unwrap_or_default();
    format!("{} {}", month, dt.year())
}

/// "21 Février 2026 14:30"
pub fn full_date_label(dt: &NaiveDateTime) -> String {
    let month = month_name(dt.month()).unwrap_or_default();
    format!(
        "{:02} {} {} {:02}:{:02}",
        dt.day(),
        month,
        dt.year(),
        dt.hour(),
        dt.minute()
    )
}
