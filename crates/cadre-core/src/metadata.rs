use std::path::Path;

use chrono::NaiveDateTime;

use crate::date::exif::{ExifRecord, ExifSource};
use crate::date::{self, path::extract_date_from_path};
use crate::folder::best_folder_label;
use crate::geo::GeoLocator;
use crate::label::{compose, MediaLabel};

/// Status when nothing noteworthy happened while reading metadata
pub const STATUS_NONE: &str = "Aucun";

/// Everything known about one photo before the caption is composed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedMetadata {
    /// "<Mois> <YYYY>" from EXIF, else the path guess, else ""
    pub date_label: String,
    /// "DD Mois YYYY HH:MM", only when EXIF had a valid date
    pub full_date: String,
    pub taken_at: Option<NaiveDateTime>,
    pub coords: Option<(f64, f64)>,
    pub orientation: Option<u16>,
    pub folder_label: String,
    /// "Aucun", "Erreur EXIF: ..." or the geolocation status
    pub status: String,
    pub source_path: String,
}

/// Combines EXIF, geolocation and path heuristics into captions.
pub struct MetadataResolver<'a> {
    exif: &'a dyn ExifSource,
    geo: &'a dyn GeoLocator,
    generic_folders: &'a [String],
}

impl<'a> MetadataResolver<'a> {
    pub fn new(exif: &'a dyn ExifSource, geo: &'a dyn GeoLocator, generic_folders: &'a [String]) -> Self {
        Self {
            exif,
            geo,
            generic_folders,
        }
    }

    /// Read EXIF and fall back on the folder structure. Never fails: an
    /// unreadable file only changes the status string.
    pub fn resolve(&self, path: &Path) -> ResolvedMetadata {
        let mut status = STATUS_NONE.to_string();
        let record = match self.exif.read(path) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "EXIF unreadable, using path");
                status = format!("Erreur EXIF: {}", e);
                ExifRecord::default()
            }
        };

        let (date_label, full_date) = match &record.date_time_original {
            Some(dt) => (date::month_year_label(dt), date::full_date_label(dt)),
            None => (extract_date_from_path(path, self.generic_folders), String::new()),
        };

        ResolvedMetadata {
            date_label,
            full_date,
            taken_at: record.date_time_original,
            coords: record.coords,
            orientation: record.orientation,
            folder_label: best_folder_label(path, self.generic_folders),
            status,
            source_path: path.to_string_lossy().into_owned(),
        }
    }

    /// Compose the caption: geolocated place over folder label, with the date.
    /// Updates `meta.status` when the locator answers.
    pub fn label(&self, meta: &mut ResolvedMetadata) -> MediaLabel {
        let mut location = String::new();
        if let Some((lat, lon)) = meta.coords {
            if let Some(found) = self.geo.best_match(lat, lon) {
                meta.status = found.status.to_string();
                if let Some(place) = found.place() {
                    location = place.to_string();
                }
            }
        }
        if location.is_empty() {
            location = meta.folder_label.clone();
        }

        let full_date = if meta.full_date.is_empty() {
            meta.date_label.clone()
        } else {
            meta.full_date.clone()
        };

        MediaLabel {
            caption: compose(&location, &meta.date_label),
            full_date,
            source_path: meta.source_path.clone(),
        }
    }

    /// Caption for a video: folder label and path date only
    pub fn video_label(&self, path: &Path) -> String {
        compose(
            &best_folder_label(path, self.generic_folders),
            &extract_date_from_path(path, self.generic_folders),
        )
    }
}
