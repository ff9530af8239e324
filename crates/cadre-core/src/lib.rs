pub mod config;
pub mod date;
pub mod error;
pub mod folder;
pub mod geo;
pub mod label;
pub mod media;
pub mod metadata;
pub mod probe;
pub mod render;
pub mod scan;
pub mod select;
pub mod sidecar;
pub mod text;
pub mod tools;
pub mod writer;

use std::cell::Cell;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub use config::Config;
pub use error::{CadreError, Result};

use date::exif::{ExifReader, ExifSource};
use geo::{GeoLocator, PlaceTable};
use metadata::MetadataResolver;
use probe::{DurationProbe, Ffprobe};
use render::{ImageRenderer, PhotoRenderer};
use select::SelectionBudget;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub photos_found: u64,
    pub photos_selected: u64,
    pub photos_written: u64,
    pub photos_failed: u64,
    pub videos_found: u64,
    pub videos_selected: u64,
    pub videos_copied: u64,
    pub videos_failed: u64,
    pub video_bytes: u64,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Type alias for progress callback: (stage, current, total, message).
/// `total` is 0 while unknown.
pub type ProgressCallback<'a> = dyn Fn(&str, u64, u64, &str) + 'a;

/// Progress reporter that emits at most every 200ms, or on completion.
pub struct ProgressReporter<'a> {
    inner: Option<&'a ProgressCallback<'a>>,
    last_emit: Cell<Instant>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(inner: &'a ProgressCallback<'a>) -> Self {
        Self {
            inner: Some(inner),
            last_emit: Cell::new(
                Instant::now()
                    .checked_sub(Duration::from_secs(1))
                    .unwrap_or_else(Instant::now),
            ),
        }
    }

    pub fn silent() -> Self {
        Self {
            inner: None,
            last_emit: Cell::new(Instant::now()),
        }
    }

    pub fn report(&self, stage: &str, current: u64, total: u64, message: &str) {
        let Some(inner) = self.inner else {
            return;
        };
        let is_done = total > 0 && current >= total;
        if !is_done {
            if self.last_emit.get().elapsed() < Duration::from_millis(200) {
                return;
            }
            self.last_emit.set(Instant::now());
        }
        inner(stage, current, total, message);
    }
}

/// The external collaborators of a run.
pub struct Services<'a> {
    pub exif: &'a dyn ExifSource,
    pub geo: &'a dyn GeoLocator,
    pub renderer: &'a dyn PhotoRenderer,
    pub probe: &'a dyn DurationProbe,
}

/// Run with the real collaborators. The draw is seeded from `config.seed`
/// when set, from OS entropy otherwise.
pub fn run(config: &Config, progress_callback: &ProgressCallback<'_>) -> Result<RunReport> {
    let exif = ExifReader;
    let geo = PlaceTable::new(config.places.clone());
    let renderer = ImageRenderer::from_config(config);
    let probe = Ffprobe::default();
    let services = Services {
        exif: &exif,
        geo: &geo,
        renderer: &renderer,
        probe: &probe,
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    process(config, &services, &mut rng, progress_callback)
}

/// Full pipeline: draw photos and videos, then write each one in turn.
/// Only a missing photo destination stops the run; per-item failures are
/// logged and counted.
pub fn process<R: Rng + ?Sized>(
    config: &Config,
    services: &Services,
    rng: &mut R,
    progress_callback: &ProgressCallback<'_>,
) -> Result<RunReport> {
    if !config.dest_dir.is_dir() {
        return Err(CadreError::DestinationMissing {
            path: config.dest_dir.clone(),
        });
    }

    let progress = ProgressReporter::new(progress_callback);
    let mut report = RunReport::default();
    let resolver = MetadataResolver::new(services.exif, services.geo, &config.generic_folders);

    // Stage 1: Scan source
    let scan = scan::scan_source(&config.source_dir, &progress);
    report.photos_found = scan.photos.len() as u64;
    report.videos_found = scan.videos.len() as u64;
    tracing::info!(photos = scan.photos.len(), videos = scan.videos.len(), "scan done");

    // Stage 2: Photos
    if !scan.photos.is_empty() {
        let selection = select::select_photos(&scan.photos, config.nb_images, rng);
        let total = selection.len();
        report.photos_selected = total as u64;

        for (i, item) in selection.items.iter().enumerate() {
            progress.report("photos", i as u64 + 1, total as u64, &item.sequence_id);
            match writer::write_photo(item, total, &resolver, services.renderer, &config.dest_dir) {
                Ok(_) => report.photos_written += 1,
                Err(e) => {
                    tracing::error!(id = %item.sequence_id, error = %e, "photo skipped");
                    report.photos_failed += 1;
                    report.warnings.push(format!("photo {}: {}", item.sequence_id, e));
                }
            }
        }
    }

    // Stage 3: Videos
    if !scan.videos.is_empty() {
        let budget = SelectionBudget {
            limit_bytes: config.video_limit_bytes(),
            min_item_bytes: config.video_min_bytes(),
        };
        tracing::info!(limit_mb = config.video_limit_mb, "drawing videos");

        if let Err(e) = writer::prepare_video_dir(&config.video_dest_dir) {
            tracing::error!(error = %e, "cannot prepare video destination, skipping videos");
            report.warnings.push(format!("videos: {}", e));
            return Ok(report);
        }

        let selection = select::select_videos(&scan.videos, budget, rng);
        let total = selection.len() as u64;
        report.videos_selected = total;

        for (i, item) in selection.items.iter().enumerate() {
            progress.report("videos", i as u64 + 1, total, &item.sequence_id);
            match writer::copy_video(item, &resolver, services.probe, &config.video_dest_dir) {
                Ok(_) => {
                    report.videos_copied += 1;
                    report.video_bytes += item.file.size;
                }
                Err(e) => {
                    tracing::error!(id = %item.sequence_id, error = %e, "video skipped");
                    report.videos_failed += 1;
                    report.warnings.push(format!("video {}: {}", item.sequence_id, e));
                }
            }
        }
        tracing::info!(
            count = report.videos_copied,
            total_mb = format_args!("{:.1}", report.video_bytes as f64 / 1024.0 / 1024.0),
            "videos done"
        );
    }

    Ok(report)
}
