use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CadreError, Result};

const BYTES_PER_MB: u64 = 1024 * 1024;

fn default_jpeg_quality() -> u8 {
    90
}

/// A named place for the built-in geolocation table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Place {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
}

/// Run configuration, loaded once and passed by reference everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub video_dest_dir: PathBuf,
    pub screen_w: u32,
    pub screen_h: u32,
    pub nb_images: usize,
    pub video_limit_mb: u64,
    /// Substrings (case-insensitive) marking folder names that say nothing about the content
    pub generic_folders: Vec<String>,
    #[serde(default)]
    pub video_min_mb: u64,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default)]
    pub places: Vec<Place>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| CadreError::io(path, e))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| CadreError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| CadreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.screen_w == 0 || self.screen_h == 0 {
            return Err(CadreError::Config(format!(
                "screen size must be non-zero, got {}x{}",
                self.screen_w, self.screen_h
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CadreError::Config(format!(
                "JPEG_QUALITY must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        for place in &self.places {
            if place.radius_km <= 0.0 {
                return Err(CadreError::Config(format!(
                    "place {:?} has a non-positive radius",
                    place.name
                )));
            }
            if !(-90.0..=90.0).contains(&place.lat) || !(-180.0..=180.0).contains(&place.lon) {
                return Err(CadreError::Config(format!(
                    "place {:?} has out-of-range coordinates ({}, {})",
                    place.name, place.lat, place.lon
                )));
            }
        }
        Ok(())
    }

    pub fn video_limit_bytes(&self) -> u64 {
        self.video_limit_mb.saturating_mul(BYTES_PER_MB)
    }

    pub fn video_min_bytes(&self) -> u64 {
        self.video_min_mb.saturating_mul(BYTES_PER_MB)
    }
}
