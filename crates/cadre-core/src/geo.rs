use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Place;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoStatus {
    Matched,
    NoMatch,
}

impl fmt::Display for GeoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoStatus::Matched => write!(f, "Lieu trouvé"),
            GeoStatus::NoMatch => write!(f, "Aucun lieu proche"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMatch {
    pub label: String,
    pub status: GeoStatus,
}

impl GeoMatch {
    /// Label usable as a caption location
    pub fn place(&self) -> Option<&str> {
        (self.status == GeoStatus::Matched && !self.label.is_empty()).then_some(self.label.as_str())
    }
}

/// Turns coordinates into a place name. `None` means the locator has no opinion.
pub trait GeoLocator {
    fn best_match(&self, lat: f64, lon: f64) -> Option<GeoMatch>;
}

/// Nearest configured place whose radius covers the point.
#[derive(Debug, Clone, Default)]
pub struct PlaceTable {
    places: Vec<Place>,
}

impl PlaceTable {
    pub fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl GeoLocator for PlaceTable {
    fn best_match(&self, lat: f64, lon: f64) -> Option<GeoMatch> {
        if self.places.is_empty() || !lat.is_finite() || !lon.is_finite() {
            return None;
        }

        let nearest = self
            .places
            .iter()
            .map(|p| (p, haversine_km(lat, lon, p.lat, p.lon)))
            .filter(|(p, d)| *d <= p.radius_km)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        Some(match nearest {
            Some((place, _)) => GeoMatch {
                label: place.name.clone(),
                status: GeoStatus::Matched,
            },
            None => GeoMatch {
                label: String::new(),
                status: GeoStatus::NoMatch,
            },
        })
    }
}

/// Great-circle distance in kilometres
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}
