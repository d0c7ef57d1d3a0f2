// Location model representing a point on the Earth's surface

use crate::models::Miles;
use crate::utils::distance::haversine_miles;
use serde::{Deserialize, Serialize};

/// Represents a geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    /// Creates a new location with the given latitude and longitude
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns the location only when both components are finite and in range
    pub fn checked(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then(|| Self::new(lat, lon))
    }

    /// Great-circle distance to another location in statute miles
    pub fn distance_to(&self, other: &Location) -> Miles {
        haversine_miles(self, other)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}
