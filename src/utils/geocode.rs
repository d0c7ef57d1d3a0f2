// Address to coordinate resolution

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{GeocodeError, LoadError};
use crate::models::Location;

/// Resolves free-text addresses to coordinates.
///
/// `Ok(None)` means the address could not be resolved; `Err` means the
/// geocoding service itself failed.
pub trait Geocoder {
    fn geocode(&self, address: &str) -> Result<Option<Location>, GeocodeError>;
}

impl<F> Geocoder for F
where
    F: Fn(&str) -> Result<Option<Location>, GeocodeError>,
{
    fn geocode(&self, address: &str) -> Result<Option<Location>, GeocodeError> {
        self(address)
    }
}

/// Lowercases and collapses whitespace so lookups ignore formatting differences
pub fn normalize_address(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Static address lookup table, e.g. a pre-geocoded cache exported as JSON
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "HashMap<String, Location>")]
pub struct GeocodeTable {
    entries: HashMap<String, Location>,
}

impl From<HashMap<String, Location>> for GeocodeTable {
    fn from(raw: HashMap<String, Location>) -> Self {
        let mut table = GeocodeTable::new();
        for (address, location) in raw {
            table.insert(&address, location);
        }
        table
    }
}

impl GeocodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: &str, location: Location) {
        self.entries.insert(normalize_address(address), location);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads a JSON object mapping addresses to `{ "lat": .., "lon": .. }`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl Geocoder for GeocodeTable {
    fn geocode(&self, address: &str) -> Result<Option<Location>, GeocodeError> {
        let key = normalize_address(address);
        if key.is_empty() {
            return Ok(None);
        }
        Ok(self.entries.get(&key).copied())
    }
}
