// Observation models: raw snapshot rows and parsed price observations

use crate::error::DataQualityIssue;
use crate::models::price::parse_price;
use crate::models::{Cost, Location, StoreKey};
use serde::{Deserialize, Serialize};

/// One unparsed row of a price snapshot, exactly as ingested
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub store_location: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
}

/// A single observed price of an item at a store location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub store: StoreKey,
    pub address: String,
    pub item: String,
    pub price: Cost,
    pub location: Location,
}

impl PriceObservation {
    pub fn new<A: Into<String>, I: Into<String>>(
        store: StoreKey,
        address: A,
        item: I,
        price: Cost,
        location: Location,
    ) -> Self {
        Self {
            store,
            address: address.into(),
            item: item.into(),
            price,
            location,
        }
    }

    /// Checks the invariants every row of a [`crate::models::Dataset`] holds:
    /// an in-range coordinate and a finite, non-negative price.
    pub fn validate(&self, row: usize) -> Result<(), DataQualityIssue> {
        if Location::checked(self.location.lat, self.location.lon).is_none() {
            return Err(DataQualityIssue::InvalidCoordinate {
                row,
                value: format!("{}, {}", self.location.lat, self.location.lon),
            });
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DataQualityIssue::InvalidPrice {
                row,
                value: self.price.to_string(),
            });
        }
        Ok(())
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_coordinate(row: usize, text: &str) -> Result<f64, DataQualityIssue> {
    text.parse::<f64>()
        .map_err(|_| DataQualityIssue::InvalidCoordinate {
            row,
            value: text.to_string(),
        })
}

impl RawObservation {
    /// Converts the raw row into a typed observation.
    ///
    /// `row` is the zero-based position of the row in its source and is only
    /// used to identify the row in the returned issue.
    pub fn parse(&self, row: usize) -> Result<PriceObservation, DataQualityIssue> {
        let (lat_text, lon_text) = match (present(&self.lat), present(&self.lon)) {
            (Some(lat), Some(lon)) => (lat, lon),
            (None, None) => return Err(DataQualityIssue::MissingCoordinates { row }),
            _ => return Err(DataQualityIssue::PartialCoordinates { row }),
        };

        let lat = parse_coordinate(row, lat_text)?;
        let lon = parse_coordinate(row, lon_text)?;
        let location = Location::checked(lat, lon).ok_or_else(|| {
            DataQualityIssue::InvalidCoordinate {
                row,
                value: format!("{}, {}", lat_text, lon_text),
            }
        })?;

        let price = parse_price(&self.price).ok_or_else(|| DataQualityIssue::InvalidPrice {
            row,
            value: self.price.clone(),
        })?;

        Ok(PriceObservation {
            store: StoreKey::new(self.store_name.trim(), self.store_location.trim()),
            address: self.address.trim().to_string(),
            item: self.item.trim().to_string(),
            price,
            location,
        })
    }
}
