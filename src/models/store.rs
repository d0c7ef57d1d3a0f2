// Store model representing a physical store location

use crate::models::Location;
use serde::{Deserialize, Serialize};

/// Identity of a store location: retail chain plus location label
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreKey {
    pub chain: String,
    pub label: String,
}

impl StoreKey {
    pub fn new<S: Into<String>, L: Into<String>>(chain: S, label: L) -> Self {
        Self {
            chain: chain.into(),
            label: label.into(),
        }
    }
}

// Display label; not unique across keys
impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.label.is_empty() {
            write!(f, "{}", self.chain)
        } else {
            write!(f, "{} {}", self.chain, self.label)
        }
    }
}

/// A candidate store with its representative address and coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct StoreLocation {
    /// Chain and location label
    pub key: StoreKey,

    /// Street address taken from the first row seen for this store
    pub address: String,

    /// Coordinate taken from the first row seen for this store
    pub location: Location,
}

impl StoreLocation {
    pub fn new(key: StoreKey, address: String, location: Location) -> Self {
        Self {
            key,
            address,
            location,
        }
    }

    /// Label used for route stops, e.g. `"Target Pineville - 9531 South Blvd"`
    pub fn stop_label(&self) -> String {
        format!("{} - {}", self.key, self.address)
    }
}
