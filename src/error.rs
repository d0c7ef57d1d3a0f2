// Error types for loading snapshots and running the optimizer

use thiserror::Error;

/// Why a request was rejected before any search ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDefect {
    /// The item list is missing or contains only blank entries
    NoItems,
    /// `max_stores` was zero
    ZeroMaxStores,
}

impl std::fmt::Display for RequestDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestDefect::NoItems => write!(f, "no items requested"),
            RequestDefect::ZeroMaxStores => write!(f, "max_stores must be at least 1"),
        }
    }
}

/// Failure reported by a geocoding collaborator (distinct from "no result")
#[derive(Debug, Error)]
#[error("geocoder failure: {message}")]
pub struct GeocodeError {
    pub message: String,
}

impl GeocodeError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Precondition failures of a single optimize call
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("empty request: {0}")]
    EmptyRequest(RequestDefect),

    #[error("invalid budget {0}: must be a finite, non-negative amount")]
    InvalidBudget(f64),

    #[error("could not locate address \"{address}\"")]
    UnresolvableAddress { address: String },

    #[error("geocoding \"{address}\" failed: {source}")]
    Geocoding {
        address: String,
        #[source]
        source: GeocodeError,
    },

    #[error("search space of {combinations} store combinations exceeds the limit of {limit}")]
    SearchSpaceTooLarge { combinations: u128, limit: u128 },
}

/// A dropped snapshot row, identified by its zero-based position in the source
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataQualityIssue {
    #[error("row {row}: missing latitude and longitude")]
    MissingCoordinates { row: usize },

    #[error("row {row}: only one of latitude/longitude present")]
    PartialCoordinates { row: usize },

    #[error("row {row}: invalid coordinate \"{value}\"")]
    InvalidCoordinate { row: usize, value: String },

    #[error("row {row}: invalid price \"{value}\"")]
    InvalidPrice { row: usize, value: String },
}

/// Errors raised while reading snapshots, tables or configuration files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}
