// Dataset model: an immutable snapshot of parsed price observations

use crate::error::DataQualityIssue;
use crate::models::{PriceObservation, RawObservation};
use serde::Serialize;
use tracing::warn;

/// Summary of rows dropped while building a dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataQualityReport {
    /// Number of rows inspected
    pub total_rows: usize,

    /// Number of rows kept
    pub accepted_rows: usize,

    pub missing_coordinates: usize,
    pub partial_coordinates: usize,
    pub invalid_coordinates: usize,
    pub invalid_prices: usize,

    /// Rows whose missing coordinates were filled by a geocoder
    pub geocoded_rows: usize,

    /// Rows a geocoder was asked about but could not place
    pub ungeocoded_rows: usize,

    /// Every dropped row with the reason it was dropped
    #[serde(skip)]
    pub issues: Vec<DataQualityIssue>,
}

impl DataQualityReport {
    /// Number of rows dropped for any reason
    pub fn dropped_rows(&self) -> usize {
        self.total_rows - self.accepted_rows
    }

    /// Records one dropped row
    pub fn record(&mut self, issue: DataQualityIssue) {
        match &issue {
            DataQualityIssue::MissingCoordinates { .. } => self.missing_coordinates += 1,
            DataQualityIssue::PartialCoordinates { .. } => self.partial_coordinates += 1,
            DataQualityIssue::InvalidCoordinate { .. } => self.invalid_coordinates += 1,
            DataQualityIssue::InvalidPrice { .. } => self.invalid_prices += 1,
        }
        self.issues.push(issue);
    }
}

/// Ordered, read-only collection of price observations for one optimization run.
///
/// Every row has a valid coordinate pair and a finite, non-negative price,
/// whichever constructor built it. A dataset is never edited in place;
/// a refresh produces a new dataset (see [`crate::utils::snapshot::SharedDataset`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<PriceObservation>,
}

impl Dataset {
    /// Creates a dataset from already parsed observations.
    ///
    /// Rows with an out-of-range or non-finite coordinate, or a negative or
    /// non-finite price, are dropped with a warning.
    pub fn new(rows: Vec<PriceObservation>) -> Self {
        Self::checked(rows).0
    }

    /// Like [`Dataset::new`], also returning what was dropped
    pub fn checked(rows: Vec<PriceObservation>) -> (Self, DataQualityReport) {
        let mut report = DataQualityReport {
            total_rows: rows.len(),
            ..DataQualityReport::default()
        };
        let mut kept = Vec::with_capacity(rows.len());

        for (index, observation) in rows.into_iter().enumerate() {
            match observation.validate(index) {
                Ok(()) => kept.push(observation),
                Err(issue) => report.record(issue),
            }
        }
        report.accepted_rows = kept.len();
        warn_dropped(&report);

        (Self::from_validated(kept), report)
    }

    /// Parses raw snapshot rows, dropping and counting every malformed row
    pub fn from_raw<I>(raw_rows: I) -> (Self, DataQualityReport)
    where
        I: IntoIterator<Item = RawObservation>,
    {
        let mut report = DataQualityReport::default();
        let mut rows = Vec::new();

        for (index, raw) in raw_rows.into_iter().enumerate() {
            report.total_rows += 1;
            match raw.parse(index) {
                Ok(observation) => rows.push(observation),
                Err(issue) => report.record(issue),
            }
        }
        report.accepted_rows = rows.len();
        warn_dropped(&report);

        (Self::from_validated(rows), report)
    }

    /// Rows must already satisfy [`PriceObservation::validate`]
    pub(crate) fn from_validated(rows: Vec<PriceObservation>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PriceObservation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<PriceObservation> for Dataset {
    fn from_iter<T: IntoIterator<Item = PriceObservation>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn warn_dropped(report: &DataQualityReport) {
    if report.dropped_rows() > 0 {
        warn!(
            dropped = report.dropped_rows(),
            missing_coordinates = report.missing_coordinates,
            partial_coordinates = report.partial_coordinates,
            invalid_coordinates = report.invalid_coordinates,
            invalid_prices = report.invalid_prices,
            "dropped malformed snapshot rows"
        );
    }
}
