// Price snapshot loading from CSV

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::models::{DataQualityReport, Dataset, Location, RawObservation};
use crate::utils::geocode::{normalize_address, Geocoder};
use crate::utils::store_directory::StoreDirectory;

/// Outcome of filling missing coordinates, counted per row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinateFill {
    pub resolved: usize,
    pub unresolved: usize,
}

/// Reads raw rows from CSV with headers
/// `store_name,store_location,address,item,price,lat,lon`
pub fn read_raw_observations<R: Read>(reader: R) -> Result<Vec<RawObservation>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Fills blank addresses from the directory; returns how many rows were filled
pub fn fill_missing_addresses(rows: &mut [RawObservation], directory: &StoreDirectory) -> usize {
    let mut filled = 0;
    for row in rows.iter_mut().filter(|row| row.address.trim().is_empty()) {
        let resolution = directory.resolve(&row.store_name, &row.store_location);
        if let Some(address) = resolution.address() {
            debug!(
                store = %row.store_name,
                location = %row.store_location,
                ?resolution,
                "resolved missing address"
            );
            row.address = address.to_string();
            filled += 1;
        }
    }
    filled
}

fn blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |text| text.trim().is_empty())
}

/// Geocodes rows that have an address but neither latitude nor longitude.
///
/// The geocoder is queried with `"{store_name}, {address}"`, once per
/// normalized address. A geocoder error leaves the rows unresolved.
pub fn fill_missing_coordinates(
    rows: &mut [RawObservation],
    geocoder: &dyn Geocoder,
) -> CoordinateFill {
    let mut lookups: HashMap<String, Option<Location>> = HashMap::new();
    let mut fill = CoordinateFill::default();

    for row in rows.iter_mut() {
        if !blank(&row.lat) || !blank(&row.lon) || row.address.trim().is_empty() {
            continue;
        }

        let resolved = *lookups
            .entry(normalize_address(&row.address))
            .or_insert_with(|| {
                let query = format!("{}, {}", row.store_name.trim(), row.address.trim());
                match geocoder.geocode(&query) {
                    Ok(found) => found.and_then(|l| Location::checked(l.lat, l.lon)),
                    Err(e) => {
                        warn!(%query, error = %e, "geocoding store address failed");
                        None
                    }
                }
            });

        match resolved {
            Some(location) => {
                row.lat = Some(location.lat.to_string());
                row.lon = Some(location.lon.to_string());
                fill.resolved += 1;
            }
            None => fill.unresolved += 1,
        }
    }

    fill
}

/// Builds a dataset from any CSV source.
///
/// Blank addresses are filled from `directory`, then missing coordinates from
/// `geocoder`, before rows are parsed.
pub fn init_dataset_from_reader<R: Read>(
    reader: R,
    directory: Option<&StoreDirectory>,
    geocoder: Option<&dyn Geocoder>,
) -> Result<(Dataset, DataQualityReport), LoadError> {
    let mut rows = read_raw_observations(reader)?;

    if let Some(directory) = directory {
        let filled = fill_missing_addresses(&mut rows, directory);
        if filled > 0 {
            info!(
                filled,
                directory_version = directory.version,
                "filled store addresses from directory"
            );
        }
    }

    let fill = match geocoder {
        Some(geocoder) => fill_missing_coordinates(&mut rows, geocoder),
        None => CoordinateFill::default(),
    };
    if fill.resolved + fill.unresolved > 0 {
        info!(
            resolved = fill.resolved,
            unresolved = fill.unresolved,
            "geocoded rows without coordinates"
        );
    }

    let (dataset, mut report) = Dataset::from_raw(rows);
    report.geocoded_rows = fill.resolved;
    report.ungeocoded_rows = fill.unresolved;
    Ok((dataset, report))
}

/// Loads the price snapshot file at `path`
pub fn init_dataset<P: AsRef<Path>>(
    path: P,
    directory: Option<&StoreDirectory>,
    geocoder: Option<&dyn Geocoder>,
) -> Result<(Dataset, DataQualityReport), LoadError> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading price snapshot");

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let (dataset, report) = init_dataset_from_reader(BufReader::new(file), directory, geocoder)?;

    info!(
        rows = dataset.len(),
        dropped = report.dropped_rows(),
        "loaded price snapshot"
    );
    Ok((dataset, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeocodeError;
    use crate::utils::geocode::GeocodeTable;
    use std::cell::Cell;

    const SNAPSHOT: &str = "\
store_name,store_location,address,item,price,lat,lon
Target,Pineville,\"9531 South Blvd, Charlotte, NC\",Milk 1 gal,$3.29,35.08,-80.87
Walmart,Concord,,Bread,2.00,35.40,-80.60
Aldi,,1 Main St,Eggs,2.10,,
Aldi,,1 Main St,Butter,three,35.2,-80.8
";

    #[test]
    fn test_reads_and_reports() {
        let (dataset, report) = init_dataset_from_reader(SNAPSHOT.as_bytes(), None, None).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(report.total_rows, 4);
        assert_eq!(report.missing_coordinates, 1);
        assert_eq!(report.invalid_prices, 1);

        let milk = &dataset.rows()[0];
        assert_eq!(milk.address, "9531 South Blvd, Charlotte, NC");
        assert_eq!(milk.price, 3.29);
    }

    #[test]
    fn test_directory_fills_blank_address() {
        let mut directory = StoreDirectory::new(1);
        directory.insert("Walmart", "Concord", "5825 Thunder Rd, Concord, NC 28027");

        let (dataset, _) = init_dataset_from_reader(SNAPSHOT.as_bytes(), Some(&directory), None).unwrap();
        assert_eq!(dataset.rows()[1].address, "5825 Thunder Rd, Concord, NC 28027");
    }

    #[test]
    fn test_malformed_csv_is_an_error() {
        let bad: &[u8] = b"store_name,item\n\xff\xfe,milk\n";
        assert!(matches!(
            init_dataset_from_reader(bad, None, None),
            Err(LoadError::Csv(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            init_dataset("definitely/not/here.csv", None, None),
            Err(LoadError::Io { .. })
        ));
    }

    const UNLOCATED: &str = "\
store_name,store_location,address,item,price,lat,lon
Aldi,,1 Main St,Eggs,2.10,,
Aldi,,1  MAIN st,Milk,3.00,,
Lidl,,9 Nowhere Rd,Bread,1.50,,
Food Lion,,,Butter,4.00,,
Target,,2 Oak Ave,Cheese,5.00,35.1,
";

    #[test]
    fn test_geocoder_fills_missing_coordinates_once_per_address() {
        let mut table = GeocodeTable::new();
        table.insert("Aldi, 1 Main St", Location::new(35.3, -80.7));
        let queries = Cell::new(0);
        let geocoder = |query: &str| -> Result<Option<Location>, GeocodeError> {
            queries.set(queries.get() + 1);
            table.geocode(query)
        };

        let (dataset, report) =
            init_dataset_from_reader(UNLOCATED.as_bytes(), None, Some(&geocoder)).unwrap();

        assert_eq!(queries.get(), 2);
        assert_eq!(report.geocoded_rows, 2);
        assert_eq!(report.ungeocoded_rows, 1);
        assert_eq!(report.missing_coordinates, 2);
        assert_eq!(report.partial_coordinates, 1);

        let items: Vec<&str> = dataset.rows().iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["Eggs", "Milk"]);
        assert!(dataset
            .rows()
            .iter()
            .all(|r| r.location == Location::new(35.3, -80.7)));
    }

    #[test]
    fn test_geocoder_failure_leaves_rows_unresolved() {
        let failing = |_: &str| -> Result<Option<Location>, GeocodeError> {
            Err(GeocodeError::new("service unavailable"))
        };

        let (dataset, report) =
            init_dataset_from_reader(UNLOCATED.as_bytes(), None, Some(&failing)).unwrap();

        assert!(dataset.is_empty());
        assert_eq!(report.geocoded_rows, 0);
        assert_eq!(report.ungeocoded_rows, 3);
        assert_eq!(report.missing_coordinates, 4);
    }
}
