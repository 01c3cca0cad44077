//! Loading of the four input datasets.
//!
//! - schools: CSV with one row per school
//! - zones: GeoJSON `FeatureCollection` of attendance-zone polygons
//! - transit: a GTFS feed directory (routes, stops, trips, shapes)
//!
//! Loading never filters; malformed individual records are skipped and
//! counted so one bad row does not abort a whole map.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

mod schools;
mod transit;
mod zones;

pub use schools::{load_schools, read_schools, School, SchoolLevel, SchoolLoad};
pub use transit::{load_transit, TransitFeed, TransitRoute, TransitSkips, TransitStop};
pub use zones::{load_zones, parse_zones, Zone, ZoneLoad};

#[derive(Debug)]
pub enum DatasetError {
    Io { path: PathBuf, source: std::io::Error },
    Csv { path: PathBuf, source: csv::Error },
    GeoJson { path: PathBuf, message: String },
    MissingFile(PathBuf),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Io { path, source } => {
                write!(f, "failed to read '{}': {source}", path.display())
            }
            DatasetError::Csv { path, source } => {
                write!(f, "failed to parse CSV '{}': {source}", path.display())
            }
            DatasetError::GeoJson { path, message } => {
                write!(f, "failed to parse GeoJSON '{}': {message}", path.display())
            }
            DatasetError::MissingFile(path) => {
                write!(f, "required file '{}' does not exist", path.display())
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io { source, .. } => Some(source),
            DatasetError::Csv { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub(crate) fn open_csv(path: &Path) -> Result<csv::Reader<File>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::MissingFile(path.to_path_buf()));
    }
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|source| DatasetError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Trimmed, non-empty text or `None`.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses a WGS84 coordinate pair, rejecting out-of-range values.
pub(crate) fn parse_lat_lon(lat: Option<&str>, lon: Option<&str>) -> Option<(f64, f64)> {
    let lat = lat?.trim().parse::<f64>().ok()?;
    let lon = lon?.trim().parse::<f64>().ok()?;
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }
    Some((lat, lon))
}
