use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{non_empty, parse_lat_lon, DatasetError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchoolLevel {
    Elementary,
    Middle,
    High,
    Other,
}

impl SchoolLevel {
    /// Case-insensitive classification of a free-text level column.
    pub fn classify(raw: Option<&str>) -> SchoolLevel {
        let Some(raw) = raw else {
            return SchoolLevel::Other;
        };
        let lowered = raw.trim().to_ascii_lowercase();
        let has = |needle: &str| lowered.split(|c: char| !c.is_ascii_alphanumeric()).any(|w| w == needle);
        if lowered.contains("elementary") || lowered.contains("primary") || has("es") {
            SchoolLevel::Elementary
        } else if lowered.contains("middle") || lowered.contains("junior") || has("ms") {
            SchoolLevel::Middle
        } else if lowered.contains("high") || lowered.contains("secondary") || has("hs") {
            SchoolLevel::High
        } else {
            SchoolLevel::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SchoolLevel::Elementary => "Elementary",
            SchoolLevel::Middle => "Middle",
            SchoolLevel::High => "High",
            SchoolLevel::Other => "Other",
        }
    }

    pub const ALL: [SchoolLevel; 4] = [
        SchoolLevel::Elementary,
        SchoolLevel::Middle,
        SchoolLevel::High,
        SchoolLevel::Other,
    ];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub school_id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub address: Option<String>,
    pub level: SchoolLevel,
    /// The level column as written in the source, for popups.
    pub level_raw: Option<String>,
    pub grades: Option<String>,
    pub enrollment: Option<u32>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub zone_id: Option<String>,
}

impl School {
    /// Identifier used to join against zone polygons.
    pub fn join_key(&self) -> &str {
        self.zone_id.as_deref().unwrap_or(&self.school_id).trim()
    }
}

#[derive(Clone, Debug, Default)]
pub struct SchoolLoad {
    pub schools: Vec<School>,
    pub skipped: usize,
}

#[derive(Deserialize)]
struct SchoolRow {
    school_id: Option<String>,
    name: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    grades: Option<String>,
    #[serde(default)]
    enrollment: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    zone_id: Option<String>,
}

fn parse_enrollment(raw: Option<String>) -> Option<u32> {
    let raw = non_empty(raw)?;
    let digits: String = raw.chars().filter(|c| *c != ',' && *c != '_').collect();
    digits.parse::<u32>().ok()
}

fn row_to_school(row: SchoolRow) -> Option<School> {
    let school_id = non_empty(row.school_id)?;
    let name = non_empty(row.name)?;
    let (lat, lon) = parse_lat_lon(row.latitude.as_deref(), row.longitude.as_deref())?;
    let level_raw = non_empty(row.level);
    Some(School {
        school_id,
        name,
        lat,
        lon,
        address: non_empty(row.address),
        level: SchoolLevel::classify(level_raw.as_deref()),
        level_raw,
        grades: non_empty(row.grades),
        enrollment: parse_enrollment(row.enrollment),
        phone: non_empty(row.phone),
        website: non_empty(row.website),
        zone_id: non_empty(row.zone_id),
    })
}

/// Read schools from any CSV source. `path` is only used for error messages.
pub fn read_schools<R: Read>(reader: R, path: &Path) -> Result<SchoolLoad, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    collect_schools(&mut rdr, path)
}

pub fn load_schools(path: &Path) -> Result<SchoolLoad, DatasetError> {
    let mut rdr = super::open_csv(path)?;
    collect_schools(&mut rdr, path)
}

fn collect_schools<R: Read>(
    rdr: &mut csv::Reader<R>,
    path: &Path,
) -> Result<SchoolLoad, DatasetError> {
    let mut load = SchoolLoad::default();
    for (idx, record) in rdr.deserialize::<SchoolRow>().enumerate() {
        let row = match record {
            Ok(row) => row,
            Err(err) if err.is_io_error() => {
                return Err(DatasetError::Csv {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
            Err(err) => {
                debug!(row = idx + 2, error = %err, "unreadable school row");
                load.skipped += 1;
                continue;
            }
        };
        match row_to_school(row) {
            Some(school) => load.schools.push(school),
            None => load.skipped += 1,
        }
    }
    if load.skipped > 0 {
        warn!(
            skipped = load.skipped,
            path = %path.display(),
            "skipped school rows with missing ids, names or coordinates"
        );
    }
    Ok(load)
}
