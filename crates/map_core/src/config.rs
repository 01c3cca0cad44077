//! Run configuration.
//!
//! A [`MapConfig`] can be read from a JSON file; every field has a default so
//! a file only needs the values it changes. The CLI layers its flags on top
//! before calling [`MapConfig::validate`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bounds::{BoundingBox, BoundsError};
use crate::geocode::{GeocoderKind, DEFAULT_NOMINATIM_ENDPOINT, DEFAULT_USER_AGENT};
use crate::render::{RenderOptions, DEFAULT_TILE_ATTRIBUTION, DEFAULT_TILE_URL};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Free-text place name, geocoded unless `bbox` is set.
    pub city: String,
    pub schools_path: PathBuf,
    pub zones_path: PathBuf,
    /// Directory holding `routes.txt`, `stops.txt`, `trips.txt` and optionally
    /// `shapes.txt` and `stop_times.txt`.
    pub transit_dir: PathBuf,
    pub out_dir: PathBuf,
    /// Zone feature property holding the join key.
    pub zone_key: String,
    /// Degrees added on every side of the geocoded box. Ignored when `bbox` is set.
    pub padding_deg: f64,
    /// Skips geocoding entirely when present; used as given, without padding.
    pub bbox: Option<BoundingBox>,
    pub geocoder_endpoint: String,
    pub user_agent: String,
    pub tile_url: String,
    pub tile_attribution: String,
    /// Read `stop_times.txt` to list the routes serving each stop.
    pub include_stop_routes: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            city: String::new(),
            schools_path: PathBuf::new(),
            zones_path: PathBuf::new(),
            transit_dir: PathBuf::new(),
            out_dir: PathBuf::from("out"),
            zone_key: "school_id".to_string(),
            padding_deg: 0.0,
            bbox: None,
            geocoder_endpoint: DEFAULT_NOMINATIM_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            tile_url: DEFAULT_TILE_URL.to_string(),
            tile_attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
            include_stop_routes: true,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    MissingCity,
    MissingPath(&'static str),
    PathNotFound { field: &'static str, path: PathBuf },
    InvalidPadding(f64),
    EmptyValue(&'static str),
    Bounds(BoundsError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config '{}': {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config '{}': {source}", path.display())
            }
            ConfigError::MissingCity => write!(f, "a city name is required"),
            ConfigError::MissingPath(field) => write!(f, "`{field}` is required"),
            ConfigError::PathNotFound { field, path } => {
                write!(f, "`{field}` points at '{}', which does not exist", path.display())
            }
            ConfigError::InvalidPadding(value) => {
                write!(f, "padding must be a finite, non-negative number of degrees (got {value})")
            }
            ConfigError::EmptyValue(field) => write!(f, "`{field}` must not be empty"),
            ConfigError::Bounds(error) => write!(f, "invalid bbox: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Bounds(error) => Some(error),
            _ => None,
        }
    }
}

impl From<BoundsError> for ConfigError {
    fn from(error: BoundsError) -> Self {
        ConfigError::Bounds(error)
    }
}

fn require_path(field: &'static str, path: &Path, dir: bool) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::MissingPath(field));
    }
    let present = if dir { path.is_dir() } else { path.is_file() };
    if !present {
        return Err(ConfigError::PathNotFound {
            field,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

impl MapConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.city.trim().is_empty() {
            return Err(ConfigError::MissingCity);
        }
        require_path("schools_path", &self.schools_path, false)?;
        require_path("zones_path", &self.zones_path, false)?;
        require_path("transit_dir", &self.transit_dir, true)?;
        if !self.padding_deg.is_finite() || self.padding_deg < 0.0 {
            return Err(ConfigError::InvalidPadding(self.padding_deg));
        }
        if self.zone_key.trim().is_empty() {
            return Err(ConfigError::EmptyValue("zone_key"));
        }
        if self.bbox.is_none() && self.geocoder_endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyValue("geocoder_endpoint"));
        }
        if let Some(bbox) = &self.bbox {
            // Deserialized boxes skip the constructor checks.
            BoundingBox::new(bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon)?;
        }
        Ok(())
    }

    /// Fixed when a bbox override is set, Nominatim otherwise.
    pub fn geocoder_kind(&self) -> GeocoderKind {
        match self.bbox {
            Some(bbox) => GeocoderKind::Fixed { bbox },
            None => GeocoderKind::Nominatim {
                endpoint: self.geocoder_endpoint.clone(),
                user_agent: self.user_agent.clone(),
            },
        }
    }

    pub fn render_options(&self, bbox: BoundingBox) -> RenderOptions {
        RenderOptions {
            city: self.city.clone(),
            bbox,
            tile_url: self.tile_url.clone(),
            tile_attribution: self.tile_attribution.clone(),
        }
    }
}
