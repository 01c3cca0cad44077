use std::fmt;

use crate::config::ConfigError;
use crate::datasets::DatasetError;
use crate::geocode::GeocodeError;
use crate::output::OutputError;

/// Any failure that stops a run.
#[derive(Debug)]
pub enum MapError {
    Config(ConfigError),
    Geocode(GeocodeError),
    Dataset(DatasetError),
    Render(serde_json::Error),
    Output(OutputError),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Config(error) => write!(f, "configuration error: {error}"),
            MapError::Geocode(error) => write!(f, "geocoding failed: {error}"),
            MapError::Dataset(error) => write!(f, "dataset error: {error}"),
            MapError::Render(error) => write!(f, "failed to serialize map payload: {error}"),
            MapError::Output(error) => write!(f, "output error: {error}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Config(error) => Some(error),
            MapError::Geocode(error) => Some(error),
            MapError::Dataset(error) => Some(error),
            MapError::Render(error) => Some(error),
            MapError::Output(error) => Some(error),
        }
    }
}

impl From<ConfigError> for MapError {
    fn from(error: ConfigError) -> Self {
        MapError::Config(error)
    }
}

impl From<GeocodeError> for MapError {
    fn from(error: GeocodeError) -> Self {
        MapError::Geocode(error)
    }
}

impl From<DatasetError> for MapError {
    fn from(error: DatasetError) -> Self {
        MapError::Dataset(error)
    }
}

impl From<serde_json::Error> for MapError {
    fn from(error: serde_json::Error) -> Self {
        MapError::Render(error)
    }
}

impl From<OutputError> for MapError {
    fn from(error: OutputError) -> Self {
        MapError::Output(error)
    }
}
