//! School and transit map generation for a named city.
//!
//! This crate turns four local datasets (schools, school attendance zones,
//! transit routes and transit stops) into a single interactive HTML map built
//! on Leaflet. The city is geocoded to a bounding box, every dataset is
//! filtered to that box, schools are left-joined to their zones, and each
//! record becomes a marker, polygon or polyline inside a toggleable layer.
//!
//! # Quick Start
//!
//! ```no_run
//! use map_core::{build_geocoder, pipeline, MapConfig};
//!
//! let config = MapConfig::from_json_file("map.json").unwrap();
//! let geocoder = build_geocoder(&config.geocoder_kind()).unwrap();
//! let summary = pipeline::run(&config, geocoder.as_ref()).unwrap();
//! println!("wrote {}", summary.output_path.display());
//! ```
//!
//! # Architecture
//!
//! - [`bounds`]: bounding box type and spatial predicates
//! - [`geocode`]: city name → bounding box (Nominatim or fixed)
//! - [`datasets`]: CSV / GeoJSON / GTFS loading
//! - [`filter`]: bounding-box filtering of every dataset
//! - [`join`]: schools ⟕ zones by identifier
//! - [`popup`]: popup HTML interpolated from record fields
//! - [`layers`]: map primitives grouped into feature groups
//! - [`render`]: HTML + JavaScript document
//! - [`output`]: city-keyed output path and file write
//! - [`pipeline`]: the end-to-end run

pub mod bounds;
pub mod config;
pub mod datasets;
pub mod error;
pub mod filter;
pub mod geocode;
pub mod join;
pub mod layers;
pub mod output;
pub mod pipeline;
pub mod popup;
pub mod render;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use bounds::{BoundingBox, BoundsError};
pub use config::{ConfigError, MapConfig};
pub use error::MapError;
pub use geocode::{build_geocoder, GeocodeError, GeocodedPlace, Geocoder, GeocoderKind};
pub use pipeline::{render_map, run, RenderedMap, RunSummary};
