//! Test helpers for building in-memory records.
//!
//! This module provides small constructors shared by unit tests, integration
//! tests and benchmarks so each does not have to spell out every field.

use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::bounds::BoundingBox;
use crate::datasets::{School, SchoolLevel, TransitRoute, TransitStop, Zone};

/// A box around central Portland, Oregon, used across tests for consistency.
pub fn test_bbox() -> BoundingBox {
    BoundingBox {
        min_lat: 45.43,
        max_lat: 45.65,
        min_lon: -122.84,
        max_lon: -122.47,
    }
}

/// A school with only the required fields populated.
pub fn sample_school(id: &str, lat: f64, lon: f64) -> School {
    School {
        school_id: id.to_string(),
        name: format!("School {id}"),
        lat,
        lon,
        address: None,
        level: SchoolLevel::Other,
        level_raw: None,
        grades: None,
        enrollment: None,
        phone: None,
        website: None,
        zone_id: None,
    }
}

/// An axis-aligned rectangular zone spanning the given latitude/longitude ranges.
pub fn sample_zone(key: &str, lat: (f64, f64), lon: (f64, f64)) -> Zone {
    let ring = LineString::new(vec![
        Coord { x: lon.0, y: lat.0 },
        Coord { x: lon.1, y: lat.0 },
        Coord { x: lon.1, y: lat.1 },
        Coord { x: lon.0, y: lat.1 },
        Coord { x: lon.0, y: lat.0 },
    ]);
    Zone {
        key: key.to_string(),
        name: None,
        geometry: MultiPolygon::new(vec![Polygon::new(ring, vec![])]),
    }
}

/// A bus route with one shape through the given `(lat, lon)` points.
/// An empty point list yields a route without geometry.
pub fn sample_route(id: &str, points: Vec<(f64, f64)>) -> TransitRoute {
    let shapes = if points.is_empty() {
        Vec::new()
    } else {
        vec![LineString::new(
            points
                .into_iter()
                .map(|(lat, lon)| Coord { x: lon, y: lat })
                .collect(),
        )]
    };
    TransitRoute {
        route_id: id.to_string(),
        short_name: Some(id.to_string()),
        long_name: None,
        route_type: Some(3),
        color: None,
        shapes,
    }
}

pub fn sample_stop(id: &str, lat: f64, lon: f64) -> TransitStop {
    TransitStop {
        stop_id: id.to_string(),
        name: Some(format!("Stop {id}")),
        lat,
        lon,
        route_ids: Vec::new(),
    }
}
