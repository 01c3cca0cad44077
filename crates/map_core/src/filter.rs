//! Bounding-box filtering of every dataset.
//!
//! Points (schools, stops) are kept when the box contains them. Shapes
//! (zones, routes) are kept when their bounding rectangle intersects the box;
//! geometry is never clipped.

use std::collections::HashSet;

use serde::Serialize;

use crate::bounds::BoundingBox;
use crate::datasets::{School, TransitRoute, TransitStop, Zone};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub kept: usize,
    pub dropped: usize,
}

impl FilterStats {
    fn from_counts(before: usize, after: usize) -> Self {
        Self {
            kept: after,
            dropped: before - after,
        }
    }
}

pub fn filter_schools(schools: Vec<School>, bbox: &BoundingBox) -> (Vec<School>, FilterStats) {
    let before = schools.len();
    let kept: Vec<School> = schools
        .into_iter()
        .filter(|school| bbox.contains(school.lat, school.lon))
        .collect();
    let stats = FilterStats::from_counts(before, kept.len());
    (kept, stats)
}

pub fn filter_stops(stops: Vec<TransitStop>, bbox: &BoundingBox) -> (Vec<TransitStop>, FilterStats) {
    let before = stops.len();
    let kept: Vec<TransitStop> = stops
        .into_iter()
        .filter(|stop| bbox.contains(stop.lat, stop.lon))
        .collect();
    let stats = FilterStats::from_counts(before, kept.len());
    (kept, stats)
}

pub fn filter_zones(zones: Vec<Zone>, bbox: &BoundingBox) -> (Vec<Zone>, FilterStats) {
    let before = zones.len();
    let kept: Vec<Zone> = zones
        .into_iter()
        .filter(|zone| {
            zone.bounding_rect()
                .map(|rect| bbox.intersects_rect(&rect))
                .unwrap_or(false)
        })
        .collect();
    let stats = FilterStats::from_counts(before, kept.len());
    (kept, stats)
}

/// Routes with geometry are kept when any shape touches the box. Routes
/// without geometry are kept only when one of `kept_stops` lists them.
pub fn filter_routes(
    routes: Vec<TransitRoute>,
    bbox: &BoundingBox,
    kept_stops: &[TransitStop],
) -> (Vec<TransitRoute>, FilterStats) {
    let served: HashSet<&str> = kept_stops
        .iter()
        .flat_map(|stop| stop.route_ids.iter().map(String::as_str))
        .collect();

    let before = routes.len();
    let kept: Vec<TransitRoute> = routes
        .into_iter()
        .filter(|route| {
            if route.shapes.is_empty() {
                served.contains(route.route_id.as_str())
            } else {
                route
                    .bounding_rects()
                    .any(|rect| bbox.intersects_rect(&rect))
            }
        })
        .collect();
    let stats = FilterStats::from_counts(before, kept.len());
    (kept, stats)
}
