//! The end-to-end run: geocode → load → filter → join → build layers →
//! render → write.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::bounds::BoundingBox;
use crate::config::MapConfig;
use crate::datasets::{load_schools, load_transit, load_zones, TransitSkips};
use crate::error::MapError;
use crate::filter::{filter_routes, filter_schools, filter_stops, filter_zones, FilterStats};
use crate::geocode::Geocoder;
use crate::join::join_schools_to_zones;
use crate::layers::{build_layers, MapLayersInput};
use crate::output::{output_path, write_html};
use crate::render::render_html;

/// Counts for one input dataset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    /// Records the loader could not use.
    pub skipped: usize,
    /// Records inside the bounding box.
    pub kept: usize,
    /// Records outside the bounding box.
    pub dropped: usize,
}

impl DatasetSummary {
    fn new(skipped: usize, stats: FilterStats) -> Self {
        Self {
            skipped,
            kept: stats.kept,
            dropped: stats.dropped,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub output_path: PathBuf,
    /// Geocoder's name for the place.
    pub place: String,
    pub bbox: BoundingBox,
    pub schools: DatasetSummary,
    pub zones: DatasetSummary,
    pub routes: DatasetSummary,
    pub stops: DatasetSummary,
    /// Per-file GTFS rows the loader dropped.
    pub transit_skipped: TransitSkips,
    pub matched_schools: usize,
    /// Keys of in-box zones no school referenced.
    pub unmatched_zones: Vec<String>,
}

/// A rendered document that has not been written yet.
#[derive(Clone, Debug)]
pub struct RenderedMap {
    pub html: String,
    pub summary: RunSummary,
}

/// Everything except the file write.
pub fn render_map(config: &MapConfig, geocoder: &dyn Geocoder) -> Result<RenderedMap, MapError> {
    config.validate()?;
    let started = Instant::now();

    let place = geocoder.geocode(&config.city)?;
    // An explicit box is used as given.
    let bbox = if config.bbox.is_some() {
        place.bbox
    } else {
        place.bbox.padded(config.padding_deg)
    };
    info!(city = %config.city, place = %place.display_name, %bbox, "resolved bounding box");

    let schools = load_schools(&config.schools_path)?;
    let zones = load_zones(&config.zones_path, &config.zone_key)?;
    let transit = load_transit(&config.transit_dir, config.include_stop_routes)?;
    info!(
        schools = schools.schools.len(),
        zones = zones.zones.len(),
        routes = transit.routes.len(),
        stops = transit.stops.len(),
        "loaded datasets"
    );

    let (kept_schools, school_stats) = filter_schools(schools.schools, &bbox);
    let (kept_zones, zone_stats) = filter_zones(zones.zones, &bbox);
    let (kept_stops, stop_stats) = filter_stops(transit.stops, &bbox);
    let (kept_routes, route_stats) = filter_routes(transit.routes, &bbox, &kept_stops);
    info!(
        schools = school_stats.kept,
        zones = zone_stats.kept,
        routes = route_stats.kept,
        stops = stop_stats.kept,
        "filtered to bounding box"
    );

    let joined = join_schools_to_zones(kept_schools, kept_zones);
    let matched_schools = joined.matched_school_count();
    let unmatched_zones: Vec<String> = joined
        .unmatched_zones
        .iter()
        .map(|zone| zone.key.clone())
        .collect();
    info!(
        matched = matched_schools,
        total = joined.schools.len(),
        "joined schools to zones"
    );
    if !unmatched_zones.is_empty() {
        warn!(count = unmatched_zones.len(), "zones with no matching school are not drawn");
        debug!(keys = ?unmatched_zones, "unmatched zone keys");
    }

    let groups = build_layers(&MapLayersInput {
        schools: &joined.schools,
        routes: &kept_routes,
        stops: &kept_stops,
    });
    let html = render_html(&groups, &config.render_options(bbox))?;
    debug!(
        bytes = html.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "rendered document"
    );

    let summary = RunSummary {
        output_path: output_path(&config.out_dir, &config.city),
        place: place.display_name,
        bbox,
        schools: DatasetSummary::new(schools.skipped, school_stats),
        zones: DatasetSummary::new(zones.skipped, zone_stats),
        routes: DatasetSummary::new(transit.skipped.routes, route_stats),
        stops: DatasetSummary::new(transit.skipped.stops, stop_stats),
        transit_skipped: transit.skipped,
        matched_schools,
        unmatched_zones,
    };
    Ok(RenderedMap { html, summary })
}

/// Render the map and write it to the city-keyed output path.
pub fn run(config: &MapConfig, geocoder: &dyn Geocoder) -> Result<RunSummary, MapError> {
    let RenderedMap { html, summary } = render_map(config, geocoder)?;
    write_html(&summary.output_path, &html)?;
    info!(path = %summary.output_path.display(), "wrote map");
    Ok(summary)
}
