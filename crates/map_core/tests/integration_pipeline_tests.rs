mod support;

use std::sync::atomic::{AtomicUsize, Ordering};

use map_core::datasets::TransitSkips;
use map_core::geocode::FixedGeocoder;
use map_core::pipeline::DatasetSummary;
use map_core::{
    render_map, run, BoundingBox, BoundsError, ConfigError, GeocodeError, GeocodedPlace, Geocoder,
    MapError,
};
use support::fixtures::{town_bbox, Fixture, SHAPES_TXT, STOP_TIMES_TXT};

struct NoResults;

impl Geocoder for NoResults {
    fn geocode(&self, query: &str) -> Result<GeocodedPlace, GeocodeError> {
        Err(GeocodeError::NotFound(query.to_string()))
    }
}

#[derive(Default)]
struct CountingGeocoder {
    calls: AtomicUsize,
}

impl Geocoder for CountingGeocoder {
    fn geocode(&self, query: &str) -> Result<GeocodedPlace, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        FixedGeocoder::new(town_bbox()).geocode(query)
    }
}

#[test]
fn full_run_writes_city_keyed_html_and_reports_counts() {
    let fixture = Fixture::new();
    let config = fixture.config("Testville, PA");

    let summary = run(&config, &FixedGeocoder::new(town_bbox())).expect("run should succeed");

    assert_eq!(
        summary.output_path,
        fixture.join("out").join("testville_pa_school_transit_map.html")
    );
    assert!(summary.output_path.is_file());
    assert_eq!(summary.bbox, town_bbox());
    assert_eq!(summary.place, "Testville, PA");

    assert_eq!(summary.schools, DatasetSummary { skipped: 2, kept: 2, dropped: 1 });
    assert_eq!(summary.zones, DatasetSummary { skipped: 1, kept: 3, dropped: 1 });
    assert_eq!(summary.routes, DatasetSummary { skipped: 0, kept: 2, dropped: 1 });
    assert_eq!(summary.stops, DatasetSummary { skipped: 1, kept: 2, dropped: 1 });
    assert_eq!(summary.transit_skipped, TransitSkips { stops: 1, ..TransitSkips::default() });
    assert_eq!(summary.matched_schools, 2);
    assert_eq!(summary.unmatched_zones, vec!["ORPHAN".to_string()]);

    let html = std::fs::read_to_string(&summary.output_path).unwrap();
    assert!(html.contains("<title>Testville, PA: schools and transit</title>"));
    assert!(html.contains("Maple Elementary"));
    assert!(html.contains("Oak Middle"));
    assert!(!html.contains("Far Away High"));
    assert!(html.contains("1,204"));
    assert!(html.contains("Maple Zone"));
    assert!(html.contains("Maple &amp; 1st"));
    assert!(html.contains("#ff0000"));
    assert!(html.contains("10, Crosstown Express"));
    assert!(!html.contains("Regional Rail"));
    assert!(!html.contains("ORPHAN"));
}

#[test]
fn render_map_does_not_touch_the_filesystem() {
    let fixture = Fixture::new();
    let config = fixture.config("Testville");
    let geocoder = CountingGeocoder::default();

    let rendered = render_map(&config, &geocoder).unwrap();

    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    assert!(rendered.html.starts_with("<!DOCTYPE html>"));
    assert!(!rendered.summary.output_path.exists());
    assert!(!fixture.join("out").exists());
}

#[test]
fn padding_widens_the_geocoded_box() {
    let fixture = Fixture::new();
    let mut config = fixture.config("Testville");
    config.padding_deg = 1.5;

    let summary = run(&config, &FixedGeocoder::new(town_bbox())).unwrap();

    assert_eq!(summary.schools.kept, 3);
    assert!((summary.bbox.max_lat - 41.6).abs() < 1e-9);
    assert!((summary.bbox.min_lon - -76.6).abs() < 1e-9);
}

#[test]
fn explicit_bbox_is_not_padded() {
    let fixture = Fixture::new();
    let mut config = fixture.config("Testville");
    config.padding_deg = 1.5;
    config.bbox = Some(town_bbox());

    let summary = run(&config, &FixedGeocoder::new(town_bbox())).unwrap();

    assert_eq!(summary.bbox, town_bbox());
    assert_eq!(summary.schools.kept, 2);
    assert_eq!(summary.schools.dropped, 1);
}

#[test]
fn malformed_gtfs_rows_are_skipped_not_fatal() {
    let fixture = Fixture::new();
    fixture.write("gtfs/shapes.txt", &format!("{SHAPES_TXT}SH10,,-75.03,4\n"));
    fixture.write("gtfs/stop_times.txt", &format!("{STOP_TIMES_TXT}T20,09:00:00\n"));

    let summary = run(&fixture.config("Testville"), &FixedGeocoder::new(town_bbox()))
        .expect("bad GTFS rows should not fail the run");

    assert_eq!(summary.routes, DatasetSummary { skipped: 0, kept: 2, dropped: 1 });
    assert_eq!(summary.transit_skipped.shape_points, 1);
    assert_eq!(summary.transit_skipped.stop_times, 1);
    assert_eq!(summary.transit_skipped.stops, 1);
    let html = std::fs::read_to_string(&summary.output_path).unwrap();
    assert!(html.contains("10, Crosstown Express"));
}

#[test]
fn geocoding_failure_stops_before_writing() {
    let fixture = Fixture::new();
    let config = fixture.config("Atlantis");

    let err = run(&config, &NoResults).unwrap_err();

    assert!(matches!(err, MapError::Geocode(GeocodeError::NotFound(ref q)) if q == "Atlantis"));
    assert!(!fixture.join("out").exists());
}

#[test]
fn invalid_config_is_rejected_before_geocoding() {
    let fixture = Fixture::new();
    let mut config = fixture.config("Testville");
    config.transit_dir = fixture.join("no-such-feed");
    let geocoder = CountingGeocoder::default();

    let err = render_map(&config, &geocoder).unwrap_err();

    assert!(matches!(err, MapError::Config(_)));
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn inverted_bbox_is_a_config_error() {
    let fixture = Fixture::new();
    let mut config = fixture.config("Testville");
    config.bbox = Some(BoundingBox {
        min_lat: 40.1,
        max_lat: 40.0,
        min_lon: -75.1,
        max_lon: -75.0,
    });
    let geocoder = CountingGeocoder::default();

    let err = render_map(&config, &geocoder).unwrap_err();

    assert!(matches!(
        err,
        MapError::Config(ConfigError::Bounds(BoundsError::Inverted { axis: "latitude", .. }))
    ));
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn missing_required_gtfs_file_is_a_dataset_error() {
    let fixture = Fixture::new();
    fixture.remove("gtfs/trips.txt");

    let err = run(&fixture.config("Testville"), &FixedGeocoder::new(town_bbox())).unwrap_err();

    assert!(matches!(err, MapError::Dataset(_)));
    assert!(err.to_string().contains("trips.txt"));
}

#[test]
fn without_stop_routes_unshaped_routes_are_dropped() {
    let fixture = Fixture::new();
    let mut config = fixture.config("Testville");
    config.include_stop_routes = false;

    let summary = run(&config, &FixedGeocoder::new(town_bbox())).unwrap();

    // R20 has no shape and no stop lists it any more.
    assert_eq!(summary.routes.kept, 1);
    let html = std::fs::read_to_string(&summary.output_path).unwrap();
    assert!(!html.contains("Crosstown Express"));
}

#[test]
fn rerun_replaces_previous_output() {
    let fixture = Fixture::new();
    let config = fixture.config("Testville");
    let geocoder = FixedGeocoder::new(town_bbox());

    let first = run(&config, &geocoder).unwrap();
    fixture.write("schools.csv", "school_id,name,latitude,longitude\nS9,Birch Academy,40.05,-75.05\n");
    let second = run(&config, &geocoder).unwrap();

    assert_eq!(first.output_path, second.output_path);
    let html = std::fs::read_to_string(&second.output_path).unwrap();
    assert!(html.contains("Birch Academy"));
    assert!(!html.contains("Maple Elementary"));
}
