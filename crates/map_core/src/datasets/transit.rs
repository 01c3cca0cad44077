use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use geo::{BoundingRect, Coord, LineString, Rect};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{non_empty, open_csv, parse_lat_lon, DatasetError};

#[derive(Clone, Debug, PartialEq)]
pub struct TransitRoute {
    pub route_id: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub route_type: Option<i32>,
    /// `route_color` exactly as written in `routes.txt` (no `#`).
    pub color: Option<String>,
    /// Distinct shapes used by the route's trips, in first-seen order.
    pub shapes: Vec<LineString<f64>>,
}

impl TransitRoute {
    /// Short name, long name, then id.
    pub fn display_name(&self) -> &str {
        self.short_name
            .as_deref()
            .or(self.long_name.as_deref())
            .unwrap_or(&self.route_id)
    }

    pub fn bounding_rects(&self) -> impl Iterator<Item = Rect<f64>> + '_ {
        self.shapes.iter().filter_map(|shape| shape.bounding_rect())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransitStop {
    pub stop_id: String,
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    /// Sorted ids of routes serving this stop; empty when `stop_times.txt` is absent.
    pub route_ids: Vec<String>,
}

/// Rows dropped from each GTFS file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TransitSkips {
    pub routes: usize,
    pub trips: usize,
    /// Unreadable or non-finite `shapes.txt` points.
    pub shape_points: usize,
    /// Unreadable rows plus stops without valid coordinates.
    pub stops: usize,
    pub stop_times: usize,
}

impl TransitSkips {
    pub fn total(&self) -> usize {
        self.routes + self.trips + self.shape_points + self.stops + self.stop_times
    }
}

#[derive(Clone, Debug, Default)]
pub struct TransitFeed {
    pub routes: Vec<TransitRoute>,
    pub stops: Vec<TransitStop>,
    pub skipped: TransitSkips,
}

#[derive(Deserialize)]
struct RouteRow {
    route_id: String,
    #[serde(default)]
    route_short_name: Option<String>,
    #[serde(default)]
    route_long_name: Option<String>,
    #[serde(default)]
    route_type: Option<String>,
    #[serde(default)]
    route_color: Option<String>,
}

#[derive(Deserialize)]
struct TripRow {
    route_id: String,
    trip_id: String,
    #[serde(default)]
    shape_id: Option<String>,
}

#[derive(Deserialize)]
struct ShapeRow {
    shape_id: String,
    shape_pt_lat: f64,
    shape_pt_lon: f64,
    shape_pt_sequence: u32,
}

#[derive(Deserialize)]
struct StopRow {
    stop_id: String,
    #[serde(default)]
    stop_name: Option<String>,
    #[serde(default)]
    stop_lat: Option<String>,
    #[serde(default)]
    stop_lon: Option<String>,
}

#[derive(Deserialize)]
struct StopTimeRow {
    trip_id: String,
    stop_id: String,
}

/// Rows of one GTFS file. Rows that fail to deserialize are logged and
/// counted; IO errors still fail the load.
fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<(Vec<T>, usize), DatasetError> {
    let mut rdr = open_csv(path)?;
    let mut rows = Vec::new();
    let mut skipped = 0;
    for (idx, record) in rdr.deserialize::<T>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(err) if err.is_io_error() => {
                return Err(DatasetError::Csv {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
            Err(err) => {
                debug!(row = idx + 2, path = %path.display(), error = %err, "unreadable GTFS row");
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        warn!(skipped, path = %path.display(), "skipped unreadable GTFS rows");
    }
    Ok((rows, skipped))
}

/// Load a GTFS feed. `routes.txt`, `stops.txt` and `trips.txt` are required;
/// `shapes.txt` and `stop_times.txt` are optional. `stop_times.txt` is only
/// read when `include_stop_routes` is set.
pub fn load_transit(dir: &Path, include_stop_routes: bool) -> Result<TransitFeed, DatasetError> {
    if !dir.is_dir() {
        return Err(DatasetError::MissingFile(dir.to_path_buf()));
    }

    let mut skipped = TransitSkips::default();
    let (route_rows, bad_routes): (Vec<RouteRow>, _) = read_rows(&dir.join("routes.txt"))?;
    skipped.routes = bad_routes;
    let (trip_rows, bad_trips): (Vec<TripRow>, _) = read_rows(&dir.join("trips.txt"))?;
    skipped.trips = bad_trips;

    let shapes_path = dir.join("shapes.txt");
    let shapes = if shapes_path.exists() {
        let (rows, bad_points) = read_rows(&shapes_path)?;
        let (shapes, non_finite) = build_shapes(rows);
        skipped.shape_points = bad_points + non_finite;
        shapes
    } else {
        debug!(dir = %dir.display(), "feed has no shapes.txt; routes will have no geometry");
        HashMap::new()
    };

    let mut shape_ids_by_route: HashMap<&str, Vec<&str>> = HashMap::new();
    for trip in &trip_rows {
        let Some(shape_id) = trip.shape_id.as_deref().filter(|s| !s.is_empty()) else {
            continue;
        };
        let ids = shape_ids_by_route.entry(trip.route_id.as_str()).or_default();
        if !ids.contains(&shape_id) {
            ids.push(shape_id);
        }
    }

    let routes = route_rows
        .into_iter()
        .map(|row| {
            let shapes = shape_ids_by_route
                .get(row.route_id.as_str())
                .map(|ids| {
                    ids.iter()
                        .filter_map(|id| shapes.get(*id).cloned())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            TransitRoute {
                route_type: non_empty(row.route_type).and_then(|t| t.parse::<i32>().ok()),
                short_name: non_empty(row.route_short_name),
                long_name: non_empty(row.route_long_name),
                color: non_empty(row.route_color),
                route_id: row.route_id,
                shapes,
            }
        })
        .collect::<Vec<_>>();

    let stop_routes = if include_stop_routes {
        let stop_times_path = dir.join("stop_times.txt");
        if stop_times_path.exists() {
            let (by_stop, bad_stop_times) = routes_by_stop(&stop_times_path, &trip_rows)?;
            skipped.stop_times = bad_stop_times;
            by_stop
        } else {
            debug!(dir = %dir.display(), "feed has no stop_times.txt; stops will not list routes");
            HashMap::new()
        }
    } else {
        HashMap::new()
    };

    let (stops, skipped_stops) = load_stops(&dir.join("stops.txt"), stop_routes)?;
    skipped.stops = skipped_stops;

    info!(
        routes = routes.len(),
        stops = stops.len(),
        skipped = skipped.total(),
        "loaded transit feed"
    );
    Ok(TransitFeed {
        routes,
        stops,
        skipped,
    })
}

/// Shapes keyed by id, plus the number of non-finite points dropped.
fn build_shapes(rows: Vec<ShapeRow>) -> (HashMap<String, LineString<f64>>, usize) {
    let mut points: HashMap<String, Vec<(u32, Coord<f64>)>> = HashMap::new();
    let mut non_finite = 0;
    for row in rows {
        if !row.shape_pt_lat.is_finite() || !row.shape_pt_lon.is_finite() {
            non_finite += 1;
            continue;
        }
        points.entry(row.shape_id).or_default().push((
            row.shape_pt_sequence,
            Coord {
                x: row.shape_pt_lon,
                y: row.shape_pt_lat,
            },
        ));
    }
    let shapes = points
        .into_iter()
        .filter_map(|(shape_id, mut pts)| {
            pts.sort_by_key(|(sequence, _)| *sequence);
            let coords = pts.into_iter().map(|(_, coord)| coord).collect::<Vec<_>>();
            (coords.len() >= 2).then(|| (shape_id, LineString::new(coords)))
        })
        .collect();
    (shapes, non_finite)
}

fn routes_by_stop(
    path: &Path,
    trips: &[TripRow],
) -> Result<(HashMap<String, BTreeSet<String>>, usize), DatasetError> {
    let route_by_trip: HashMap<&str, &str> = trips
        .iter()
        .map(|trip| (trip.trip_id.as_str(), trip.route_id.as_str()))
        .collect();

    let (rows, skipped): (Vec<StopTimeRow>, _) = read_rows(path)?;
    let mut by_stop: HashMap<String, BTreeSet<String>> = HashMap::new();
    for row in rows {
        match route_by_trip.get(row.trip_id.as_str()) {
            Some(route_id) => {
                by_stop
                    .entry(row.stop_id)
                    .or_default()
                    .insert((*route_id).to_string());
            }
            None => debug!(trip_id = %row.trip_id, "stop_times row references unknown trip"),
        }
    }
    Ok((by_stop, skipped))
}

fn load_stops(
    path: &Path,
    mut stop_routes: HashMap<String, BTreeSet<String>>,
) -> Result<(Vec<TransitStop>, usize), DatasetError> {
    let (rows, mut skipped): (Vec<StopRow>, _) = read_rows(path)?;
    let mut stops = Vec::with_capacity(rows.len());
    let mut missing_coords = 0;
    for row in rows {
        let Some((lat, lon)) = parse_lat_lon(row.stop_lat.as_deref(), row.stop_lon.as_deref())
        else {
            // Stations without coordinates (e.g. generic nodes) are common in GTFS.
            missing_coords += 1;
            continue;
        };
        let route_ids = stop_routes
            .remove(&row.stop_id)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        stops.push(TransitStop {
            stop_id: row.stop_id,
            name: non_empty(row.stop_name),
            lat,
            lon,
            route_ids,
        });
    }
    if missing_coords > 0 {
        warn!(skipped = missing_coords, path = %path.display(), "skipped stops without valid coordinates");
    }
    skipped += missing_coords;
    Ok((stops, skipped))
}
