//! Map primitives and the feature groups that hold them.
//!
//! Every record becomes one [`MapItem`]; items are grouped into named,
//! independently toggleable [`FeatureGroup`]s. Items serialize straight into
//! the JSON payload the rendered page reads, so field names follow Leaflet's
//! option names.

use std::collections::HashMap;

use geo::{LineString, MultiPolygon};
use rayon::prelude::*;
use serde::Serialize;

use crate::datasets::{SchoolLevel, TransitRoute, TransitStop};
use crate::join::SchoolWithZones;
use crate::popup::{escape_html, route_popup, school_popup, stop_popup};

pub const SCHOOLS_GROUP: &str = "schools";
pub const ZONES_GROUP: &str = "school_zones";
pub const ROUTES_GROUP: &str = "transit_routes";
pub const STOPS_GROUP: &str = "transit_stops";

const SCHOOL_RADIUS: f64 = 7.0;
const STOP_RADIUS: f64 = 3.5;
const STOP_COLOR: &str = "#37474f";

/// `[lat, lon]`, the order Leaflet expects.
pub type LatLon = [f64; 2];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemGeometry {
    CircleMarker { center: LatLon, radius: f64 },
    /// Polygons → rings → vertices.
    Polygon { polygons: Vec<Vec<Vec<LatLon>>> },
    Polyline { path: Vec<LatLon> },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    pub fill_opacity: f64,
}

impl ItemStyle {
    fn marker(color: &str) -> Self {
        Self {
            color: color.to_string(),
            weight: 1.0,
            opacity: 1.0,
            fill_color: Some(color.to_string()),
            fill_opacity: 0.85,
        }
    }

    fn area(color: &str) -> Self {
        Self {
            color: color.to_string(),
            weight: 2.0,
            opacity: 0.9,
            fill_color: Some(color.to_string()),
            fill_opacity: 0.15,
        }
    }

    fn line(color: &str) -> Self {
        Self {
            color: color.to_string(),
            weight: 3.0,
            opacity: 0.75,
            fill_color: None,
            fill_opacity: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapItem {
    pub geometry: ItemGeometry,
    pub style: ItemStyle,
    pub popup: String,
    /// Escaped HTML, like `popup`.
    pub tooltip: Option<String>,
    /// Key tying this item to a click-to-toggle target (school id, route id).
    pub toggle_key: Option<String>,
    /// Not drawn until toggled on.
    pub hidden: bool,
    /// Keys of related items; stops list the routes serving them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureGroup {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub items: Vec<MapItem>,
}

impl FeatureGroup {
    fn new(id: &str, name: &str, items: Vec<MapItem>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            visible: true,
            items,
        }
    }
}

pub struct MapLayersInput<'a> {
    pub schools: &'a [SchoolWithZones],
    pub routes: &'a [TransitRoute],
    pub stops: &'a [TransitStop],
}

pub fn level_color(level: SchoolLevel) -> &'static str {
    match level {
        SchoolLevel::Elementary => "#2e7d32",
        SchoolLevel::Middle => "#f9a825",
        SchoolLevel::High => "#c62828",
        SchoolLevel::Other => "#6a1b9a",
    }
}

fn mode_color(route_type: Option<i32>) -> &'static str {
    match route_type {
        Some(0) | Some(900..=999) => "#00897b",
        Some(1) | Some(400..=499) => "#d81b60",
        Some(2) | Some(100..=199) => "#6d4c41",
        Some(3) | Some(700..=799) => "#1565c0",
        Some(4) | Some(1000..=1099) => "#0277bd",
        _ => "#546e7a",
    }
}

/// `#RRGGBB` from GTFS `route_color` when valid, else a per-mode default.
pub fn route_color(route: &TransitRoute) -> String {
    match route.color.as_deref().map(|c| c.trim().trim_start_matches('#')) {
        Some(hex) if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
            format!("#{}", hex.to_ascii_lowercase())
        }
        _ => mode_color(route.route_type).to_string(),
    }
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

fn latlon(lat: f64, lon: f64) -> LatLon {
    [round6(lat), round6(lon)]
}

fn line_to_path(line: &LineString<f64>) -> Vec<LatLon> {
    line.coords().map(|c| latlon(c.y, c.x)).collect()
}

fn multi_polygon_to_rings(geometry: &MultiPolygon<f64>) -> Vec<Vec<Vec<LatLon>>> {
    geometry
        .iter()
        .map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(line_to_path)
                .collect()
        })
        .collect()
}

fn school_items(schools: &[SchoolWithZones]) -> Vec<MapItem> {
    schools
        .par_iter()
        .map(|entry| {
            let school = &entry.school;
            let has_zone = !entry.zones.is_empty();
            MapItem {
                geometry: ItemGeometry::CircleMarker {
                    center: latlon(school.lat, school.lon),
                    radius: SCHOOL_RADIUS,
                },
                style: ItemStyle::marker(level_color(school.level)),
                popup: school_popup(entry),
                tooltip: Some(escape_html(&school.name)),
                toggle_key: has_zone.then(|| school.school_id.clone()),
                hidden: false,
                links: Vec::new(),
            }
        })
        .collect()
}

fn zone_items(schools: &[SchoolWithZones]) -> Vec<MapItem> {
    schools
        .par_iter()
        .flat_map_iter(|entry| {
            let school = &entry.school;
            let color = level_color(school.level);
            entry.zones.iter().map(move |zone| {
                let title = zone.name.as_deref().unwrap_or(zone.key.as_str());
                MapItem {
                    geometry: ItemGeometry::Polygon {
                        polygons: multi_polygon_to_rings(&zone.geometry),
                    },
                    style: ItemStyle::area(color),
                    popup: format!(
                        "<b>{}</b><br>Attendance zone for {}",
                        escape_html(title),
                        escape_html(&school.name)
                    ),
                    tooltip: None,
                    toggle_key: Some(school.school_id.clone()),
                    hidden: true,
                    links: Vec::new(),
                }
            })
        })
        .collect()
}

fn route_items(routes: &[TransitRoute]) -> Vec<MapItem> {
    routes
        .par_iter()
        .flat_map_iter(|route| {
            let color = route_color(route);
            let popup = route_popup(route, &color);
            route.shapes.iter().map(move |shape| MapItem {
                geometry: ItemGeometry::Polyline {
                    path: line_to_path(shape),
                },
                style: ItemStyle::line(&color),
                popup: popup.clone(),
                tooltip: Some(escape_html(route.display_name())),
                toggle_key: Some(route.route_id.clone()),
                hidden: false,
                links: Vec::new(),
            })
        })
        .collect()
}

fn stop_items(stops: &[TransitStop], routes: &[TransitRoute]) -> Vec<MapItem> {
    let names: HashMap<&str, &str> = routes
        .iter()
        .map(|route| (route.route_id.as_str(), route.display_name()))
        .collect();
    stops
        .par_iter()
        .map(|stop| {
            let route_names: Vec<&str> = stop
                .route_ids
                .iter()
                .map(|id| names.get(id.as_str()).copied().unwrap_or(id.as_str()))
                .collect();
            MapItem {
                geometry: ItemGeometry::CircleMarker {
                    center: latlon(stop.lat, stop.lon),
                    radius: STOP_RADIUS,
                },
                style: ItemStyle::marker(STOP_COLOR),
                popup: stop_popup(stop, &route_names),
                tooltip: stop.name.as_deref().map(escape_html),
                toggle_key: None,
                hidden: false,
                links: stop.route_ids.clone(),
            }
        })
        .collect()
}

/// Build the four feature groups in draw order: zones under routes under
/// stops under schools is achieved by the page adding groups in this order.
pub fn build_layers(input: &MapLayersInput<'_>) -> Vec<FeatureGroup> {
    vec![
        FeatureGroup::new(ZONES_GROUP, "School zones", zone_items(input.schools)),
        FeatureGroup::new(ROUTES_GROUP, "Transit routes", route_items(input.routes)),
        FeatureGroup::new(STOPS_GROUP, "Transit stops", stop_items(input.stops, input.routes)),
        FeatureGroup::new(SCHOOLS_GROUP, "Schools", school_items(input.schools)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_route, sample_school, sample_stop, sample_zone};

    fn input_fixture() -> (Vec<SchoolWithZones>, Vec<TransitRoute>, Vec<TransitStop>) {
        let mut high = sample_school("S1", 45.5, -122.6);
        high.level = SchoolLevel::High;
        let schools = vec![
            SchoolWithZones {
                school: high,
                zones: vec![
                    sample_zone("S1", (45.4, 45.6), (-122.7, -122.5)),
                    sample_zone("S1", (45.6, 45.7), (-122.7, -122.5)),
                ],
            },
            SchoolWithZones {
                school: sample_school("S2", 45.55, -122.65),
                zones: vec![],
            },
        ];
        let mut r1 = sample_route("R1", vec![(45.5, -122.6), (45.51, -122.61)]);
        r1.short_name = Some("12".to_string());
        r1.color = Some("1E88E5".to_string());
        let routes = vec![r1, sample_route("R2", vec![])];
        let mut stop = sample_stop("P1", 45.5, -122.6);
        stop.route_ids = vec!["R1".to_string(), "R404".to_string()];
        (schools, routes, vec![stop])
    }

    #[test]
    fn groups_come_in_draw_order() {
        let (schools, routes, stops) = input_fixture();
        let groups = build_layers(&MapLayersInput {
            schools: &schools,
            routes: &routes,
            stops: &stops,
        });
        let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec![ZONES_GROUP, ROUTES_GROUP, STOPS_GROUP, SCHOOLS_GROUP]);
        assert!(groups.iter().all(|g| g.visible));
    }

    #[test]
    fn schools_and_zones_share_toggle_keys() {
        let (schools, routes, stops) = input_fixture();
        let groups = build_layers(&MapLayersInput {
            schools: &schools,
            routes: &routes,
            stops: &stops,
        });
        let zones = &groups[0].items;
        let markers = &groups[3].items;

        assert_eq!(zones.len(), 2);
        assert!(zones.iter().all(|z| z.hidden && z.toggle_key.as_deref() == Some("S1")));
        assert_eq!(zones[0].style.color, level_color(SchoolLevel::High));

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].toggle_key.as_deref(), Some("S1"));
        // No zone, nothing to toggle.
        assert_eq!(markers[1].toggle_key, None);
        assert_eq!(markers[1].tooltip.as_deref(), Some("School S2"));
    }

    #[test]
    fn routes_without_geometry_produce_no_polyline() {
        let (schools, routes, stops) = input_fixture();
        let groups = build_layers(&MapLayersInput {
            schools: &schools,
            routes: &routes,
            stops: &stops,
        });
        let lines = &groups[1].items;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].style.color, "#1e88e5");
        assert_eq!(lines[0].toggle_key.as_deref(), Some("R1"));
        match &lines[0].geometry {
            ItemGeometry::Polyline { path } => assert_eq!(path[0], [45.5, -122.6]),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn stops_link_routes_and_name_them_in_popup() {
        let (schools, routes, stops) = input_fixture();
        let groups = build_layers(&MapLayersInput {
            schools: &schools,
            routes: &routes,
            stops: &stops,
        });
        let stop = &groups[2].items[0];
        assert_eq!(stop.links, vec!["R1".to_string(), "R404".to_string()]);
        assert!(stop.popup.contains("<b>Routes:</b> 12, R404"));
    }

    #[test]
    fn route_color_validates_hex() {
        let mut route = sample_route("R", vec![]);
        route.color = Some("#ABCDEF".to_string());
        assert_eq!(route_color(&route), "#abcdef");
        route.color = Some("red".to_string());
        assert_eq!(route_color(&route), "#1565c0");
        route.route_type = Some(1);
        route.color = None;
        assert_eq!(route_color(&route), "#d81b60");
    }

    #[test]
    fn items_serialize_with_leaflet_option_names() {
        let item = MapItem {
            geometry: ItemGeometry::CircleMarker {
                center: [1.0, 2.0],
                radius: 3.0,
            },
            style: ItemStyle::marker("#000000"),
            popup: String::new(),
            tooltip: None,
            toggle_key: None,
            hidden: false,
            links: Vec::new(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["geometry"]["type"], "circle_marker");
        assert_eq!(json["style"]["fillOpacity"], 0.85);
        assert!(json.get("links").is_none());
    }
}
