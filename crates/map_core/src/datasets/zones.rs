use std::path::Path;

use geo::{BoundingRect, Coord, LineString, MultiPolygon, Polygon, Rect};
use geojson::{Feature, GeoJson, Value};
use serde_json::Value as JsonValue;
use tracing::warn;

use super::DatasetError;

/// One attendance-zone feature.
#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    /// Join key read from the configured property.
    pub key: String,
    pub name: Option<String>,
    pub geometry: MultiPolygon<f64>,
}

impl Zone {
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.geometry.bounding_rect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ZoneLoad {
    pub zones: Vec<Zone>,
    pub skipped: usize,
}

pub fn load_zones(path: &Path, key_property: &str) -> Result<ZoneLoad, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::MissingFile(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_zones(&text, key_property).map_err(|message| DatasetError::GeoJson {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse a GeoJSON document into zones. Features without a usable key or
/// polygonal geometry are skipped and counted.
pub fn parse_zones(text: &str, key_property: &str) -> Result<ZoneLoad, String> {
    let geojson: GeoJson = text.parse().map_err(|err: geojson::Error| err.to_string())?;
    let features = match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => {
            return Err("expected a FeatureCollection, found a bare geometry".to_string())
        }
    };

    let mut load = ZoneLoad::default();
    for feature in &features {
        match feature_to_zone(feature, key_property) {
            Some(zone) => load.zones.push(zone),
            None => load.skipped += 1,
        }
    }
    if load.skipped > 0 {
        warn!(
            skipped = load.skipped,
            key_property, "skipped zone features without a key or polygon geometry"
        );
    }
    Ok(load)
}

fn feature_to_zone(feature: &Feature, key_property: &str) -> Option<Zone> {
    let key = feature.property(key_property).and_then(property_to_key)?;
    let name = feature
        .property("zone_name")
        .and_then(JsonValue::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let geometry = feature
        .geometry
        .as_ref()
        .and_then(|geometry| value_to_multi_polygon(&geometry.value))?;
    Some(Zone {
        key,
        name,
        geometry,
    })
}

/// String keys are trimmed; integral numbers are rendered without a fraction.
fn property_to_key(value: &JsonValue) -> Option<String> {
    let key = match value {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                let f = n.as_f64()?;
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{}", f as i64)
                } else {
                    f.to_string()
                }
            }
        }
        _ => return None,
    };
    (!key.is_empty()).then_some(key)
}

fn position_to_coord(position: &[f64]) -> Option<Coord<f64>> {
    match position {
        [x, y, ..] if x.is_finite() && y.is_finite() => Some(Coord { x: *x, y: *y }),
        _ => None,
    }
}

fn ring_to_line_string(ring: &[Vec<f64>]) -> Option<LineString<f64>> {
    let coords = ring
        .iter()
        .map(|position| position_to_coord(position))
        .collect::<Option<Vec<_>>>()?;
    (coords.len() >= 3).then(|| LineString::new(coords))
}

fn rings_to_polygon(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    let exterior = ring_to_line_string(exterior)?;
    let interiors = interiors
        .iter()
        .filter_map(|ring| ring_to_line_string(ring))
        .collect();
    Some(Polygon::new(exterior, interiors))
}

fn value_to_multi_polygon(value: &Value) -> Option<MultiPolygon<f64>> {
    match value {
        Value::Polygon(rings) => rings_to_polygon(rings).map(|p| MultiPolygon::new(vec![p])),
        Value::MultiPolygon(polygons) => {
            let polygons = polygons
                .iter()
                .filter_map(|rings| rings_to_polygon(rings))
                .collect::<Vec<_>>();
            (!polygons.is_empty()).then(|| MultiPolygon::new(polygons))
        }
        _ => None,
    }
}
