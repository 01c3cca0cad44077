//! Geographic bounding boxes used to spatially filter every dataset.
//!
//! Coordinates are WGS84 degrees. Field order follows the conventional
//! `(min latitude, max latitude, min longitude, max longitude)` tuple, which
//! is also how Nominatim reports `boundingbox`.

use std::fmt;
use std::str::FromStr;

use geo::Rect;
use serde::{Deserialize, Serialize};

const MAX_LAT: f64 = 90.0;
const MAX_LON: f64 = 180.0;

/// Inclusive latitude/longitude rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoundsError {
    NonFinite,
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
    Inverted { axis: &'static str, min: f64, max: f64 },
    Parse(String),
}

impl fmt::Display for BoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundsError::NonFinite => write!(f, "bounding box values must be finite"),
            BoundsError::LatitudeOutOfRange(v) => {
                write!(f, "latitude {v} is outside [-90, 90]")
            }
            BoundsError::LongitudeOutOfRange(v) => {
                write!(f, "longitude {v} is outside [-180, 180]")
            }
            BoundsError::Inverted { axis, min, max } => {
                write!(f, "{axis} minimum {min} is greater than maximum {max}")
            }
            BoundsError::Parse(message) => write!(f, "invalid bounding box: {message}"),
        }
    }
}

impl std::error::Error for BoundsError {}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self, BoundsError> {
        if ![min_lat, max_lat, min_lon, max_lon].iter().all(|v| v.is_finite()) {
            return Err(BoundsError::NonFinite);
        }
        for lat in [min_lat, max_lat] {
            if !(-MAX_LAT..=MAX_LAT).contains(&lat) {
                return Err(BoundsError::LatitudeOutOfRange(lat));
            }
        }
        for lon in [min_lon, max_lon] {
            if !(-MAX_LON..=MAX_LON).contains(&lon) {
                return Err(BoundsError::LongitudeOutOfRange(lon));
            }
        }
        if min_lat > max_lat {
            return Err(BoundsError::Inverted {
                axis: "latitude",
                min: min_lat,
                max: max_lat,
            });
        }
        // Antimeridian-crossing boxes land here as well.
        if min_lon > max_lon {
            return Err(BoundsError::Inverted {
                axis: "longitude",
                min: min_lon,
                max: max_lon,
            });
        }
        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    /// Inclusive point containment.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Inclusive overlap test; boxes sharing only an edge intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
            && self.min_lon <= other.max_lon
            && other.min_lon <= self.max_lon
    }

    /// Overlap test against a geometry's bounding rectangle (x = lon, y = lat).
    pub fn intersects_rect(&self, rect: &Rect<f64>) -> bool {
        let (min, max) = (rect.min(), rect.max());
        self.min_lat <= max.y && min.y <= self.max_lat && self.min_lon <= max.x && min.x <= self.max_lon
    }

    /// Grow every side by `degrees`, clamped to the valid coordinate range.
    pub fn padded(&self, degrees: f64) -> BoundingBox {
        let pad = if degrees.is_finite() { degrees.max(0.0) } else { 0.0 };
        BoundingBox {
            min_lat: (self.min_lat - pad).max(-MAX_LAT),
            max_lat: (self.max_lat + pad).min(MAX_LAT),
            min_lon: (self.min_lon - pad).max(-MAX_LON),
            max_lon: (self.max_lon + pad).min(MAX_LON),
        }
    }

    /// `(lat, lon)` midpoint.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Corner pair in the `[[south, west], [north, east]]` form Leaflet expects.
    pub fn to_leaflet_bounds(&self) -> [[f64; 2]; 2] {
        [[self.min_lat, self.min_lon], [self.max_lat, self.max_lon]]
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6},{:.6},{:.6},{:.6}",
            self.min_lat, self.max_lat, self.min_lon, self.max_lon
        )
    }
}

impl FromStr for BoundingBox {
    type Err = BoundsError;

    /// Parses `min_lat,max_lat,min_lon,max_lon`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|err| BoundsError::Parse(format!("'{}': {err}", part.trim())))
            })
            .collect::<Result<Vec<_>, _>>()?;
        match values.as_slice() {
            [min_lat, max_lat, min_lon, max_lon] => {
                BoundingBox::new(*min_lat, *max_lat, *min_lon, *max_lon)
            }
            _ => Err(BoundsError::Parse(format!(
                "expected 4 comma-separated values, got {}",
                values.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    fn berlin() -> BoundingBox {
        BoundingBox::new(52.34, 52.68, 13.08, 13.76).unwrap()
    }

    #[test]
    fn contains_is_inclusive_on_edges() {
        let bbox = berlin();
        assert!(bbox.contains(52.34, 13.08));
        assert!(bbox.contains(52.68, 13.76));
        assert!(bbox.contains(52.5, 13.4));
        assert!(!bbox.contains(52.69, 13.4));
        assert!(!bbox.contains(52.5, 13.07));
    }

    #[test]
    fn touching_boxes_intersect() {
        let bbox = berlin();
        let east = BoundingBox::new(52.4, 52.5, 13.76, 14.0).unwrap();
        let far = BoundingBox::new(48.0, 48.5, 11.0, 11.5).unwrap();
        assert!(bbox.intersects(&east));
        assert!(east.intersects(&bbox));
        assert!(!bbox.intersects(&far));
    }

    #[test]
    fn intersects_rect_uses_lon_as_x() {
        let bbox = berlin();
        let inside = Rect::new(coord! { x: 13.3, y: 52.4 }, coord! { x: 13.5, y: 52.6 });
        let swapped = Rect::new(coord! { x: 52.4, y: 13.3 }, coord! { x: 52.6, y: 13.5 });
        assert!(bbox.intersects_rect(&inside));
        assert!(!bbox.intersects_rect(&swapped));
    }

    #[test]
    fn new_rejects_inverted_and_out_of_range() {
        assert!(matches!(
            BoundingBox::new(10.0, 5.0, 0.0, 1.0),
            Err(BoundsError::Inverted { axis: "latitude", .. })
        ));
        assert!(matches!(
            BoundingBox::new(0.0, 1.0, 179.0, -179.0),
            Err(BoundsError::Inverted { axis: "longitude", .. })
        ));
        assert!(matches!(
            BoundingBox::new(-91.0, 1.0, 0.0, 1.0),
            Err(BoundsError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            BoundingBox::new(0.0, 1.0, 0.0, f64::NAN),
            Err(BoundsError::NonFinite)
        ));
    }

    #[test]
    fn padded_clamps_to_valid_range_and_ignores_negative() {
        let bbox = BoundingBox::new(89.5, 90.0, 179.0, 180.0).unwrap();
        let padded = bbox.padded(1.0);
        assert_eq!(padded.max_lat, 90.0);
        assert_eq!(padded.max_lon, 180.0);
        assert_eq!(padded.min_lat, 88.5);
        assert_eq!(bbox.padded(-3.0), bbox);
    }

    #[test]
    fn parses_cli_form() {
        let bbox: BoundingBox = " 52.34, 52.68 ,13.08,13.76".parse().unwrap();
        assert_eq!(bbox, berlin());
        assert!("1,2,3".parse::<BoundingBox>().is_err());
        assert!("a,b,c,d".parse::<BoundingBox>().is_err());
    }

    #[test]
    fn center_and_leaflet_bounds() {
        let bbox = BoundingBox::new(10.0, 20.0, 30.0, 50.0).unwrap();
        assert_eq!(bbox.center(), (15.0, 40.0));
        assert_eq!(bbox.to_leaflet_bounds(), [[10.0, 30.0], [20.0, 50.0]]);
    }
}
