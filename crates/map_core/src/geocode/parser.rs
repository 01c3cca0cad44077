use crate::bounds::BoundingBox;

use super::error::GeocodeError;
use super::response::NominatimPlace;
use super::GeocodedPlace;

fn parse_coordinate(field: &str, raw: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| GeocodeError::InvalidResponse(format!("{field} '{raw}' is not a number")))
}

pub(super) fn parse_search_response(
    query: &str,
    places: Vec<NominatimPlace>,
) -> Result<GeocodedPlace, GeocodeError> {
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NotFound(query.to_string()))?;

    if place.boundingbox.len() != 4 {
        return Err(GeocodeError::InvalidResponse(format!(
            "boundingbox has {} values, expected 4",
            place.boundingbox.len()
        )));
    }
    let min_lat = parse_coordinate("min_lat", &place.boundingbox[0])?;
    let max_lat = parse_coordinate("max_lat", &place.boundingbox[1])?;
    let min_lon = parse_coordinate("min_lon", &place.boundingbox[2])?;
    let max_lon = parse_coordinate("max_lon", &place.boundingbox[3])?;
    let bbox = BoundingBox::new(min_lat, max_lat, min_lon, max_lon)
        .map_err(|err| GeocodeError::InvalidResponse(err.to_string()))?;

    let center_lat = parse_coordinate("lat", &place.lat)?;
    let center_lon = parse_coordinate("lon", &place.lon)?;

    let display_name = place
        .display_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| query.to_string());

    Ok(GeocodedPlace {
        query: query.to_string(),
        display_name,
        center_lat,
        center_lon,
        bbox,
    })
}
