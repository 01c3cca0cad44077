/// One entry of a Nominatim `/search?format=jsonv2` array.
///
/// Nominatim encodes every number as a string.
#[derive(serde::Deserialize)]
pub(super) struct NominatimPlace {
    pub(super) lat: String,
    pub(super) lon: String,
    #[serde(default)]
    pub(super) display_name: Option<String>,
    /// `[min_lat, max_lat, min_lon, max_lon]`.
    pub(super) boundingbox: Vec<String>,
}
