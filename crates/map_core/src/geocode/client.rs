use reqwest::{blocking::Client, Url};
use std::time::Duration;
use tracing::debug;

use super::error::GeocodeError;
use super::parser::parse_search_response;
use super::response::NominatimPlace;
use super::{GeocodedPlace, Geocoder};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin HTTP client for Nominatim free-text search.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    endpoint: String,
}

impl NominatimClient {
    /// Create a client for the given endpoint (e.g. `https://nominatim.openstreetmap.org`).
    pub fn new(endpoint: &str, user_agent: &str) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .map_err(|err| GeocodeError::Client(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(super) fn search_url(&self, query: &str) -> Result<Url, GeocodeError> {
        let mut url = Url::parse(&format!("{}/search", self.endpoint)).map_err(|err| {
            GeocodeError::InvalidResponse(format!("failed to build Nominatim URL: {}", err))
        })?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "jsonv2")
            .append_pair("limit", "1");
        Ok(url)
    }
}

impl Geocoder for NominatimClient {
    fn geocode(&self, query: &str) -> Result<GeocodedPlace, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        let url = self.search_url(query)?;
        debug!(%url, "geocoding request");
        let response = self.client.get(url).send().map_err(GeocodeError::Http)?;
        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let parsed: Vec<NominatimPlace> = response.json().map_err(GeocodeError::Json)?;
        parse_search_response(query, parsed)
    }
}
