use std::fmt;

/// Errors encountered while resolving a place name.
#[derive(Debug)]
pub enum GeocodeError {
    Http(reqwest::Error),
    Json(reqwest::Error),
    Status(u16),
    InvalidResponse(String),
    NotFound(String),
    EmptyQuery,
    Client(String),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        GeocodeError::Http(err)
    }
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::Http(err) => write!(f, "geocoding request failed: {err}"),
            GeocodeError::Json(err) => write!(f, "geocoding response was not valid JSON: {err}"),
            GeocodeError::Status(code) => write!(f, "geocoding service returned HTTP {code}"),
            GeocodeError::InvalidResponse(message) => {
                write!(f, "unexpected geocoding response: {message}")
            }
            GeocodeError::NotFound(query) => write!(f, "no place found for '{query}'"),
            GeocodeError::EmptyQuery => write!(f, "city name must not be empty"),
            GeocodeError::Client(message) => {
                write!(f, "failed to build geocoding client: {message}")
            }
        }
    }
}

impl std::error::Error for GeocodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeocodeError::Http(err) | GeocodeError::Json(err) => Some(err),
            _ => None,
        }
    }
}
