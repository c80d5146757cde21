//! Geocoding error types.
//!
//! None of these reach the front ends: the resolver logs them and reports
//! "no result".

use geoloc_core::NetworkError;
use thiserror::Error;

use crate::query::QueryError;

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("JSON parse error: {0}")]
    Parse(String),

    #[error("No results found for {0:?}")]
    NoResults(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("{source} (URL: {url})")]
    Request {
        url: String,
        #[source]
        source: Box<GeocodeError>,
    },
}

impl GeocodeError {
    /// Attach the (redacted) request URL to a failure that happened after
    /// the request was built.
    pub fn with_url(self, url: impl Into<String>) -> Self {
        Self::Request {
            url: url.into(),
            source: Box::new(self),
        }
    }

    /// Whether the failure was detected before any network access.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }
}

/// Cache file errors.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache file is not a JSON object: {0}")]
    Corrupt(#[from] serde_json::Error),
}
