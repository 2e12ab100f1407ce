//! Error types surfaced by the departures pipeline.
//!
//! Only request-fatal failures live here. Per-entry parse failures and cache
//! corruption are absorbed inside the parser and the cache.

use thiserror::Error;

/// Errors returned from [`crate::fetch_departures`] and
/// [`crate::cache::DepartureCache::get_departures`].
#[derive(Debug, Error)]
pub enum DepartureError {
    /// A month, day or hour was out of range. Raised before any I/O.
    #[error("invalid departure query: {0}")]
    InvalidQuery(String),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("unable to reach {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Failures locating the flights list inside the departures page.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("could not locate the embedded flight payload in the response HTML")]
    NotFound,
    #[error("embedded flight payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing segment '{0}' while traversing the embedded payload")]
    MissingSegment(String),
    #[error("flights value in the embedded payload is not a list")]
    NotAList,
}

pub type Result<T, E = DepartureError> = std::result::Result<T, E>;
