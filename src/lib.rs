//! FlightStats departures scraper with an on-disk, per-hour cache.
//!
//! Consumers call [`fetch_departures`]; everything else is the pipeline
//! behind it (fetch → extract → parse) and the cache in front of it.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod flight;
pub mod parser;
pub mod query;
pub mod settings;
pub mod source;

#[cfg(test)]
mod test_support;

use std::sync::OnceLock;

use tracing::warn;

pub use cache::DepartureCache;
pub use error::{DepartureError, NetworkError, PayloadError, Result};
pub use flight::FlightRecord;
pub use query::DepartureQuery;
pub use settings::Settings;
pub use source::{DepartureSource, FlightStatsSource};

/// Departures for one airport and hour, from the cache when present.
///
/// Backed by a process-wide FlightStats cache configured from the
/// environment on first use.
pub fn fetch_departures(
    airport_code: &str,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    use_cache: bool,
) -> Result<Vec<FlightRecord>> {
    let query = DepartureQuery::new(airport_code, year, month, day, hour)?;
    default_cache().get(&query, use_cache)
}

fn default_cache() -> &'static DepartureCache<FlightStatsSource> {
    static CACHE: OnceLock<DepartureCache<FlightStatsSource>> = OnceLock::new();
    CACHE.get_or_init(|| {
        let settings = Settings::load().unwrap_or_else(|e| {
            warn!("Invalid departures settings, using defaults: {}", e);
            Settings::default()
        });
        settings.cache()
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_point_rejects_bad_window_without_io() {
        let err = fetch_departures("JFK", 2024, 2, 32, 9, true).unwrap_err();
        assert!(matches!(err, DepartureError::InvalidQuery(_)));
        let err = fetch_departures("JFK", 2024, 2, 1, 24, false).unwrap_err();
        assert!(matches!(err, DepartureError::InvalidQuery(_)));
    }
}
