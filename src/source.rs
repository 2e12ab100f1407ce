use tracing::{debug, info};

use crate::error::Result;
use crate::fetch::HttpFetcher;
use crate::flight::FlightRecord;
use crate::parser;
use crate::query::DepartureQuery;

pub const FLIGHTSTATS_DEPARTURES_URL: &str =
    "https://www.flightstats.com/v2/flight-tracker/departures";

/// Anything that can produce the departures for one window.
pub trait DepartureSource {
    fn fetch_departures(&self, query: &DepartureQuery) -> Result<Vec<FlightRecord>>;
}

/// Scrapes the FlightStats departures page: fetch → extract → parse.
#[derive(Debug, Clone)]
pub struct FlightStatsSource {
    base_url: String,
    fetcher: HttpFetcher,
}

impl Default for FlightStatsSource {
    fn default() -> Self {
        Self::new(FLIGHTSTATS_DEPARTURES_URL, HttpFetcher::default())
    }
}

impl FlightStatsSource {
    pub fn new(base_url: impl Into<String>, fetcher: HttpFetcher) -> Self {
        Self {
            base_url: base_url.into(),
            fetcher,
        }
    }

    pub fn departures_url(&self, query: &DepartureQuery) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), query.airport)
    }
}

impl DepartureSource for FlightStatsSource {
    fn fetch_departures(&self, query: &DepartureQuery) -> Result<Vec<FlightRecord>> {
        query.validate()?;
        let url = self.departures_url(query);
        info!("Fetching departures: {} ({})", url, query.key());

        let html = self.fetcher.get(&url, &query.as_params())?;
        let parsed = parser::parse_departures(&html, &query.airport)?;
        if parsed.skipped > 0 {
            debug!(skipped = parsed.skipped, key = %query.key(), "dropped malformed flight entries");
        }
        info!("Parsed {} departures for {}", parsed.records.len(), query.key());
        Ok(parsed.records)
    }
}

// ── Tests ──
