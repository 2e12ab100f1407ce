use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::cache::DepartureCache;
use crate::fetch::{HttpFetcher, DEFAULT_TIMEOUT};
use crate::source::{FlightStatsSource, FLIGHTSTATS_DEPARTURES_URL};

pub const ENV_PREFIX: &str = "DEPARTURES";

const DEFAULT_CACHE_DIR: &str = "cache";

/// Runtime settings: built-in defaults, overridden by `DEPARTURES_*` env vars.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub cache_dir: PathBuf,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            base_url: FLIGHTSTATS_DEPARTURES_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_prefix(ENV_PREFIX)
    }

    pub fn load_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("cache_dir", defaults.cache_dir.to_string_lossy().to_string())?
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout_secs", defaults.timeout_secs as i64)?
            .add_source(Environment::with_prefix(prefix))
            .build()?
            .try_deserialize()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn source(&self) -> FlightStatsSource {
        FlightStatsSource::new(self.base_url.clone(), HttpFetcher::new(self.timeout()))
    }

    pub fn cache(&self) -> DepartureCache<FlightStatsSource> {
        DepartureCache::new(self.cache_dir.clone(), self.source())
    }
}

// ── Tests ──
