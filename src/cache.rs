//! On-disk departure cache, one JSON file per departure window.
//!
//! Entries never expire. A read that fails for any reason counts as a miss,
//! and a write that fails is logged and dropped; neither reaches the caller.
//! Fetch errors from the source pass through untouched.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::flight::FlightRecord;
use crate::query::DepartureQuery;
use crate::source::DepartureSource;

pub struct DepartureCache<S> {
    root: PathBuf,
    source: S,
    // One mutex per window so concurrent misses collapse into a single fetch.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

/// A window found on disk by [`DepartureCache::cached_windows`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedWindow {
    pub path: PathBuf,
    pub airport: String,
    pub date: NaiveDate,
    pub hour: u32,
    /// `None` when the file could not be read back.
    pub records: Option<usize>,
}

impl<S: DepartureSource> DepartureCache<S> {
    pub fn new(root: impl Into<PathBuf>, source: S) -> Self {
        Self {
            root: root.into(),
            source,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn path_for(&self, query: &DepartureQuery) -> PathBuf {
        self.root.join(query.cache_file_name())
    }

    /// Departures for one window, served from disk when possible.
    pub fn get_departures(
        &self,
        airport: &str,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        use_cache: bool,
    ) -> Result<Vec<FlightRecord>> {
        let query = DepartureQuery::new(airport, year, month, day, hour)?;
        self.get(&query, use_cache)
    }

    pub fn get(&self, query: &DepartureQuery, use_cache: bool) -> Result<Vec<FlightRecord>> {
        query.validate()?;
        let lock = self.key_lock(&query.key());
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let path = self.path_for(query);
        if use_cache {
            if let Some(records) = load(&path) {
                info!("Using cached departures: {}", path.display());
                return Ok(records);
            }
        }

        let records = self.source.fetch_departures(query)?;
        match store(&path, &records) {
            Ok(()) => debug!("Cached {} departures at {}", records.len(), path.display()),
            Err(e) => warn!("Failed to cache departures at {}: {}", path.display(), e),
        }
        Ok(records)
    }

    /// Every cache file under the root, sorted by file name.
    pub fn cached_windows(&self) -> io::Result<Vec<CachedWindow>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut windows = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(caps) = cache_file_re().captures(name) else {
                continue;
            };
            let Ok(date) = NaiveDate::parse_from_str(&caps[2], "%Y%m%d") else {
                continue;
            };
            let airport = caps[1].to_string();
            let hour = caps[3].parse().unwrap_or_default();
            let records = load(&path).map(|r| r.len());
            windows.push(CachedWindow {
                path,
                airport,
                date,
                hour,
                records,
            });
        }
        windows.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(windows)
    }

    fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key.to_string()).or_default())
    }
}

fn cache_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Z0-9_-]+)_(\d{8})_(\d{2})\.json$").unwrap())
}

/// Read a cache file, dropping entries that don't decode. `None` means miss.
fn load(path: &Path) -> Option<Vec<FlightRecord>> {
    let text = fs::read_to_string(path).ok()?;
    let Value::Array(items) = serde_json::from_str::<Value>(&text).ok()? else {
        debug!("Ignoring cache file with non-list payload: {}", path.display());
        return None;
    };

    let total = items.len();
    let records: Vec<FlightRecord> = items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if records.len() < total {
        debug!(
            "Dropped {} unreadable entries from {}",
            total - records.len(),
            path.display()
        );
    }
    Some(records)
}

/// Replace the cache file via a sibling temp file so readers never see a partial write.
fn store(path: &Path, records: &[FlightRecord]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(records)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)
}

// ── Tests ──
