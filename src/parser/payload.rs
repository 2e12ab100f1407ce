use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::PayloadError;

const FLIGHTS_PATH: [&str; 5] = ["props", "initialState", "flightTracker", "route", "flights"];

fn next_data_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)__NEXT_DATA__\s*=\s*(\{.*?\})\s*;__NEXT_LOADED_PAGES__").unwrap()
    })
}

/// Pull the Next.js state blob out of the page and parse it.
pub fn extract_next_data(html: &str) -> Result<Value, PayloadError> {
    let caps = next_data_re()
        .captures(html)
        .ok_or(PayloadError::NotFound)?;
    Ok(serde_json::from_str(&caps[1])?)
}

/// Follow `path` through nested objects, naming the first segment that is absent.
pub fn walk_path<'a>(root: &'a Value, path: &[&str]) -> Result<&'a Value, PayloadError> {
    path.iter().try_fold(root, |current, segment| {
        current
            .as_object()
            .and_then(|obj| obj.get(*segment))
            .ok_or_else(|| PayloadError::MissingSegment(segment.to_string()))
    })
}

/// Raw flight entries from a departures page, unparsed.
pub fn extract_flights(html: &str) -> Result<Vec<Value>, PayloadError> {
    let payload = extract_next_data(html)?;
    match walk_path(&payload, &FLIGHTS_PATH)? {
        Value::Array(entries) => Ok(entries.clone()),
        _ => Err(PayloadError::NotAList),
    }
}

// ── Tests ──
