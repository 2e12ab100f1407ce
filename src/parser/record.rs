use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::flight::FlightRecord;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Why a single flight entry was dropped.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("flight entry missing sortTime value")]
    MissingSortTime,
    #[error("unparseable sortTime '{0}'")]
    InvalidSortTime(String),
}

/// Normalize one raw FlightStats flight object.
pub fn parse_entry(
    raw: &Map<String, Value>,
    departure_airport: &str,
) -> Result<FlightRecord, EntryError> {
    let departure_time = parse_sort_time(raw.get("sortTime"))?;
    let arrival_time = compose_arrival(departure_time, raw.get("arrivalTime"));

    let airport = raw.get("airport").and_then(Value::as_object);
    let carrier = raw.get("carrier").and_then(Value::as_object);

    let arrival_city = first_non_empty(&[
        text(airport, "city"),
        text(airport, "name"),
        text(airport, "fs"),
    ]);
    let airline = first_non_empty(&[text(carrier, "name"), text(carrier, "fs")]);

    Ok(FlightRecord {
        departure_airport: departure_airport.to_string(),
        departure_time,
        arrival_city,
        arrival_time,
        airline,
        flight_number: flight_identifier(raw, carrier),
        estimated_passengers: None,
    })
}

/// Parse `sortTime` to a naive wall-clock time. Offsets are dropped, not applied.
fn parse_sort_time(value: Option<&Value>) -> Result<NaiveDateTime, EntryError> {
    let raw = value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(EntryError::MissingSortTime)?;
    let normalized = match raw.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt.naive_local());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
            return Ok(dt.naive_local());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Ok(dt);
        }
    }
    Err(EntryError::InvalidSortTime(raw.to_string()))
}

/// Departure date with the `time24` hour/minute substituted, rolled to the
/// next day when that lands before departure. Falls back to departure.
fn compose_arrival(departure: NaiveDateTime, payload: Option<&Value>) -> NaiveDateTime {
    let Some(time) = parse_time24(payload) else {
        return departure;
    };
    let arrival = departure.date().and_time(time);
    if arrival < departure {
        arrival + Duration::days(1)
    } else {
        arrival
    }
}

fn parse_time24(payload: Option<&Value>) -> Option<NaiveTime> {
    let time24 = payload?.as_object()?.get("time24")?.as_str()?;
    let mut parts = time24.split(':');
    let hour = parts.next()?.trim().parse::<u32>().ok()?;
    let minute = parts.next()?.trim().parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// "AA 100", else the URL slug, else "Unknown".
fn flight_identifier(raw: &Map<String, Value>, carrier: Option<&Map<String, Value>>) -> String {
    let combined = [text(carrier, "fs").trim(), text(carrier, "flightNumber").trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !combined.is_empty() {
        return combined;
    }

    let slug = raw
        .get("url")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim_matches('/');
    if slug.is_empty() {
        "Unknown".to_string()
    } else {
        slug.to_string()
    }
}

fn text<'a>(obj: Option<&'a Map<String, Value>>, key: &str) -> &'a str {
    obj.and_then(|o| o.get(key))
        .and_then(Value::as_str)
        .unwrap_or("")
}

fn first_non_empty(candidates: &[&str]) -> String {
    candidates
        .iter()
        .find(|c| !c.is_empty())
        .map(|c| c.to_string())
        .unwrap_or_default()
}

// ── Tests ──
