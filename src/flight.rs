use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single normalized flight movement.
///
/// Timestamps are naive local times; any upstream offset is dropped during
/// parsing. The serialized form is also the on-disk cache format, so field
/// names must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub departure_airport: String,
    pub departure_time: NaiveDateTime,
    pub arrival_city: String,
    pub arrival_time: NaiveDateTime,
    pub airline: String,
    pub flight_number: String,
    /// Only synthetic producers fill this in; scraped records leave it empty.
    #[serde(default)]
    pub estimated_passengers: Option<u32>,
}

// ── Tests ──
