pub mod payload;
pub mod record;

use serde_json::Value;

use crate::error::PayloadError;
use crate::flight::FlightRecord;

/// Records that survived parsing, plus how many raw entries were dropped.
#[derive(Debug, Default)]
pub struct ParsedFlights {
    pub records: Vec<FlightRecord>,
    pub skipped: usize,
}

/// Two-stage pipeline: page HTML → raw flight entries → flight records.
pub fn parse_departures(html: &str, departure_airport: &str) -> Result<ParsedFlights, PayloadError> {
    let entries = payload::extract_flights(html)?;
    Ok(parse_flights(&entries, departure_airport))
}

/// Parse what we can, skip what we can't. Non-objects never reach the parser.
pub fn parse_flights(entries: &[Value], departure_airport: &str) -> ParsedFlights {
    entries.iter().fold(ParsedFlights::default(), |mut acc, entry| {
        match entry
            .as_object()
            .map(|obj| record::parse_entry(obj, departure_airport))
        {
            Some(Ok(record)) => acc.records.push(record),
            _ => acc.skipped += 1,
        }
        acc
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn skips_bad_entries_without_failing() {
        let entries = vec![
            json!({ "sortTime": "2024-05-01T09:05:00.000Z", "carrier": { "fs": "AA", "flightNumber": "1" } }),
            json!({ "carrier": { "fs": "DL", "flightNumber": "401" } }),
            json!({ "sortTime": "2024-05-01T09:15:00.000Z", "carrier": { "fs": "B6", "flightNumber": "1234" } }),
        ];
        let parsed = parse_flights(&entries, "JFK");
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.records[0].flight_number, "AA 1");
        assert_eq!(parsed.records[1].flight_number, "B6 1234");
    }

    #[test]
    fn non_objects_are_skipped() {
        let entries = vec![json!("ad-slot"), json!(null), json!([1, 2])];
        let parsed = parse_flights(&entries, "JFK");
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.skipped, 3);
    }

    #[test]
    fn fixture_page_end_to_end() {
        let html = std::fs::read_to_string("tests/fixtures/jfk_departures.html").unwrap();
        let parsed = parse_departures(&html, "JFK").unwrap();
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(parsed.skipped, 2);

        let numbers: Vec<&str> = parsed
            .records
            .iter()
            .map(|r| r.flight_number.as_str())
            .collect();
        assert_eq!(numbers, ["AA 1", "B6 1234", "flight-tracker/XX/9"]);

        let cities: Vec<&str> = parsed.records.iter().map(|r| r.arrival_city.as_str()).collect();
        assert_eq!(cities, ["Los Angeles", "Logan International Airport", "YYZ"]);

        let bos = &parsed.records[1];
        assert_eq!(bos.departure_time.to_string(), "2024-05-01 09:15:00");
        assert_eq!(bos.arrival_time.to_string(), "2024-05-01 10:35:00");
        assert!(parsed.records.iter().all(|r| r.departure_airport == "JFK"));
    }

    #[test]
    fn payload_errors_propagate() {
        assert!(matches!(
            parse_departures("<html></html>", "JFK"),
            Err(PayloadError::NotFound)
        ));
    }
}
