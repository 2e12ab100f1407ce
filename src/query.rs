use crate::error::{DepartureError, Result};

const UNKNOWN_AIRPORT: &str = "UNKNOWN";

/// One departure window: an airport plus a calendar hour.
///
/// The same window names the upstream request and the cache file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DepartureQuery {
    pub airport: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl DepartureQuery {
    /// Build a validated query. The airport code is trimmed and uppercased.
    pub fn new(airport: &str, year: i32, month: u32, day: u32, hour: u32) -> Result<Self> {
        let query = Self {
            airport: normalize_airport(airport),
            year,
            month,
            day,
            hour,
        };
        query.validate()?;
        Ok(query)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.month) {
            return Err(DepartureError::InvalidQuery(
                "month must be between 1 and 12".into(),
            ));
        }
        if !(1..=31).contains(&self.day) {
            return Err(DepartureError::InvalidQuery(
                "day must be between 1 and 31".into(),
            ));
        }
        if self.hour > 23 {
            return Err(DepartureError::InvalidQuery(
                "hour must be between 0 and 23".into(),
            ));
        }
        Ok(())
    }

    /// Upstream query string pairs. The site names the day of month `date`.
    pub fn as_params(&self) -> [(&'static str, String); 4] {
        [
            ("year", self.year.to_string()),
            ("month", self.month.to_string()),
            ("date", self.day.to_string()),
            ("hour", self.hour.to_string()),
        ]
    }

    /// `{AIRPORT}_{YYYYMMDD}_{HH}.json`
    pub fn cache_file_name(&self) -> String {
        format!(
            "{}_{:04}{:02}{:02}_{:02}.json",
            path_safe(&self.airport),
            self.year,
            self.month,
            self.day,
            self.hour
        )
    }

    /// Lock/identity key for this window, matching the cache file stem.
    pub fn key(&self) -> String {
        self.cache_file_name().trim_end_matches(".json").to_string()
    }
}

pub fn normalize_airport(code: &str) -> String {
    let trimmed = code.trim().to_uppercase();
    if trimmed.is_empty() {
        UNKNOWN_AIRPORT.to_string()
    } else {
        trimmed
    }
}

fn path_safe(code: &str) -> String {
    code.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_in_range_window() {
        for month in 1..=12 {
            for day in 1..=31 {
                for hour in 0..=23 {
                    assert!(
                        DepartureQuery::new("JFK", 2024, month, day, hour).is_ok(),
                        "{month}/{day} {hour}h rejected"
                    );
                }
            }
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = [(0, 1, 0), (13, 1, 0), (1, 0, 0), (1, 32, 0), (1, 1, 24), (1, 1, 99)];
        for (month, day, hour) in bad {
            let err = DepartureQuery::new("JFK", 2024, month, day, hour).unwrap_err();
            assert!(matches!(err, DepartureError::InvalidQuery(_)), "{month}/{day} {hour}h");
        }
    }

    #[test]
    fn names_the_failing_field() {
        let err = DepartureQuery::new("JFK", 2024, 2, 1, 24).unwrap_err();
        assert!(err.to_string().contains("hour"));
        let err = DepartureQuery::new("JFK", 2024, 13, 1, 0).unwrap_err();
        assert!(err.to_string().contains("month"));
    }

    #[test]
    fn normalizes_airport_code() {
        let q = DepartureQuery::new("  jfk ", 2024, 5, 1, 9).unwrap();
        assert_eq!(q.airport, "JFK");
        let q = DepartureQuery::new("   ", 2024, 5, 1, 9).unwrap();
        assert_eq!(q.airport, "UNKNOWN");
    }

    #[test]
    fn cache_file_name_is_zero_padded() {
        let q = DepartureQuery::new("lax", 987, 3, 7, 5).unwrap();
        assert_eq!(q.cache_file_name(), "LAX_09870307_05.json");
        assert_eq!(q.key(), "LAX_09870307_05");
    }

    #[test]
    fn cache_file_name_strips_path_separators() {
        let q = DepartureQuery::new("../etc", 2024, 1, 1, 0).unwrap();
        assert_eq!(q.cache_file_name(), "___ETC_20240101_00.json");
    }

    #[test]
    fn params_use_date_for_day_of_month() {
        let q = DepartureQuery::new("JFK", 2024, 5, 9, 6).unwrap();
        let params = q.as_params();
        assert_eq!(params[0], ("year", "2024".to_string()));
        assert_eq!(params[1], ("month", "5".to_string()));
        assert_eq!(params[2], ("date", "9".to_string()));
        assert_eq!(params[3], ("hour", "6".to_string()));
    }
}
