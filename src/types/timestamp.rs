use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::types::errors::CoercionError;

const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%b %d, %Y, %I:%M:%S %p"
];

/// Parses the date cell of either export layout. Values without an offset are read as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, CoercionError> {
    let value = value.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp);
    }

    for format in NAIVE_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(timestamp.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|timestamp| timestamp.and_utc().fixed_offset())
        .ok_or_else(|| CoercionError::InvalidDate(value.to_string()))
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS+HHMM`.
pub fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format(OUTPUT_FORMAT).to_string()
}
