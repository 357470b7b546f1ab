//! Date parsing and display for tool arguments and provider timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::TripError;

/// The only date format tools accept.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const NOT_AVAILABLE: &str = "N/A";

/// Parse a `YYYY-MM-DD` tool argument.
pub fn parse_date(value: &str) -> Result<NaiveDate, TripError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| TripError::InvalidDate {
        value: value.to_string(),
    })
}

/// Nights between check-in and check-out. Check-out must be after check-in.
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> Result<u32, TripError> {
    let days = (check_out - check_in).num_days();
    if days <= 0 {
        return Err(TripError::InvalidArgument(format!(
            "check_out ({check_out}) must be after check_in ({check_in})"
        )));
    }
    u32::try_from(days)
        .map_err(|_| TripError::InvalidArgument(format!("stay of {days} nights is too long")))
}

/// Render a provider timestamp as `May 01`, or `N/A` when it cannot be read.
///
/// Accepts RFC 3339 (`2025-05-01T10:30:00Z`), naive date-times with or
/// without seconds, and bare dates.
pub fn short_date(timestamp: &str) -> String {
    parse_timestamp(timestamp)
        .map(|dt| dt.format("%b %d").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
