//! Search-window resolution from overpass timestamps
//!
//! Record timestamps arrive in a handful of shapes (date only, date plus
//! time, with or without fractional seconds, `T` or space separated). The
//! resolver tries a fixed, ordered list of formats and takes the first one
//! that parses; there is no guessing beyond that list.

use crate::records::OverpassRecord;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Timestamp resolution errors
#[derive(Debug, thiserror::Error)]
pub enum TimeWindowError {
    /// None of the accepted formats parsed the input
    #[error("unrecognized timestamp format: {0}")]
    MalformedTimestamp(String),
}

/// Datetime formats tried in priority order after the date-only probe
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a record timestamp using the fixed format priority list
///
/// Date-only inputs resolve to midnight. The first format that parses wins.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, TimeWindowError> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        // and_hms_opt(0, 0, 0) is always valid
        return Ok(date.and_hms_opt(0, 0, 0).expect("midnight is always valid"));
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(datetime);
        }
    }
    Err(TimeWindowError::MalformedTimestamp(input.to_string()))
}

/// Symmetric search window around a record timestamp
///
/// Invariant: `end - start == 2 × tolerance`, centered on the record's
/// timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    /// Window start (timestamp − tolerance)
    pub start: NaiveDateTime,
    /// Window end (timestamp + tolerance)
    pub end: NaiveDateTime,
    /// Equality filter on the absolute orbit number, when the record has one
    pub orbit: Option<u32>,
}

impl SearchWindow {
    /// Resolve the search window for an overpass record
    ///
    /// When the record carries a time of day, the probed input is
    /// `{date}T{time}`; otherwise the date alone. The orbit number passes
    /// through without further validation.
    pub fn resolve(record: &OverpassRecord, tolerance_minutes: i64) -> Result<Self, TimeWindowError> {
        let input = match &record.time {
            Some(time) => format!("{}T{}", record.date, time),
            None => record.date.clone(),
        };
        let timestamp = parse_timestamp(&input)?;
        Ok(Self::around(timestamp, tolerance_minutes, record.orbit))
    }

    /// Build a window of ±`tolerance_minutes` around a timestamp
    pub fn around(timestamp: NaiveDateTime, tolerance_minutes: i64, orbit: Option<u32>) -> Self {
        let tolerance = Duration::minutes(tolerance_minutes);
        Self {
            start: timestamp - tolerance,
            end: timestamp + tolerance,
            orbit,
        }
    }
}
