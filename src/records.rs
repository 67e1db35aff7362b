//! Overpass record ingestion from CSV files
//!
//! Input files are tabular overpass listings with configurable column names.
//! Only the date column is required; time, orbit, and station columns are
//! optional and degrade gracefully to absent values when the header does not
//! carry them.

use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// Errors produced while reading overpass records
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Underlying CSV read or decode failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The configured date column is not present in the header
    #[error("date column '{0}' not found in CSV header")]
    MissingDateColumn(String),
}

/// Column names used to pull fields out of the input CSV
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Column carrying the overpass date (required)
    pub date: String,
    /// Column carrying the time of day (optional)
    pub time: Option<String>,
    /// Column carrying the absolute orbit number (optional)
    pub orbit: Option<String>,
    /// Column carrying the ground station / zone label (optional)
    pub station: Option<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date: "yyyy-mm-dd".to_string(),
            time: Some("hh:mm:ss.sss".to_string()),
            orbit: Some("Absolute_Orbit".to_string()),
            station: Some("Zone".to_string()),
        }
    }
}

/// One overpass event read from the input table
///
/// Records are immutable once read and are consumed in source order.
#[derive(Debug, Clone, Serialize)]
pub struct OverpassRecord {
    /// Zero-based row index in the source file (header excluded)
    pub row: usize,
    /// Overpass date string, parsed later by the time-window resolver
    pub date: String,
    /// Time of day, when the source provides one
    pub time: Option<String>,
    /// Absolute orbit number, when the source provides one
    pub orbit: Option<u32>,
    /// Ground station or zone label, when the source provides one
    pub station: Option<String>,
}

/// Read all overpass records from a CSV file
///
/// Optional columns missing from the header are treated as absent for every
/// row. Empty cells become `None`. Orbit values that fail to parse as a
/// number are dropped with a warning rather than failing the row.
pub fn read_overpass_csv(path: &Path, columns: &ColumnMapping) -> Result<Vec<OverpassRecord>, RecordError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let date_idx = find_column(&headers, &columns.date)
        .ok_or_else(|| RecordError::MissingDateColumn(columns.date.clone()))?;
    let time_idx = optional_column(&headers, columns.time.as_deref(), "time");
    let orbit_idx = optional_column(&headers, columns.orbit.as_deref(), "orbit");
    let station_idx = optional_column(&headers, columns.station.as_deref(), "station");

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;

        let date = record.get(date_idx).unwrap_or_default().trim().to_string();
        let time = cell(&record, time_idx);
        let station = cell(&record, station_idx);
        let orbit = cell(&record, orbit_idx).and_then(|raw| parse_orbit(&raw, row));

        records.push(OverpassRecord {
            row,
            date,
            time,
            orbit,
            station,
        });
    }

    Ok(records)
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn optional_column(headers: &csv::StringRecord, name: Option<&str>, role: &str) -> Option<usize> {
    let name = name?;
    let idx = find_column(headers, name);
    if idx.is_none() {
        debug!(column = name, role, "optional column not present, treating as absent");
    }
    idx
}

fn cell(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    let value = record.get(idx?)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse an orbit number, tolerating the float rendering some exports use
fn parse_orbit(raw: &str, row: usize) -> Option<u32> {
    if let Ok(orbit) = raw.parse::<u32>() {
        return Some(orbit);
    }
    if let Ok(orbit) = raw.parse::<f64>() {
        if orbit >= 0.0 && orbit.fract() == 0.0 {
            return Some(orbit as u32);
        }
    }
    warn!(value = raw, row, "unparseable orbit value, ignoring");
    None
}
