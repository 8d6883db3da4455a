//! CSV loading into a [`TimeSeries`].
//!
//! Column names vary across upstream exports (`datetime_Europe_Brussels`,
//! `utc_timestamp`, `cet_cest_timestamp`, ...), so the schema names both
//! columns explicitly; nothing is hardcoded in the pipeline. Rows that
//! fail to parse are dropped with a warning, never fatal.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Names of the two columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvSchema {
    /// Column holding the observation timestamp.
    pub timestamp_column: String,
    /// Column holding the numeric value.
    pub value_column: String,
}

impl CsvSchema {
    pub fn new(timestamp_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        Self {
            timestamp_column: timestamp_column.into(),
            value_column: value_column.into(),
        }
    }
}

/// Load a time series from a CSV file on disk.
pub fn load_csv(path: &Path, schema: &CsvSchema) -> Result<TimeSeries> {
    let file = File::open(path)?;
    read_series(file, schema)
}

/// Read a time series from any CSV reader.
///
/// Extra columns are ignored; only the two configured columns are read.
/// Unordered input is sorted by timestamp; duplicate timestamps keep the
/// first occurrence.
pub fn read_series<R: Read>(reader: R, schema: &CsvSchema) -> Result<TimeSeries> {
    let mut csv = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = csv.headers()?.clone();
    let find = |name: &str| headers.iter().position(|h| h == name);
    let ts_idx = find(&schema.timestamp_column).ok_or_else(|| {
        ForecastError::DataFormat(format!(
            "missing timestamp column '{}'",
            schema.timestamp_column
        ))
    })?;
    let value_idx = find(&schema.value_column).ok_or_else(|| {
        ForecastError::DataFormat(format!("missing value column '{}'", schema.value_column))
    })?;

    let mut pairs = Vec::new();
    let mut dropped = 0usize;
    for (row, record) in csv.records().enumerate() {
        let record = record?;
        let ts_field = record.get(ts_idx).unwrap_or("");
        let value_field = record.get(value_idx).unwrap_or("");

        let parsed = parse_timestamp(ts_field)
            .zip(value_field.trim().parse::<f64>().ok());
        match parsed {
            Some(pair) => pairs.push(pair),
            None => {
                dropped += 1;
                warn!(
                    row = row + 2, // 1-based, after the header line
                    timestamp = ts_field,
                    value = value_field,
                    "dropping unparseable row"
                );
            }
        }
    }

    if dropped > 0 {
        debug!(kept = pairs.len(), dropped, "finished reading series");
    }
    TimeSeries::from_pairs(pairs)
}

/// Parse a timestamp in the formats seen across upstream exports.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d
            .and_hms_opt(0, 0, 0)
            .map(|dt| Utc.from_utc_datetime(&dt));
    }
    None
}
