//! Atomic CSV output of a forecast.

use crate::core::Forecast;
use crate::error::{ForecastError, Result};
use std::path::Path;
use tempfile::NamedTempFile;

/// Timestamp rendering in the output file, matching the upstream exports.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// Write a forecast as a two-column CSV: the timestamp column (named as in
/// the input schema) and `Forecast (<unit>)`.
///
/// The file is written to a temporary sibling and atomically renamed over
/// the destination, so a concurrent reader never observes a truncated
/// file. One row per horizon step.
pub fn write_forecast_csv(forecast: &Forecast, timestamp_column: &str, path: &Path) -> Result<()> {
    if !forecast.is_empty() && !forecast.has_timestamps() {
        return Err(ForecastError::InvalidParameter(
            "forecast has no timestamps attached".to_string(),
        ));
    }

    let value_header = match forecast.unit() {
        Some(unit) => format!("Forecast ({unit})"),
        None => "Forecast".to_string(),
    };

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let temp = NamedTempFile::new_in(parent)?;

    let mut writer = csv::Writer::from_writer(temp.as_file());
    writer.write_record([timestamp_column, value_header.as_str()])?;
    for (stamp, value) in forecast.timestamps().iter().zip(forecast.values()) {
        writer.write_record([
            stamp.format(TIMESTAMP_FORMAT).to_string(),
            value.to_string(),
        ])?;
    }
    writer.flush()?;
    drop(writer);

    temp.persist(path).map_err(|e| ForecastError::Io(e.error))?;
    Ok(())
}
