//! Forecast result structure for holding point predictions.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// A point forecast over a fixed horizon.
///
/// A model produces the values; the post-processing stage attaches the
/// future timestamps (one per horizon step, contiguous at the resampling
/// period) and a display unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    values: Vec<f64>,
    timestamps: Vec<DateTime<Utc>>,
    unit: Option<String>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions, without timestamps.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            values,
            timestamps: Vec::new(),
            unit: None,
        }
    }

    /// Attach future timestamps, one per forecast value.
    pub fn with_timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Result<Self> {
        if timestamps.len() != self.values.len() {
            return Err(ForecastError::TimestampError(format!(
                "expected {} forecast timestamps, got {}",
                self.values.len(),
                timestamps.len()
            )));
        }
        self.timestamps = timestamps;
        Ok(self)
    }

    /// Attach a display unit label (e.g. "MWh").
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Replace the point predictions, keeping timestamps and unit.
    ///
    /// Used by post-processing; the replacement must preserve the horizon.
    pub fn map_values(mut self, f: impl FnOnce(&[f64]) -> Vec<f64>) -> Self {
        let replaced = f(&self.values);
        debug_assert_eq!(replaced.len(), self.values.len());
        self.values = replaced;
        self
    }

    /// The forecast horizon (number of future periods).
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    /// Whether the forecast holds no predictions.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Point predictions.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Future timestamps; empty until attached.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Whether timestamps have been attached.
    pub fn has_timestamps(&self) -> bool {
        !self.timestamps.is_empty()
    }

    /// Display unit, if set.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }
}
