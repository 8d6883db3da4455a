//! TimeSeries data structure for representing a timestamped value series.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// An ordered univariate time series.
///
/// Timestamps are strictly increasing; one value per timestamp. Missing
/// observations are absent timestamps rather than null-filled rows. A
/// constructed series is immutable; transformations such as resampling
/// produce a new series.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a new time series.
    ///
    /// Fails with [`ForecastError::TimestampError`] if timestamps are not
    /// strictly increasing, or with a dimension mismatch if the vectors
    /// differ in length.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::TimestampError(format!(
                "timestamp/value length mismatch: {} vs {}",
                timestamps.len(),
                values.len()
            )));
        }
        for pair in timestamps.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ForecastError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self { timestamps, values })
    }

    /// Build a series from (timestamp, value) pairs, sorting by timestamp.
    ///
    /// Later duplicates of the same timestamp are discarded, keeping the
    /// first occurrence after the sort.
    pub fn from_pairs(mut pairs: Vec<(DateTime<Utc>, f64)>) -> Result<Self> {
        pairs.sort_by_key(|(t, _)| *t);
        pairs.dedup_by_key(|(t, _)| *t);
        let (timestamps, values) = pairs.into_iter().unzip();
        Self::new(timestamps, values)
    }

    /// Internal constructor for series whose ordering is guaranteed by
    /// construction (e.g. generated bucket labels).
    pub(crate) fn from_raw(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        debug_assert!(timestamps.windows(2).all(|w| w[1] > w[0]));
        Self { timestamps, values }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Observation timestamps, ascending.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Observation values, in timestamp order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The first timestamp, if any.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.timestamps.first().copied()
    }

    /// The last timestamp, if any.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Whether any value is NaN or infinite.
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }

    /// Return a copy with non-finite observations dropped.
    pub fn drop_missing(&self) -> TimeSeries {
        let (timestamps, values) = self
            .timestamps
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| v.is_finite())
            .map(|(t, v)| (*t, *v))
            .unzip();
        TimeSeries { timestamps, values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn daily(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    #[test]
    fn constructs_and_exposes_data() {
        let ts = TimeSeries::new(daily(3), vec![1.0, 2.0, 3.0]).unwrap();

        assert_eq!(ts.len(), 3);
        assert!(!ts.is_empty());
        assert_eq!(ts.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(ts.start(), Some(daily(3)[0]));
        assert_eq!(ts.end(), Some(daily(3)[2]));
    }

    #[test]
    fn rejects_length_mismatch() {
        let result = TimeSeries::new(daily(3), vec![1.0, 2.0]);
        assert!(matches!(result, Err(ForecastError::TimestampError(_))));
    }

    #[test]
    fn rejects_non_increasing_timestamps() {
        let mut stamps = daily(3);
        stamps.swap(1, 2);
        let result = TimeSeries::new(stamps, vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(ForecastError::TimestampError(_))));

        // Duplicates are also rejected
        let mut stamps = daily(3);
        stamps[2] = stamps[1];
        let result = TimeSeries::new(stamps, vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(ForecastError::TimestampError(_))));
    }

    #[test]
    fn from_pairs_sorts_and_dedups() {
        let stamps = daily(3);
        let pairs = vec![
            (stamps[2], 3.0),
            (stamps[0], 1.0),
            (stamps[1], 2.0),
            (stamps[1], 99.0), // duplicate, dropped
        ];

        let ts = TimeSeries::from_pairs(pairs).unwrap();
        assert_eq!(ts.len(), 3);
        assert_eq!(ts.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn drop_missing_removes_non_finite() {
        let ts = TimeSeries::new(
            daily(5),
            vec![1.0, f64::NAN, 3.0, f64::INFINITY, 5.0],
        )
        .unwrap();
        assert!(ts.has_missing_values());

        let clean = ts.drop_missing();
        assert_eq!(clean.len(), 3);
        assert_eq!(clean.values(), &[1.0, 3.0, 5.0]);
        assert!(!clean.has_missing_values());
    }

    #[test]
    fn empty_series_is_valid() {
        let ts = TimeSeries::new(vec![], vec![]).unwrap();
        assert!(ts.is_empty());
        assert_eq!(ts.start(), None);
        assert_eq!(ts.end(), None);
    }
}
