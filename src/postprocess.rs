//! Forecast post-processing: negative-value repair and future dating.

use crate::resample::Period;
use chrono::{DateTime, Utc};

/// Replace negative forecast values with the previous corrected value.
///
/// Generation cannot be negative, but a fitted linear model can dip below
/// zero. From the second period onward, a negative value is replaced with
/// the immediately preceding *corrected* value, a causal clamp rather
/// than a floor at zero, so repaired stretches stay continuous. The first
/// value is never corrected, even if negative; downstream consumers rely
/// on this long-standing behavior (see DESIGN.md).
pub fn clamp_negative_forecasts(raw: &[f64]) -> Vec<f64> {
    let mut corrected = raw.to_vec();
    for i in 1..corrected.len() {
        if corrected[i] < 0.0 {
            corrected[i] = corrected[i - 1];
        }
    }
    corrected
}

/// Generate `horizon` future bucket labels following `last`.
///
/// The first label is exactly one period after `last`; labels step by the
/// period and stay contiguous at the resampling granularity.
pub fn future_timestamps(
    last: DateTime<Utc>,
    period: Period,
    horizon: usize,
) -> Vec<DateTime<Utc>> {
    let mut stamps = Vec::with_capacity(horizon);
    let mut current = last;
    for _ in 0..horizon {
        current = period.next(current);
        stamps.push(current);
    }
    stamps
}
