//! Calendar-aligned resampling of a time series.
//!
//! Aggregation always sums the observations in each bucket: the series is
//! an energy quantity, so coarser buckets accumulate generation rather
//! than average it.

use crate::core::TimeSeries;
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resampling period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Calendar days at UTC midnight.
    Day,
    /// Calendar weeks, labelled by the Sunday that ends them (the weekly
    /// convention of the upstream data pipeline).
    Week,
}

impl Period {
    /// The bucket label a timestamp falls into.
    pub fn bucket_of(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = Utc
            .with_ymd_and_hms(t.year(), t.month(), t.day(), 0, 0, 0)
            .single()
            .unwrap_or(t);
        match self {
            Period::Day => midnight,
            Period::Week => {
                let days_until_sunday =
                    (7 - midnight.weekday().num_days_from_sunday()) % 7;
                midnight + Duration::days(i64::from(days_until_sunday))
            }
        }
    }

    /// The bucket label one period after `t` (assumed to be a label).
    pub fn next(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Period::Day => t + Duration::days(1),
            Period::Week => t + Duration::days(7),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day => write!(f, "day"),
            Period::Week => write!(f, "week"),
        }
    }
}

/// Resample a series into calendar-aligned buckets by summation.
///
/// The output has exactly one row for every bucket between the first and
/// last observation's bucket; buckets with no observations sum to zero.
/// Resampling an already-aligned series at the same period is the
/// identity. An empty input yields an empty series.
pub fn resample(series: &TimeSeries, period: Period) -> TimeSeries {
    let mut timestamps = Vec::new();
    let mut values = Vec::new();

    if let (Some(first), Some(last)) = (series.start(), series.end()) {
        let end_bucket = period.bucket_of(last);
        let mut bucket = period.bucket_of(first);
        let mut idx = 0;

        let source_stamps = series.timestamps();
        let source_values = series.values();

        loop {
            let mut total = 0.0;
            while idx < source_stamps.len() && period.bucket_of(source_stamps[idx]) == bucket {
                total += source_values[idx];
                idx += 1;
            }
            timestamps.push(bucket);
            values.push(total);

            if bucket == end_bucket {
                break;
            }
            bucket = period.next(bucket);
        }
    }

    TimeSeries::from_raw(timestamps, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn daily_buckets_sum_hourly_observations() {
        let ts = TimeSeries::new(
            vec![at(2024, 1, 1, 6), at(2024, 1, 1, 12), at(2024, 1, 2, 9)],
            vec![10.0, 20.0, 5.0],
        )
        .unwrap();

        let daily = resample(&ts, Period::Day);

        assert_eq!(daily.len(), 2);
        assert_eq!(daily.timestamps()[0], at(2024, 1, 1, 0));
        assert_eq!(daily.values(), &[30.0, 5.0]);
    }

    #[test]
    fn gaps_become_zero_buckets() {
        let ts = TimeSeries::new(
            vec![at(2024, 1, 1, 0), at(2024, 1, 4, 0)],
            vec![7.0, 9.0],
        )
        .unwrap();

        let daily = resample(&ts, Period::Day);

        assert_eq!(daily.len(), 4);
        assert_eq!(daily.values(), &[7.0, 0.0, 0.0, 9.0]);
    }

    #[test]
    fn weekly_buckets_are_labelled_by_ending_sunday() {
        // 2024-01-01 is a Monday; its week ends Sunday 2024-01-07.
        let ts = TimeSeries::new(
            vec![at(2024, 1, 1, 0), at(2024, 1, 3, 0), at(2024, 1, 8, 0)],
            vec![1.0, 2.0, 4.0],
        )
        .unwrap();

        let weekly = resample(&ts, Period::Week);

        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly.timestamps()[0], at(2024, 1, 7, 0));
        assert_eq!(weekly.timestamps()[1], at(2024, 1, 14, 0));
        assert_eq!(weekly.values(), &[3.0, 4.0]);
    }

    #[test]
    fn sunday_observation_stays_in_its_own_week() {
        // 2024-01-07 is a Sunday: it closes the week it labels.
        let ts = TimeSeries::new(vec![at(2024, 1, 7, 10)], vec![5.0]).unwrap();

        let weekly = resample(&ts, Period::Week);
        assert_eq!(weekly.timestamps()[0], at(2024, 1, 7, 0));
        assert_eq!(weekly.values(), &[5.0]);
    }

    #[test]
    fn daily_resample_of_daily_series_is_identity() {
        let stamps: Vec<_> = (1..=5).map(|d| at(2024, 1, d, 0)).collect();
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let ts = TimeSeries::new(stamps, values).unwrap();

        let resampled = resample(&ts, Period::Day);
        assert_eq!(resampled, ts);
    }

    #[test]
    fn empty_series_resamples_to_empty() {
        let ts = TimeSeries::new(vec![], vec![]).unwrap();
        let resampled = resample(&ts, Period::Week);
        assert!(resampled.is_empty());
    }

    #[test]
    fn period_next_steps_by_one_bucket() {
        assert_eq!(Period::Day.next(at(2024, 1, 1, 0)), at(2024, 1, 2, 0));
        assert_eq!(Period::Week.next(at(2024, 1, 7, 0)), at(2024, 1, 14, 0));
    }

    #[test]
    fn period_displays_lowercase() {
        assert_eq!(Period::Day.to_string(), "day");
        assert_eq!(Period::Week.to_string(), "week");
    }
}
