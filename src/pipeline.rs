//! End-to-end forecasting pipeline.
//!
//! Resample → stationarity check → SARIMA fit → forecast → post-process.
//! All state lives in the pipeline struct and its report; there are no
//! globals, and nothing is written to disk unless every stage succeeds.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::io::{write_forecast_csv, CsvSchema};
use crate::models::sarima::{Sarima, SarimaOrder};
use crate::models::Forecaster;
use crate::postprocess::{clamp_negative_forecasts, future_timestamps};
use crate::resample::{resample, Period};
use crate::validation::{adf_test, StationarityTest};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Everything the pipeline needs, supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Input column names.
    pub schema: CsvSchema,
    /// Resampling period.
    pub period: Period,
    /// SARIMA orders, chosen offline.
    pub order: SarimaOrder,
    /// Number of future periods to forecast.
    pub horizon: usize,
    /// Significance threshold for the stationarity test.
    pub significance: f64,
    /// Display unit for forecast values.
    pub unit: String,
}

impl Default for PipelineConfig {
    /// The weekly German solar configuration the pipeline was built
    /// around; callers override freely.
    fn default() -> Self {
        Self {
            schema: CsvSchema::new("datetime_Europe_Brussels", "solar_actual_MWh"),
            period: Period::Week,
            order: SarimaOrder::new(9, 1, 5, 1, 0, 1, 52),
            horizon: 14,
            significance: 0.05,
            unit: "MWh".to_string(),
        }
    }
}

/// Outcome of a successful pipeline run.
#[derive(Debug)]
pub struct PipelineReport {
    /// The post-processed forecast with timestamps and unit attached.
    pub forecast: Forecast,
    /// The stationarity test result for the resampled series.
    pub stationarity: StationarityTest,
    /// Effective differencing order used by the model (the configured `d`,
    /// plus one when the series tested non-stationary).
    pub differencing: usize,
    /// Number of resampled observations the model was fitted on.
    pub observations: usize,
}

/// The forecasting pipeline.
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: PipelineConfig,
}

impl ForecastPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline on an already-loaded series.
    ///
    /// The input is resampled to the configured period, tested for
    /// stationarity (a non-stationary verdict raises the model's
    /// differencing order by one; the model applies the differencing
    /// itself, so the data is never differenced twice), fitted, forecast,
    /// and post-processed. Any stage error aborts the run.
    pub fn run(&self, series: &TimeSeries) -> Result<PipelineReport> {
        if self.config.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "forecast horizon must be positive".to_string(),
            ));
        }
        if series.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let resampled = resample(&series.drop_missing(), self.config.period);
        let last = resampled.end().ok_or(ForecastError::EmptyData)?;

        let stationarity = adf_test(resampled.values(), None);
        let mut order = self.config.order;
        if !stationarity.is_stationary(self.config.significance) {
            order.d += 1;
            info!(
                p_value = stationarity.p_value,
                d = order.d,
                "series is not stationary; raising the differencing order"
            );
        }

        let mut model = Sarima::new(order);
        model.fit(&resampled)?;
        let raw = model.predict(self.config.horizon)?;

        let stamps = future_timestamps(last, self.config.period, self.config.horizon);
        let forecast = raw
            .map_values(clamp_negative_forecasts)
            .with_timestamps(stamps)?
            .with_unit(self.config.unit.as_str());

        info!(
            observations = resampled.len(),
            horizon = forecast.horizon(),
            period = %self.config.period,
            "pipeline run complete"
        );

        Ok(PipelineReport {
            forecast,
            stationarity,
            differencing: order.d,
            observations: resampled.len(),
        })
    }

    /// Run the pipeline and write the forecast CSV.
    ///
    /// Nothing is written unless the whole run succeeds; the write itself
    /// is atomic, so a reader never sees a partially forecast file.
    pub fn run_to_csv(&self, series: &TimeSeries, path: &Path) -> Result<PipelineReport> {
        let report = self.run(series)?;
        write_forecast_csv(&report.forecast, &self.config.schema.timestamp_column, path)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn daily_series(n: usize) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<DateTime<Utc>> =
            (0..n).map(|i| base + Duration::days(i as i64)).collect();
        let values: Vec<f64> = (0..n)
            .map(|i| {
                200.0
                    + 1.5 * i as f64
                    + 40.0 * (2.0 * std::f64::consts::PI * i as f64 / 7.0).sin()
            })
            .collect();
        TimeSeries::new(timestamps, values).unwrap()
    }

    fn daily_config() -> PipelineConfig {
        PipelineConfig {
            schema: CsvSchema::new("timestamp", "generation"),
            period: Period::Day,
            order: SarimaOrder::new(1, 1, 1, 1, 0, 1, 7),
            horizon: 14,
            significance: 0.05,
            unit: "MWh".to_string(),
        }
    }

    #[test]
    fn runs_end_to_end_on_daily_data() {
        let series = daily_series(60);
        let pipeline = ForecastPipeline::new(daily_config());

        let report = pipeline.run(&series).unwrap();

        assert_eq!(report.forecast.horizon(), 14);
        assert_eq!(report.observations, 60);
        assert_eq!(report.forecast.unit(), Some("MWh"));

        // Forecast dates are the 14 days following the last input date.
        let last = series.end().unwrap();
        let stamps = report.forecast.timestamps();
        assert_eq!(stamps[0], last + Duration::days(1));
        assert_eq!(stamps[13], last + Duration::days(14));
        for pair in stamps.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }

    #[test]
    fn trending_input_raises_differencing_order() {
        let series = daily_series(60);
        let pipeline = ForecastPipeline::new(daily_config());

        let report = pipeline.run(&series).unwrap();

        // The strong trend fails the ADF test, so d goes from 1 to 2.
        assert!(!report.stationarity.is_stationary(0.05));
        assert_eq!(report.differencing, 2);
    }

    #[test]
    fn empty_input_is_rejected() {
        let series = TimeSeries::new(vec![], vec![]).unwrap();
        let pipeline = ForecastPipeline::new(daily_config());
        assert!(matches!(
            pipeline.run(&series),
            Err(ForecastError::EmptyData)
        ));
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let mut config = daily_config();
        config.horizon = 0;
        let pipeline = ForecastPipeline::new(config);
        assert!(matches!(
            pipeline.run(&daily_series(60)),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn short_history_aborts_before_fitting() {
        let mut config = daily_config();
        config.order = SarimaOrder::new(9, 1, 5, 1, 0, 1, 52);
        let pipeline = ForecastPipeline::new(config);

        let result = pipeline.run(&daily_series(30));
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn default_config_mirrors_the_weekly_solar_scripts() {
        let config = PipelineConfig::default();
        assert_eq!(config.period, Period::Week);
        assert_eq!(config.horizon, 14);
        assert_eq!(config.order, SarimaOrder::new(9, 1, 5, 1, 0, 1, 52));
        assert_eq!(config.significance, 0.05);
        assert_eq!(config.schema.timestamp_column, "datetime_Europe_Brussels");
    }
}
