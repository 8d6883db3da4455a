//! # solaris-forecast
//!
//! Forecasting pipeline for solar generation series: loads a timestamped
//! CSV, resamples it to calendar-aligned daily or weekly buckets, checks
//! stationarity with an augmented Dickey-Fuller test, fits a seasonal ARIMA
//! model, and post-processes the point forecast for output.
//!
//! The top-level entry point is [`pipeline::ForecastPipeline`]; the
//! individual stages are usable on their own.

pub mod core;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod postprocess;
pub mod resample;
pub mod source;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::sarima::{Sarima, SarimaOrder};
    pub use crate::models::Forecaster;
    pub use crate::pipeline::{ForecastPipeline, PipelineConfig, PipelineReport};
    pub use crate::resample::{resample, Period};
}
