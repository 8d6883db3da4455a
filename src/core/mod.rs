//! Core data structures for the forecasting pipeline.

mod forecast;
mod time_series;

pub use forecast::Forecast;
pub use time_series::TimeSeries;
