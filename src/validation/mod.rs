//! Statistical validation for the forecasting pipeline.

pub mod stationarity;

pub use stationarity::{adf_test, StationarityTest};
