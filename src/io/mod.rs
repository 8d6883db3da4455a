//! CSV input and output for the forecasting pipeline.

pub mod loader;
pub mod writer;

pub use loader::{load_csv, read_series, CsvSchema};
pub use writer::write_forecast_csv;
