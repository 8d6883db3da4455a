//! Error types for the solaris-forecast library.

use thiserror::Error;

/// Result type alias for forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while loading, resampling, or forecasting a series.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// A required column is missing or malformed in the tabular input.
    #[error("data format error: {0}")]
    DataFormat(String),

    /// Too few observations for the configured model orders.
    #[error("insufficient history: need at least {needed} observations, got {got}")]
    InsufficientHistory { needed: usize, got: usize },

    /// Parameter estimation failed (non-convergence or degenerate objective).
    #[error("model fit failed: {0}")]
    Fit(String),

    /// Model must be fitted before prediction.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Read/write failure on the input or output file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or serialization failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
