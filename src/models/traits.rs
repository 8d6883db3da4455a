//! Forecaster trait defining the model interface.

use crate::core::{Forecast, TimeSeries};
use crate::error::Result;

/// Common interface for forecasting models.
///
/// A model starts unfit; `fit` either populates its state or fails, and
/// `predict` either yields a full-horizon forecast or fails. Calling
/// `predict` on an unfit model is an error, never a panic.
pub trait Forecaster {
    /// Fit the model to the time series by maximum-likelihood-style
    /// estimation over the full history.
    fn fit(&mut self, series: &TimeSeries) -> Result<()>;

    /// Produce exactly `horizon` chained one-step-ahead point predictions
    /// starting immediately after the last historical period.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// In-sample fitted values, if the model has been fitted.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Residuals (actual - fitted), if the model has been fitted.
    fn residuals(&self) -> Option<&[f64]>;

    /// Model name for display and logging.
    fn name(&self) -> &str;

    /// Whether the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}
