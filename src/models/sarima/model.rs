//! Seasonal ARIMA model with conditional-sum-of-squares estimation.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::sarima::diff::{
    difference, integrate, seasonal_difference, seasonal_integrate,
};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::mean;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// SARIMA model orders: non-seasonal (p, d, q) and seasonal (P, D, Q) at
/// period `s`. Chosen offline and passed in as configuration; nothing here
/// selects orders automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SarimaOrder {
    /// AR order (p).
    pub p: usize,
    /// Differencing order (d).
    pub d: usize,
    /// MA order (q).
    pub q: usize,
    /// Seasonal AR order (P).
    pub seasonal_p: usize,
    /// Seasonal differencing order (D).
    pub seasonal_d: usize,
    /// Seasonal MA order (Q).
    pub seasonal_q: usize,
    /// Seasonal period length (s), e.g. 7 for day-of-week, 52 for weekly
    /// data with yearly seasonality.
    pub seasonal_period: usize,
}

impl SarimaOrder {
    /// Create an order from the seven integers (p, d, q)(P, D, Q, s).
    pub fn new(
        p: usize,
        d: usize,
        q: usize,
        seasonal_p: usize,
        seasonal_d: usize,
        seasonal_q: usize,
        seasonal_period: usize,
    ) -> Self {
        Self {
            p,
            d,
            q,
            seasonal_p,
            seasonal_d,
            seasonal_q,
            seasonal_period,
        }
    }

    /// Number of estimated parameters (AR + MA + seasonal AR + seasonal MA
    /// + intercept).
    pub fn num_params(&self) -> usize {
        self.p + self.q + self.seasonal_p + self.seasonal_q + 1
    }

    /// First index of the differenced series at which the CSS recursion
    /// has a full set of lags available.
    fn recursion_start(&self) -> usize {
        let s = self.seasonal_period;
        self.p
            .max(self.q)
            .max(self.seasonal_p * s)
            .max(self.seasonal_q * s)
    }

    /// Minimum history length required to fit this order.
    ///
    /// Covers both the configured-order rule (more observations than
    /// p + d + q + P·s) and what the recursion itself consumes after
    /// differencing.
    pub fn min_history(&self) -> usize {
        let s = self.seasonal_period;
        let configured = self.p + self.d + self.q + self.seasonal_p * s + 1;
        let internal = self.recursion_start() + 2 + self.d + self.seasonal_d * s;
        configured.max(internal)
    }
}

impl Default for SarimaOrder {
    fn default() -> Self {
        Self::new(1, 1, 1, 0, 0, 0, 0)
    }
}

/// Seasonal ARIMA forecasting model.
///
/// Fitting seasonally differences the series D times at lag s, then
/// ordinarily differences it d times, and estimates the AR/MA/seasonal
/// coefficients by minimizing the conditional sum of squares with a
/// bounded simplex search. The seasonal and non-seasonal polynomials are
/// combined additively in the recursion.
#[derive(Debug, Clone)]
pub struct Sarima {
    order: SarimaOrder,
    intercept: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
    seasonal_ar: Vec<f64>,
    seasonal_ma: Vec<f64>,
    /// Original series (for seasonal integration).
    original: Option<Vec<f64>>,
    /// Seasonally differenced series (for ordinary integration).
    seasonal_level: Option<Vec<f64>>,
    /// Fully differenced series the recursion runs on.
    working: Option<Vec<f64>>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    residual_variance: Option<f64>,
    aic: Option<f64>,
    bic: Option<f64>,
}

impl Sarima {
    /// Create an unfit model with the given orders.
    pub fn new(order: SarimaOrder) -> Self {
        Self {
            order,
            intercept: 0.0,
            ar: vec![],
            ma: vec![],
            seasonal_ar: vec![],
            seasonal_ma: vec![],
            original: None,
            seasonal_level: None,
            working: None,
            fitted: None,
            residuals: None,
            residual_variance: None,
            aic: None,
            bic: None,
        }
    }

    /// Model orders.
    pub fn order(&self) -> SarimaOrder {
        self.order
    }

    /// AR coefficients (empty until fitted).
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    /// MA coefficients (empty until fitted).
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    /// Seasonal AR coefficients (empty until fitted).
    pub fn seasonal_ar_coefficients(&self) -> &[f64] {
        &self.seasonal_ar
    }

    /// Seasonal MA coefficients (empty until fitted).
    pub fn seasonal_ma_coefficients(&self) -> &[f64] {
        &self.seasonal_ma
    }

    /// Intercept of the differenced-scale recursion.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Akaike information criterion of the fit.
    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    /// Bayesian information criterion of the fit.
    pub fn bic(&self) -> Option<f64> {
        self.bic
    }

    /// One step of the CSS recursion at index `t` of `working`, given the
    /// residuals so far.
    fn step(
        order: &SarimaOrder,
        params: &SarimaParams<'_>,
        working: &[f64],
        residuals: &[f64],
        t: usize,
    ) -> f64 {
        let c = params.intercept;
        let s = order.seasonal_period;
        let mut pred = c;

        for (i, phi) in params.ar.iter().enumerate() {
            pred += phi * (working[t - 1 - i] - c);
        }
        for (j, theta) in params.ma.iter().enumerate() {
            pred += theta * residuals[t - 1 - j];
        }
        for (i, phi) in params.seasonal_ar.iter().enumerate() {
            pred += phi * (working[t - (i + 1) * s] - c);
        }
        for (j, theta) in params.seasonal_ma.iter().enumerate() {
            pred += theta * residuals[t - (j + 1) * s];
        }
        pred
    }

    /// Conditional sum of squares of the recursion over `working`.
    fn css(order: &SarimaOrder, params: &SarimaParams<'_>, working: &[f64]) -> f64 {
        let start = order.recursion_start();
        let n = working.len();
        if n <= start {
            return f64::MAX;
        }

        let mut residuals = vec![0.0; n];
        let mut total = 0.0;
        for t in start..n {
            let pred = Self::step(order, params, working, &residuals, t);
            let error = working[t] - pred;
            residuals[t] = error;
            total += error * error;
        }

        if total.is_finite() {
            total
        } else {
            f64::MAX
        }
    }

    /// Estimate coefficients on the differenced series.
    fn estimate(&mut self, working: &[f64]) -> Result<()> {
        let order = self.order;
        let level = mean(working);

        if order.num_params() == 1 {
            // No AR/MA terms on either scale; the model reduces to a
            // constant drift on the differenced scale.
            self.intercept = level;
            return Ok(());
        }

        let mut initial = vec![0.0; order.num_params()];
        initial[0] = level;
        for (i, x) in initial[1..].iter_mut().enumerate() {
            *x = 0.1 / (i + 1) as f64;
        }

        // Coefficients bounded inside the unit interval for
        // stationarity/invertibility of each polynomial.
        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        bounds.resize(order.num_params(), (-0.99, 0.99));

        let result = nelder_mead(
            |candidate| {
                let params = SarimaParams::split(candidate, &order);
                Self::css(&order, &params, working)
            },
            &initial,
            Some(&bounds),
            NelderMeadConfig {
                max_iter: 2000,
                tolerance: 1e-8,
                ..Default::default()
            },
        );

        if !result.optimal_value.is_finite() || result.optimal_value == f64::MAX {
            return Err(ForecastError::Fit(
                "conditional sum of squares is degenerate at the optimum".to_string(),
            ));
        }
        if !result.converged {
            // Optimizer warnings are logged, never surfaced as errors.
            warn!(
                iterations = result.iterations,
                css = result.optimal_value,
                "SARIMA estimation hit the iteration cap before converging"
            );
        }

        let params = SarimaParams::split(&result.optimal_point, &self.order);
        self.intercept = params.intercept;
        self.ar = params.ar.to_vec();
        self.ma = params.ma.to_vec();
        self.seasonal_ar = params.seasonal_ar.to_vec();
        self.seasonal_ma = params.seasonal_ma.to_vec();
        Ok(())
    }

    /// Fitted values, residuals, and information criteria on the
    /// differenced scale.
    fn compute_diagnostics(&mut self, working: &[f64]) -> Result<()> {
        let order = self.order;
        let start = order.recursion_start();
        let n = working.len();
        let params = self.params();

        let mut fitted = vec![f64::NAN; n];
        let mut residuals = vec![0.0; n];
        for t in start..n {
            let pred = Self::step(&order, &params, working, &residuals, t);
            fitted[t] = pred;
            residuals[t] = working[t] - pred;
        }

        let effective = &residuals[start..];
        let variance = effective.iter().map(|r| r * r).sum::<f64>() / effective.len() as f64;
        if !variance.is_finite() {
            return Err(ForecastError::Fit(
                "residual variance is not finite".to_string(),
            ));
        }

        let n_eff = effective.len() as f64;
        let k = order.num_params() as f64;
        // Gaussian log-likelihood at the CSS variance estimate; degenerate
        // (zero-variance) fits get no information criteria.
        if variance > 0.0 {
            let ll = -0.5 * n_eff * (1.0 + variance.ln() + (2.0 * std::f64::consts::PI).ln());
            self.aic = Some(-2.0 * ll + 2.0 * k);
            self.bic = Some(-2.0 * ll + k * n_eff.ln());
        }

        self.residual_variance = Some(variance);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    fn params(&self) -> SarimaParams<'_> {
        SarimaParams {
            intercept: self.intercept,
            ar: &self.ar,
            ma: &self.ma,
            seasonal_ar: &self.seasonal_ar,
            seasonal_ma: &self.seasonal_ma,
        }
    }
}

impl Default for Sarima {
    fn default() -> Self {
        Self::new(SarimaOrder::default())
    }
}

/// Borrowed view of one parameter vector, in optimizer layout
/// `[intercept, ar.., ma.., seasonal_ar.., seasonal_ma..]`.
struct SarimaParams<'a> {
    intercept: f64,
    ar: &'a [f64],
    ma: &'a [f64],
    seasonal_ar: &'a [f64],
    seasonal_ma: &'a [f64],
}

impl<'a> SarimaParams<'a> {
    fn split(flat: &'a [f64], order: &SarimaOrder) -> Self {
        let (p, q, sp) = (order.p, order.q, order.seasonal_p);
        Self {
            intercept: flat[0],
            ar: &flat[1..1 + p],
            ma: &flat[1 + p..1 + p + q],
            seasonal_ar: &flat[1 + p + q..1 + p + q + sp],
            seasonal_ma: &flat[1 + p + q + sp..],
        }
    }
}

impl Forecaster for Sarima {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let order = self.order;
        let s = order.seasonal_period;

        if s == 0 && (order.seasonal_p > 0 || order.seasonal_d > 0 || order.seasonal_q > 0) {
            return Err(ForecastError::InvalidParameter(
                "seasonal period must be positive when seasonal orders are set".to_string(),
            ));
        }

        let values = series.values();
        let needed = order.min_history();
        if values.len() < needed {
            return Err(ForecastError::InsufficientHistory {
                needed,
                got: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidParameter(
                "series contains non-finite values".to_string(),
            ));
        }

        let seasonal_level = seasonal_difference(values, order.seasonal_d, s);
        let working = difference(&seasonal_level, order.d);

        self.estimate(&working)?;
        self.compute_diagnostics(&working)?;

        debug!(
            n = values.len(),
            effective = working.len(),
            aic = self.aic,
            "SARIMA fit complete"
        );

        self.original = Some(values.to_vec());
        self.seasonal_level = Some(seasonal_level);
        self.working = Some(working);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let original = self.original.as_ref().ok_or(ForecastError::FitRequired)?;
        let seasonal_level = self
            .seasonal_level
            .as_ref()
            .ok_or(ForecastError::FitRequired)?;
        let working = self.working.as_ref().ok_or(ForecastError::FitRequired)?;
        let residuals = self.residuals.as_ref().ok_or(ForecastError::FitRequired)?;

        if horizon == 0 {
            return Ok(Forecast::new());
        }

        let order = self.order;
        let s = order.seasonal_period;
        let c = self.intercept;

        // Chained one-step-ahead recursion: each step sees only model
        // state and previously forecast values; future shocks are zero.
        let mut extended = working.clone();
        let mut extended_residuals = residuals.clone();
        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = c;

            for (i, phi) in self.ar.iter().enumerate() {
                if t > i {
                    pred += phi * (extended[t - 1 - i] - c);
                }
            }
            for (j, theta) in self.ma.iter().enumerate() {
                if t > j {
                    pred += theta * extended_residuals[t - 1 - j];
                }
            }
            for (i, phi) in self.seasonal_ar.iter().enumerate() {
                let lag = (i + 1) * s;
                if t >= lag {
                    pred += phi * (extended[t - lag] - c);
                }
            }
            for (j, theta) in self.seasonal_ma.iter().enumerate() {
                let lag = (j + 1) * s;
                if t >= lag {
                    pred += theta * extended_residuals[t - lag];
                }
            }

            extended.push(pred);
            extended_residuals.push(0.0);
        }

        let forecast_diff = &extended[working.len()..];

        // Undo differencing in reverse order of application.
        let on_seasonal_scale = integrate(forecast_diff, seasonal_level, order.d);
        let predictions =
            seasonal_integrate(&on_seasonal_scale, original, order.seasonal_d, s);

        Ok(Forecast::from_values(predictions))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "SARIMA"
    }
}
