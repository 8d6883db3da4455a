//! Augmented Dickey-Fuller unit-root test.
//!
//! Tests the null hypothesis that a series has a unit root
//! (non-stationary); rejection implies stationarity. The regression
//! includes a constant, the lag order is chosen by AIC, and the p-value
//! comes from the MacKinnon (1994) response-surface approximation, the
//! same surface used by the reference `adfuller` implementations.

use crate::utils::ols::ols_fit;
use crate::utils::stats::variance;
use statrs::function::erf::erf;

/// Outcome of an augmented Dickey-Fuller test.
///
/// A degenerate input (short, constant, or a singular regression) yields
/// NaN statistic and p-value; `is_stationary` then reports `false`, so
/// callers fall back to differencing rather than failing.
#[derive(Debug, Clone)]
pub struct StationarityTest {
    /// The tau statistic (t-ratio on the lagged level).
    pub statistic: f64,
    /// Approximate asymptotic p-value.
    pub p_value: f64,
    /// Number of lagged difference terms included.
    pub lags: usize,
    /// Effective observations in the test regression.
    pub n_obs: usize,
}

impl StationarityTest {
    /// Stationarity verdict at significance level `alpha`.
    ///
    /// NaN p-values (degenerate inputs) are treated as non-stationary.
    pub fn is_stationary(&self, alpha: f64) -> bool {
        self.p_value.is_finite() && self.p_value <= alpha
    }

    fn degenerate(lags: usize, n_obs: usize) -> Self {
        Self {
            statistic: f64::NAN,
            p_value: f64::NAN,
            lags,
            n_obs,
        }
    }
}

/// Run the augmented Dickey-Fuller test with a constant term.
///
/// Non-finite entries are dropped before testing. `max_lags` defaults to
/// ⌊(n − 1)^(1/3)⌋; the reported lag order is the AIC minimizer over
/// 0..=max_lags.
pub fn adf_test(series: &[f64], max_lags: Option<usize>) -> StationarityTest {
    let y: Vec<f64> = series.iter().copied().filter(|v| v.is_finite()).collect();
    let n = y.len();

    if n < 8 {
        return StationarityTest::degenerate(0, 0);
    }
    // A (near-)constant series makes the level regressor collinear with
    // the constant; the statistic is undefined.
    if variance(&y) < f64::EPSILON {
        return StationarityTest::degenerate(0, 0);
    }

    let default_lags = ((n - 1) as f64).powf(1.0 / 3.0).floor() as usize;
    let upper = max_lags.unwrap_or(default_lags).min(n / 2 - 2);

    // dy[t] = y[t+1] - y[t]
    let dy: Vec<f64> = y.windows(2).map(|w| w[1] - w[0]).collect();

    let mut best: Option<(f64, usize)> = None;
    for k in 0..=upper {
        if let Some(aic) = regression_aic(&y, &dy, k) {
            if best.map_or(true, |(b, _)| aic < b) {
                best = Some((aic, k));
            }
        }
    }
    let Some((_, lags)) = best else {
        return StationarityTest::degenerate(0, 0);
    };

    match adf_regression(&y, &dy, lags) {
        Some((tau, n_obs)) => StationarityTest {
            statistic: tau,
            p_value: mackinnon_p_value(tau),
            lags,
            n_obs,
        },
        None => StationarityTest::degenerate(lags, 0),
    }
}

/// Build the ADF design for lag order `k` and return (dependent, columns).
///
/// Regression: Δy_t = α + β·y_{t-1} + Σ_{j=1..k} γ_j·Δy_{t-j} + ε_t.
fn adf_design(y: &[f64], dy: &[f64], k: usize) -> Option<(Vec<f64>, Vec<Vec<f64>>)> {
    let m = dy.len().checked_sub(k)?;
    if m < k + 4 {
        return None;
    }

    let dependent = dy[k..].to_vec();
    let mut columns = Vec::with_capacity(k + 1);
    columns.push(y[k..y.len() - 1].to_vec());
    for j in 1..=k {
        columns.push(dy[k - j..dy.len() - j].to_vec());
    }
    Some((dependent, columns))
}

/// AIC of the ADF regression at lag order `k`, or None if infeasible.
fn regression_aic(y: &[f64], dy: &[f64], k: usize) -> Option<f64> {
    let (dependent, columns) = adf_design(y, dy, k)?;
    let fit = ols_fit(&dependent, &columns).ok()?;
    let m = dependent.len() as f64;
    if fit.rss <= 0.0 {
        return None;
    }
    let params = (k + 2) as f64;
    Some(m * (fit.rss / m).ln() + 2.0 * params)
}

/// The tau statistic for lag order `k`, with the effective sample size.
fn adf_regression(y: &[f64], dy: &[f64], k: usize) -> Option<(f64, usize)> {
    let (dependent, columns) = adf_design(y, dy, k)?;
    let fit = ols_fit(&dependent, &columns).ok()?;
    let se = fit.std_errors[0];
    if se == 0.0 || !se.is_finite() {
        return None;
    }
    Some((fit.coefficients[0] / se, dependent.len()))
}

// MacKinnon (1994) response surface for the constant-only case: p-value =
// Φ(polynomial(τ)), with a quadratic below τ* and a cubic above.
const TAU_MIN: f64 = -18.83;
const TAU_MAX: f64 = 2.74;
const TAU_STAR: f64 = -1.61;
const TAU_SMALLP: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGEP: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

fn mackinnon_p_value(tau: f64) -> f64 {
    if tau.is_nan() {
        return f64::NAN;
    }
    if tau <= TAU_MIN {
        return 0.0;
    }
    if tau >= TAU_MAX {
        return 1.0;
    }

    let z = if tau <= TAU_STAR {
        polyval(&TAU_SMALLP, tau)
    } else {
        polyval(&TAU_LARGEP, tau)
    };
    norm_cdf(z)
}

fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .map(|(i, c)| c * x.powi(i as i32))
        .sum()
}

fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}
