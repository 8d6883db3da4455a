//! Ordinary least squares on a design matrix.
//!
//! Solves the normal equations by Cholesky decomposition and reports
//! coefficient standard errors, which the augmented Dickey-Fuller
//! regression needs for its t-statistic.

use crate::error::{ForecastError, Result};

/// Fitted OLS regression `y = intercept + X @ coefficients`.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Intercept term.
    pub intercept: f64,
    /// One coefficient per design-matrix column.
    pub coefficients: Vec<f64>,
    /// Standard error per coefficient (same order as `coefficients`).
    pub std_errors: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Unbiased residual variance estimate, RSS / (n - k - 1).
    pub sigma_squared: f64,
}

impl OlsFit {
    /// Residuals `y - y_hat` for the fitting data.
    pub fn residuals(&self, y: &[f64], columns: &[Vec<f64>]) -> Vec<f64> {
        (0..y.len())
            .map(|i| {
                let mut fitted = self.intercept;
                for (coef, col) in self.coefficients.iter().zip(columns) {
                    fitted += coef * col[i];
                }
                y[i] - fitted
            })
            .collect()
    }
}

/// Fit OLS with an implicit intercept column.
///
/// `columns` are the regressor columns of the design matrix, each of the
/// same length as `y`. Fails if the system is rank-deficient (e.g. a
/// constant regressor duplicating the intercept) or if there are not more
/// observations than parameters.
pub fn ols_fit(y: &[f64], columns: &[Vec<f64>]) -> Result<OlsFit> {
    let n = y.len();
    let k = columns.len();
    let num_params = k + 1;

    if n <= num_params {
        return Err(ForecastError::InsufficientHistory {
            needed: num_params + 1,
            got: n,
        });
    }
    for col in columns {
        if col.len() != n {
            return Err(ForecastError::InvalidParameter(format!(
                "regressor length {} does not match {} observations",
                col.len(),
                n
            )));
        }
    }

    // Normal equations: (X'X) beta = X'y with X = [1 | columns].
    let mut xtx = vec![vec![0.0; num_params]; num_params];
    let mut xty = vec![0.0; num_params];

    xtx[0][0] = n as f64;
    xty[0] = y.iter().sum();
    for (j, col) in columns.iter().enumerate() {
        let sum: f64 = col.iter().sum();
        xtx[0][j + 1] = sum;
        xtx[j + 1][0] = sum;
        xty[j + 1] = col.iter().zip(y).map(|(x, yi)| x * yi).sum();
        for (l, other) in columns.iter().enumerate().skip(j) {
            let dot: f64 = col.iter().zip(other).map(|(a, b)| a * b).sum();
            xtx[j + 1][l + 1] = dot;
            xtx[l + 1][j + 1] = dot;
        }
    }

    let chol = cholesky(&xtx).ok_or_else(|| {
        ForecastError::Fit("OLS normal equations are not positive definite".to_string())
    })?;
    let beta = chol_solve(&chol, &xty);

    let fit = OlsFit {
        intercept: beta[0],
        coefficients: beta[1..].to_vec(),
        std_errors: vec![],
        rss: 0.0,
        sigma_squared: 0.0,
    };
    let residuals = fit.residuals(y, columns);
    let rss: f64 = residuals.iter().map(|r| r * r).sum();
    let dof = n - num_params;
    let sigma_squared = rss / dof as f64;

    // se(beta_j) = sqrt(sigma^2 * (X'X)^{-1}_{jj}); invert via unit solves.
    let mut std_errors = Vec::with_capacity(k);
    for j in 1..num_params {
        let mut e = vec![0.0; num_params];
        e[j] = 1.0;
        let inv_col = chol_solve(&chol, &e);
        std_errors.push((sigma_squared * inv_col[j]).max(0.0).sqrt());
    }

    Ok(OlsFit {
        std_errors,
        rss,
        sigma_squared,
        ..fit
    })
}

/// Cholesky factor L of a symmetric positive definite matrix, or None.
fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for m in 0..j {
                sum -= l[i][m] * l[j][m];
            }
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }
    Some(l)
}

/// Solve A x = b given the Cholesky factor L of A.
fn chol_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();

    // Forward: L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward: L' x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_simple_linear_relation() {
        // y = 2 + 3x
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y: Vec<f64> = x.iter().map(|xi| 2.0 + 3.0 * xi).collect();

        let fit = ols_fit(&y, &[x]).unwrap();

        assert_relative_eq!(fit.intercept, 2.0, epsilon = 1e-8);
        assert_relative_eq!(fit.coefficients[0], 3.0, epsilon = 1e-8);
        assert!(fit.rss < 1e-12);
    }

    #[test]
    fn recovers_two_regressors() {
        // y = 1 + 2a + 3b, non-collinear columns
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let b = vec![0.5, 2.5, 1.0, 3.0, 1.5, 3.5, 2.0, 4.0];
        let y: Vec<f64> = a
            .iter()
            .zip(&b)
            .map(|(ai, bi)| 1.0 + 2.0 * ai + 3.0 * bi)
            .collect();

        let fit = ols_fit(&y, &[a, b]).unwrap();

        assert_relative_eq!(fit.intercept, 1.0, epsilon = 1e-6);
        assert_relative_eq!(fit.coefficients[0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(fit.coefficients[1], 3.0, epsilon = 1e-6);
    }

    #[test]
    fn standard_errors_shrink_with_sample_size() {
        let noise = |i: usize| ((i * 37 % 11) as f64 - 5.0) * 0.1;

        let make = |n: usize| {
            let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
            let y: Vec<f64> = x.iter().enumerate().map(|(i, xi)| 1.0 + 0.5 * xi + noise(i)).collect();
            ols_fit(&y, &[x]).unwrap()
        };

        let small = make(20);
        let large = make(200);
        assert!(large.std_errors[0] < small.std_errors[0]);
    }

    #[test]
    fn no_regressors_yields_mean_intercept() {
        let y = vec![2.0, 4.0, 6.0, 8.0];
        let fit = ols_fit(&y, &[]).unwrap();
        assert_relative_eq!(fit.intercept, 5.0, epsilon = 1e-12);
        assert!(fit.coefficients.is_empty());
    }

    #[test]
    fn rejects_underdetermined_system() {
        let y = vec![1.0, 2.0];
        let x = vec![1.0, 2.0];
        assert!(matches!(
            ols_fit(&y, &[x]),
            Err(ForecastError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn rejects_mismatched_column_length() {
        let y = vec![1.0, 2.0, 3.0, 4.0];
        let x = vec![1.0, 2.0];
        assert!(ols_fit(&y, &[x]).is_err());
    }

    #[test]
    fn residuals_sum_to_zero_with_intercept() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![5.1, 7.9, 11.2, 13.8, 17.0];

        let fit = ols_fit(&y, &[x.clone()]).unwrap();
        let residuals = fit.residuals(&y, &[x]);
        let sum: f64 = residuals.iter().sum();
        assert!(sum.abs() < 1e-8);
    }
}
