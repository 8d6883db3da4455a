//! Derivative-free optimization for parameter estimation.
//!
//! The model layer estimates SARIMA coefficients by minimizing a
//! conditional sum of squares, an objective with no useful analytic
//! gradient, so a bounded Nelder-Mead simplex search is used. The
//! iteration cap bounds total fit time; there is no other timeout on a
//! model fit.

/// Result of a Nelder-Mead minimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best point found.
    pub optimal_point: Vec<f64>,
    /// Objective value at the best point.
    pub optimal_value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the simplex converged within the iteration cap.
    pub converged: bool,
}

/// Tuning parameters for the simplex search.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Iteration cap; also the effective bound on fit time.
    pub max_iter: usize,
    /// Convergence tolerance on the objective spread across the simplex.
    pub tolerance: f64,
    /// Relative step used to build the initial simplex.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            initial_step: 0.05,
        }
    }
}

// Standard Nelder-Mead coefficients: reflection, expansion, contraction,
// shrink.
const ALPHA: f64 = 1.0;
const GAMMA: f64 = 2.0;
const RHO: f64 = 0.5;
const SIGMA: f64 = 0.5;

struct Vertex {
    point: Vec<f64>,
    value: f64,
}

/// Minimize `objective` with an optional box constraint per dimension.
///
/// # Example
/// ```
/// use solaris_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     NelderMeadConfig::default(),
/// );
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let clamp = |point: Vec<f64>| -> Vec<f64> {
        match bounds {
            None => point,
            Some(b) => point
                .into_iter()
                .enumerate()
                .map(|(i, x)| match b.get(i) {
                    Some(&(lo, hi)) => x.clamp(lo, hi),
                    None => x,
                })
                .collect(),
        }
    };
    let eval = |point: Vec<f64>| -> Vertex {
        let value = objective(&point);
        Vertex { point, value }
    };

    // Initial simplex: the start point plus one perturbed vertex per axis.
    let mut simplex: Vec<Vertex> = Vec::with_capacity(n + 1);
    simplex.push(eval(clamp(initial.to_vec())));
    for i in 0..n {
        let mut point = initial.to_vec();
        point[i] += if point[i].abs() > 1e-10 {
            config.initial_step * point[i].abs()
        } else {
            config.initial_step
        };
        simplex.push(eval(clamp(point)));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;
        simplex.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(std::cmp::Ordering::Equal));

        if simplex[n].value - simplex[0].value < config.tolerance {
            converged = true;
            break;
        }

        // Centroid of all vertices but the worst.
        let mut centroid = vec![0.0; n];
        for vertex in &simplex[..n] {
            for (c, x) in centroid.iter_mut().zip(&vertex.point) {
                *c += x / n as f64;
            }
        }
        let blend = |towards: &[f64], coef: f64| -> Vec<f64> {
            centroid
                .iter()
                .zip(towards)
                .map(|(c, t)| c + coef * (t - c))
                .collect()
        };

        let worst = &simplex[n];
        let reflected = eval(clamp(blend(&worst.point, -ALPHA)));

        if reflected.value < simplex[0].value {
            // Try to expand further along the same direction.
            let expanded = eval(clamp(blend(&reflected.point, GAMMA)));
            simplex[n] = if expanded.value < reflected.value {
                expanded
            } else {
                reflected
            };
            continue;
        }

        if reflected.value < simplex[n - 1].value {
            simplex[n] = reflected;
            continue;
        }

        // Contract towards the better of the worst vertex and its reflection.
        let toward = if reflected.value < worst.value {
            &reflected.point
        } else {
            &worst.point
        };
        let contracted = eval(clamp(blend(toward, RHO)));
        if contracted.value < worst.value.min(reflected.value) {
            simplex[n] = contracted;
            continue;
        }

        // Shrink everything towards the best vertex.
        let best = simplex[0].point.clone();
        for vertex in simplex.iter_mut().skip(1) {
            let shrunk: Vec<f64> = best
                .iter()
                .zip(&vertex.point)
                .map(|(b, x)| b + SIGMA * (x - b))
                .collect();
            *vertex = eval(clamp(shrunk));
        }
    }

    simplex.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(std::cmp::Ordering::Equal));
    NelderMeadResult {
        optimal_point: simplex[0].point.clone(),
        optimal_value: simplex[0].value,
        iterations,
        converged,
    }
}
