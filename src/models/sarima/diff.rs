//! Differencing and integration for the SARIMA model.
//!
//! Fitting differences the series (seasonally first, then ordinarily);
//! forecasting reverses both, ordinary integration first.

/// Apply ordinary differencing `d` times.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Apply seasonal differencing `d` times at lag `period`.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return series.to_vec();
    }
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= period {
            return Vec::new();
        }
        result = (period..result.len())
            .map(|t| result[t] - result[t - period])
            .collect();
    }
    result
}

/// Reverse ordinary differencing on a forecast continuation.
///
/// `history` is the series that was differenced `d` times; its trailing
/// values seed the cumulative sums at each level.
pub fn integrate(forecast: &[f64], history: &[f64], d: usize) -> Vec<f64> {
    let mut result = forecast.to_vec();
    for level in (0..d).rev() {
        let seed = difference(history, level);
        let mut acc = seed.last().copied().unwrap_or(0.0);
        for value in &mut result {
            acc += *value;
            *value = acc;
        }
    }
    result
}

/// Reverse seasonal differencing on a forecast continuation.
///
/// Each reconstructed value adds the observation one `period` earlier,
/// drawing on `history` first and then on already-reconstructed values.
pub fn seasonal_integrate(forecast: &[f64], history: &[f64], d: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return forecast.to_vec();
    }
    let mut result = forecast.to_vec();
    for level in (0..d).rev() {
        let mut extended = seasonal_difference(history, level, period);
        let mut reconstructed = Vec::with_capacity(result.len());
        for &value in &result {
            let value = match extended.len().checked_sub(period) {
                Some(idx) => value + extended[idx],
                None => value,
            };
            extended.push(value);
            reconstructed.push(value);
        }
        result = reconstructed;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn difference_orders() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&series, 0), series);
        assert_eq!(difference(&series, 1), vec![2.0, 3.0, 4.0, 5.0]);
        assert_eq!(difference(&series, 2), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn difference_shrinks_to_empty() {
        assert!(difference(&[1.0], 1).is_empty());
        assert!(difference(&[], 1).is_empty());
    }

    #[test]
    fn seasonal_difference_removes_repeating_pattern() {
        // Quarterly values shifted up by 10 each year.
        let series = vec![
            100.0, 120.0, 80.0, 90.0, // year 1
            110.0, 130.0, 90.0, 100.0, // year 2
        ];
        assert_eq!(
            seasonal_difference(&series, 1, 4),
            vec![10.0, 10.0, 10.0, 10.0]
        );

        let periodic = vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0];
        assert_eq!(seasonal_difference(&periodic, 1, 3), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn seasonal_difference_identity_cases() {
        let series = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(seasonal_difference(&series, 0, 2), series);
        assert_eq!(seasonal_difference(&series, 1, 0), series);
        assert!(seasonal_difference(&series, 1, 4).is_empty());
    }

    #[test]
    fn integrate_continues_from_last_history_value() {
        let history = vec![10.0, 12.0, 15.0, 19.0, 24.0];
        let forecast_diff = vec![6.0, 7.0];

        let integrated = integrate(&forecast_diff, &history, 1);
        assert_relative_eq!(integrated[0], 30.0, epsilon = 1e-10);
        assert_relative_eq!(integrated[1], 37.0, epsilon = 1e-10);
    }

    #[test]
    fn integrate_reverses_double_difference() {
        // Quadratic series: second difference is constant 1.
        let history = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        let continuation = integrate(&[1.0, 1.0], &history, 2);

        // Continuing the quadratic: 21, 28.
        assert_relative_eq!(continuation[0], 21.0, epsilon = 1e-10);
        assert_relative_eq!(continuation[1], 28.0, epsilon = 1e-10);
    }

    #[test]
    fn seasonal_integrate_reverses_seasonal_difference() {
        let history = vec![
            100.0, 120.0, 80.0, 90.0, //
            110.0, 130.0, 90.0, 100.0,
        ];
        // Seasonal differences continuing the +10/year pattern.
        let reconstructed = seasonal_integrate(&[10.0, 10.0], &history, 1, 4);

        assert_relative_eq!(reconstructed[0], 120.0, epsilon = 1e-10);
        assert_relative_eq!(reconstructed[1], 140.0, epsilon = 1e-10);
    }

    #[test]
    fn seasonal_integrate_chains_onto_its_own_output() {
        let history = vec![1.0, 2.0, 1.0, 2.0];
        // Five zero differences wrap past the history into reconstructed
        // values: the pattern keeps repeating.
        let reconstructed = seasonal_integrate(&[0.0; 5], &history, 1, 2);
        assert_eq!(reconstructed, vec![1.0, 2.0, 1.0, 2.0, 1.0]);
    }

    #[test]
    fn zero_order_integration_is_identity() {
        let forecast = vec![1.0, 2.0];
        assert_eq!(integrate(&forecast, &[5.0, 6.0], 0), forecast);
        assert_eq!(seasonal_integrate(&forecast, &[5.0, 6.0], 0, 2), forecast);
    }
}
