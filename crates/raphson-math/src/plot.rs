//! Data series for charting a solve.
//!
//! Two charts describe a run: the function over an interval with the root
//! marked, and the step size per iteration on a logarithmic axis. This module
//! only prepares the points; drawing is left to the caller.

use crate::error::{MathError, MathResult};
use crate::solvers::SolveResult;

/// Default number of samples for a function curve.
pub const DEFAULT_SAMPLES: usize = 1000;

/// `n` evenly spaced points from `min` to `max`, both inclusive.
///
/// # Example
///
/// ```rust
/// use raphson_math::plot::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// ```
pub fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { max } else { min + step * i as f64 })
                .collect()
        }
    }
}

/// Samples `f` on `[x_min, x_max]`, skipping points where it is not finite.
///
/// # Errors
///
/// Returns [`MathError::InvalidRange`] unless both bounds are finite and
/// `x_min < x_max`, and [`MathError::InvalidInput`] for fewer than two samples.
pub fn function_series<F>(f: F, x_min: f64, x_max: f64, samples: usize) -> MathResult<Vec<(f64, f64)>>
where
    F: Fn(f64) -> f64,
{
    if !x_min.is_finite() || !x_max.is_finite() || x_min >= x_max {
        return Err(MathError::InvalidRange {
            min: x_min,
            max: x_max,
        });
    }
    if samples < 2 {
        return Err(MathError::invalid_input(format!(
            "at least 2 samples are required, got {samples}"
        )));
    }

    Ok(linspace(x_min, x_max, samples)
        .into_iter()
        .map(|x| (x, f(x)))
        .filter(|(_, y)| y.is_finite())
        .collect())
}

/// `(iteration, error)` pairs with a strictly positive error.
///
/// Zero steps cannot be drawn on a logarithmic axis and are left out.
pub fn error_series(result: &SolveResult) -> Vec<(u32, f64)> {
    result
        .records
        .iter()
        .filter(|record| record.error > 0.0)
        .map(|record| (record.index, record.error))
        .collect()
}

/// Everything needed to draw both charts.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    /// Sampled `(x, f(x))` points.
    pub function: Vec<(f64, f64)>,
    /// `(iteration, error)` points for a log-scale chart.
    pub errors: Vec<(u32, f64)>,
    /// Root marker `(root, 0)`, present only for a converged run.
    pub root: Option<(f64, f64)>,
}

impl PlotData {
    /// Builds both series for `result`.
    pub fn new<F>(
        f: F,
        result: &SolveResult,
        x_min: f64,
        x_max: f64,
        samples: usize,
    ) -> MathResult<Self>
    where
        F: Fn(f64) -> f64,
    {
        Ok(Self {
            function: function_series(f, x_min, x_max, samples)?,
            errors: error_series(result),
            root: result.converged().then_some((result.root, 0.0)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::{newton_raphson, SolverConfig};
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints() {
        let points = linspace(-2.0, 3.0, 1000);
        assert_eq!(points.len(), 1000);
        assert_eq!(points[0], -2.0);
        assert_eq!(points[999], 3.0);
        assert_relative_eq!(points[1] - points[0], 5.0 / 999.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linspace_degenerate() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
    }

    #[test]
    fn test_function_series_skips_non_finite() {
        let series = function_series(|x| 1.0 / x, -1.0, 1.0, 3).unwrap();
        assert_eq!(series, vec![(-1.0, -1.0), (1.0, 1.0)]);
    }

    #[test]
    fn test_function_series_rejects_bad_range() {
        assert!(matches!(
            function_series(|x| x, 1.0, 1.0, 10),
            Err(MathError::InvalidRange { .. })
        ));
        assert!(function_series(|x| x, 2.0, 1.0, 10).is_err());
        assert!(function_series(|x| x, f64::NEG_INFINITY, 1.0, 10).is_err());
        assert!(function_series(|x| x, 0.0, 1.0, 1).is_err());
    }

    #[test]
    fn test_plot_data_for_converged_run() {
        let f = |x: f64| x * x - 4.0;
        let result = newton_raphson(f, |x| 2.0 * x, 3.0, &SolverConfig::default()).unwrap();

        let data = PlotData::new(f, &result, 0.0, 4.0, DEFAULT_SAMPLES).unwrap();

        assert_eq!(data.function.len(), DEFAULT_SAMPLES);
        assert_eq!(data.errors.len(), result.records.len());
        assert_eq!(data.errors[0].0, 1);
        let (root_x, root_y) = data.root.unwrap();
        assert_relative_eq!(root_x, 2.0, epsilon = 1e-9);
        assert_eq!(root_y, 0.0);
    }

    #[test]
    fn test_plot_data_omits_zero_errors_and_unconverged_root() {
        let linear = newton_raphson(|x| x, |_| 1.0, 5.0, &SolverConfig::default()).unwrap();
        assert_eq!(error_series(&linear), vec![(1, 5.0)]);

        let f = |x: f64| x * x + 1.0;
        let stuck = newton_raphson(f, |x| 2.0 * x, 0.5, &SolverConfig::new(1e-6, 10)).unwrap();
        let data = PlotData::new(f, &stuck, -2.0, 2.0, 50).unwrap();
        assert!(data.root.is_none());
        assert_eq!(data.errors.len(), 10);
    }
}
