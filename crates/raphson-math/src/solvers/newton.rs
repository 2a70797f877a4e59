//! Newton-Raphson root-finding algorithm.

use log::{debug, warn};

use crate::error::{MathError, MathResult};
use crate::solvers::{IterationRecord, SolveResult, SolveStatus, SolverConfig};

/// Relative step size for the central-difference derivative.
const NUMERICAL_STEP: f64 = 1e-8;

/// Newton-Raphson root-finding algorithm.
///
/// Uses the iteration:
/// `x_{n+1} = x_n - f(x_n) / f'(x_n)`
///
/// Every completed pass is recorded as an [`IterationRecord`] whose `error`
/// is the step `|x_{n+1} - x_n|`. The run converges as soon as that step is
/// at most `config.tolerance`; the residual `|f(x)|` is reported but never
/// used to decide convergence.
///
/// A derivative below `config.derivative_epsilon` stops the run with
/// [`SolveStatus::DerivativeZero`] without recording the pass. NaN or
/// infinite values stop it with [`SolveStatus::NumericInstability`].
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `df` - The derivative of the function
/// * `initial_guess` - Starting point for the iteration
/// * `config` - Solver configuration
///
/// # Errors
///
/// Returns [`MathError::InvalidInput`] for an invalid `config` or a
/// non-finite `initial_guess`. All iteration outcomes are `Ok`.
///
/// # Example
///
/// ```rust
/// use raphson_math::solvers::{newton_raphson, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = newton_raphson(f, df, 1.5, &SolverConfig::default()).unwrap();
/// assert!(result.converged());
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolveResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    config.validate()?;
    if !initial_guess.is_finite() {
        return Err(MathError::invalid_input(format!(
            "initial guess must be finite, got {initial_guess}"
        )));
    }

    let mut x = initial_guess;
    let mut iterations = 0;
    let mut records = Vec::new();

    let status = loop {
        if iterations == config.max_iterations {
            warn!(
                "no convergence after {} iterations (last step {:?})",
                iterations,
                records.last().map(|r: &IterationRecord| r.error)
            );
            break SolveStatus::DivergedOrMaxIterationsReached;
        }
        iterations += 1;

        let fx = f(x);
        let dfx = df(x);

        if !fx.is_finite() || !dfx.is_finite() {
            warn!("non-finite evaluation at x = {x}: f = {fx}, f' = {dfx}");
            break SolveStatus::NumericInstability;
        }

        if dfx == 0.0 || dfx.abs() < config.derivative_epsilon {
            warn!("derivative {dfx:.3e} is zero at x = {x} (iteration {iterations})");
            break SolveStatus::DerivativeZero;
        }

        let next = x - fx / dfx;
        if !next.is_finite() {
            warn!("Newton step from x = {x} produced {next}");
            break SolveStatus::NumericInstability;
        }

        let error = (next - x).abs();
        records.push(IterationRecord {
            index: iterations,
            x,
            fx,
            error,
        });
        debug!("iteration {iterations}: x = {x}, f(x) = {fx:e}, error = {error:e}");

        x = next;

        if error <= config.tolerance {
            break SolveStatus::Converged;
        }
    };

    let residual = f(x);
    debug!("finished with {status:?} after {iterations} iterations at x = {x}");

    Ok(SolveResult {
        status,
        root: x,
        residual,
        iterations,
        records,
    })
}

/// Newton-Raphson with numerical derivative estimation.
///
/// Uses central finite differences to estimate the derivative when
/// an analytical derivative is not available. The step scales with `|x|`
/// (never below `1e-8`) so that `x ± h` stays distinct from `x`.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `initial_guess` - Starting point for the iteration
/// * `config` - Solver configuration
pub fn newton_raphson_numerical<F>(
    f: F,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolveResult>
where
    F: Fn(f64) -> f64,
{
    let df = |x: f64| {
        let h = NUMERICAL_STEP * x.abs().max(1.0);
        let (hi, lo) = (x + h, x - h);
        (f(hi) - f(lo)) / (hi - lo)
    };

    newton_raphson(&f, df, initial_guess, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_documented_trace() {
        // x^2 - 4 from x0 = 3
        let f = |x: f64| x * x - 4.0;
        let df = |x: f64| 2.0 * x;

        let result = newton_raphson(f, df, 3.0, &SolverConfig::default()).unwrap();

        assert_eq!(result.status, SolveStatus::Converged);
        assert_eq!(result.records.len(), 5);
        assert_eq!(result.iterations, 5);

        let first = result.records[0];
        assert_eq!(first.index, 1);
        assert_relative_eq!(first.x, 3.0);
        assert_relative_eq!(first.fx, 5.0);
        assert_relative_eq!(first.error, 5.0 / 6.0, epsilon = 1e-12);

        let second = result.records[1];
        assert_relative_eq!(second.x, 13.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(second.error, 0.160_256_410_256, epsilon = 1e-9);

        let last = result.records[4];
        assert_eq!(last.index, 5);
        assert_relative_eq!(last.x, 2.0, epsilon = 1e-9);
        assert!(last.error < 1e-9);

        assert_relative_eq!(result.root, 2.0, epsilon = 1e-12);
        assert!(result.residual.abs() < 1e-12);
    }

    #[test]
    fn test_linear_function_lands_on_root() {
        // The first step lands exactly on 0; the second confirms with a zero step.
        let result =
            newton_raphson(|x: f64| x, |_| 1.0, 5.0, &SolverConfig::default()).unwrap();

        assert_eq!(result.status, SolveStatus::Converged);
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].error, 5.0);
        assert_eq!(result.records[1].x, 0.0);
        assert_eq!(result.records[1].error, 0.0);
        assert_eq!(result.root, 0.0);
        assert_eq!(result.residual, 0.0);
    }

    #[test]
    fn test_start_on_root_converges_immediately() {
        let result =
            newton_raphson(|x: f64| x - 1.0, |_| 1.0, 1.0, &SolverConfig::default()).unwrap();

        assert_eq!(result.status, SolveStatus::Converged);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].error, 0.0);
    }

    #[test]
    fn test_zero_derivative_stops_without_record() {
        let f = |x: f64| x * x;
        let df = |x: f64| 2.0 * x;

        let result = newton_raphson(f, df, 0.0, &SolverConfig::default()).unwrap();

        assert_eq!(result.status, SolveStatus::DerivativeZero);
        assert_eq!(result.iterations, 1);
        assert!(result.records.is_empty());
        assert_eq!(result.root, 0.0);
    }

    #[test]
    fn test_zero_derivative_after_progress_keeps_partial_trace() {
        let f = |x: f64| x * x - 4.0;
        let df = |x: f64| if x < 2.5 { 0.0 } else { 2.0 * x };

        let result = newton_raphson(f, df, 3.0, &SolverConfig::default()).unwrap();

        assert_eq!(result.status, SolveStatus::DerivativeZero);
        assert_eq!(result.iterations, 2);
        assert_eq!(result.records.len(), 1);
        assert_relative_eq!(result.root, 13.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(result.residual, f(13.0 / 6.0), epsilon = 1e-12);
    }

    #[test]
    fn test_near_zero_derivative_uses_epsilon() {
        let f = |x: f64| x - 1.0;
        let df = |_: f64| 1e-11;

        let result = newton_raphson(f, df, 0.0, &SolverConfig::default()).unwrap();
        assert_eq!(result.status, SolveStatus::DerivativeZero);

        let loose = SolverConfig::default().with_derivative_epsilon(1e-12);
        let result = newton_raphson(f, df, 0.0, &loose).unwrap();
        assert_ne!(result.status, SolveStatus::DerivativeZero);
    }

    #[test]
    fn test_no_real_root_exhausts_budget() {
        let f = |x: f64| x * x + 1.0;
        let df = |x: f64| 2.0 * x;
        let config = SolverConfig::new(1e-6, 25);

        let result = newton_raphson(f, df, 0.5, &config).unwrap();

        assert_eq!(result.status, SolveStatus::DivergedOrMaxIterationsReached);
        assert_eq!(result.records.len(), 25);
        assert_eq!(result.iterations, 25);
        assert!(!result.converged());
    }

    #[test]
    fn test_non_finite_function_value() {
        let f = |x: f64| 1.0 / x - 1.0;
        let df = |x: f64| -1.0 / (x * x);

        let result = newton_raphson(f, df, 0.0, &SolverConfig::default()).unwrap();

        assert_eq!(result.status, SolveStatus::NumericInstability);
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_nan_derivative() {
        let f = |x: f64| x - 4.0;
        let df = |x: f64| if x > 10.0 { f64::NAN } else { -1e-3 };

        // The first step jumps to x = 1005, where df is NaN.
        let result = newton_raphson(f, df, 5.0, &SolverConfig::default()).unwrap();

        assert_eq!(result.status, SolveStatus::NumericInstability);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.iterations, 2);
    }

    #[test]
    fn test_overflowing_step() {
        let f = |_: f64| f64::MAX;
        let df = |_: f64| 1e-5;

        let result = newton_raphson(f, df, 0.0, &SolverConfig::default()).unwrap();

        assert_eq!(result.status, SolveStatus::NumericInstability);
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_invalid_inputs_are_errors() {
        let f = |x: f64| x;
        let df = |_: f64| 1.0;

        assert!(newton_raphson(f, df, f64::NAN, &SolverConfig::default()).is_err());
        assert!(newton_raphson(f, df, f64::INFINITY, &SolverConfig::default()).is_err());
        assert!(newton_raphson(f, df, 1.0, &SolverConfig::new(0.0, 10)).is_err());
        assert!(newton_raphson(f, df, 1.0, &SolverConfig::new(1e-6, 0)).is_err());
    }

    #[test]
    fn test_repeat_solves_are_identical() {
        let f = |x: f64| x.cos() - x;
        let df = |x: f64| -x.sin() - 1.0;
        let config = SolverConfig::default();

        let a = newton_raphson(f, df, 1.0, &config).unwrap();
        let b = newton_raphson(f, df, 1.0, &config).unwrap();

        assert_eq!(a.root.to_bits(), b.root.to_bits());
        assert_eq!(a.records.len(), b.records.len());
        for (ra, rb) in a.records.iter().zip(&b.records) {
            assert_eq!(ra.x.to_bits(), rb.x.to_bits());
            assert_eq!(ra.fx.to_bits(), rb.fx.to_bits());
            assert_eq!(ra.error.to_bits(), rb.error.to_bits());
        }
    }

    #[test]
    fn test_errors_match_successive_iterates() {
        let f = |x: f64| x.exp() - 2.0;
        let df = |x: f64| x.exp();

        let result = newton_raphson(f, df, 3.0, &SolverConfig::default()).unwrap();
        assert!(result.converged());

        for pair in result.records.windows(2) {
            assert_eq!(pair[0].error, (pair[1].x - pair[0].x).abs());
        }
        let last = result.records.last().unwrap();
        assert_eq!(last.error, (result.root - last.x).abs());
        assert!(last.error <= 1e-6);
        assert_relative_eq!(result.root, 2.0_f64.ln(), epsilon = 1e-10);
    }

    #[test]
    fn test_cube_root() {
        // Find cube root of 27 (should be 3)
        let f = |x: f64| x * x * x - 27.0;
        let df = |x: f64| 3.0 * x * x;

        let result = newton_raphson(f, df, 2.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_numerical_derivative() {
        let f = |x: f64| x * x - 2.0;

        let result = newton_raphson_numerical(f, 1.5, &SolverConfig::default()).unwrap();

        assert!(result.converged());
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-8);
    }

    #[test]
    fn test_numerical_derivative_flat_function() {
        let result =
            newton_raphson_numerical(|_| 3.0, 0.0, &SolverConfig::default()).unwrap();
        assert_eq!(result.status, SolveStatus::DerivativeZero);
    }

    #[test]
    fn test_numerical_derivative_far_from_origin() {
        let target = 1.0e9;
        let result =
            newton_raphson_numerical(|x| x - target, target + 5.0, &SolverConfig::default())
                .unwrap();

        assert_eq!(result.status, SolveStatus::Converged);
        assert_eq!(result.records[0].error, 5.0);
        assert_relative_eq!(result.root, target);
    }

    #[test]
    fn test_numerical_derivative_large_quadratic_root() {
        // Root at 3e8; a fixed absolute step would collapse to a zero slope here.
        let f = |x: f64| x * x - 9.0e16;
        let result = newton_raphson_numerical(f, 3.1e8, &SolverConfig::default()).unwrap();

        assert!(result.converged());
        assert_relative_eq!(result.root, 3.0e8, max_relative = 1e-12);
    }
}
