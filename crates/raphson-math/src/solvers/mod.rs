//! Root-finding with a recorded iteration trace.
//!
//! This module provides the Newton-Raphson solver and the types that describe
//! a run:
//!
//! - [`newton_raphson`]: Quadratic convergence when the derivative is available
//! - [`newton_raphson_numerical`]: Same iteration with a finite-difference derivative
//! - [`SolveResult`]: Terminal status, root estimate and every [`IterationRecord`]
//!
//! # Stopping Rules
//!
//! | Status | Trigger |
//! |--------|---------|
//! | Converged | `|x_{n+1} - x_n| <= tolerance` |
//! | DerivativeZero | `|f'(x_n)| < derivative_epsilon` |
//! | NumericInstability | `f(x_n)`, `f'(x_n)` or `x_{n+1}` is NaN or infinite |
//! | DivergedOrMaxIterationsReached | `max_iterations` passes without the above |
//!
//! # Example
//!
//! ```rust
//! use raphson_math::solvers::{newton_raphson, SolveStatus, SolverConfig};
//!
//! let f = |x: f64| x * x - 4.0;
//! let df = |x: f64| 2.0 * x;
//!
//! let result = newton_raphson(f, df, 3.0, &SolverConfig::default()).unwrap();
//! assert_eq!(result.status, SolveStatus::Converged);
//! assert_eq!(result.records.len(), 5);
//! ```

mod newton;

pub use newton::{newton_raphson, newton_raphson_numerical};

use std::fmt;

use crate::error::{MathError, MathResult};

/// Default tolerance on the step size between successive iterates.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default maximum iterations.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Default magnitude below which a derivative is treated as zero.
pub const DEFAULT_DERIVATIVE_EPSILON: f64 = 1e-10;

/// Configuration for the Newton-Raphson solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Maximum accepted step `|x_{n+1} - x_n|` for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
    /// Derivatives with a smaller magnitude stop the run.
    pub derivative_epsilon: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            derivative_epsilon: DEFAULT_DERIVATIVE_EPSILON,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration with the default derivative guard.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
            derivative_epsilon: DEFAULT_DERIVATIVE_EPSILON,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the zero-derivative threshold.
    #[must_use]
    pub fn with_derivative_epsilon(mut self, derivative_epsilon: f64) -> Self {
        self.derivative_epsilon = derivative_epsilon;
        self
    }

    /// Checks that the configuration describes a runnable solve.
    pub fn validate(&self) -> MathResult<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(MathError::invalid_input(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(MathError::invalid_input(
                "max_iterations must be at least 1",
            ));
        }
        if !self.derivative_epsilon.is_finite() || self.derivative_epsilon < 0.0 {
            return Err(MathError::invalid_input(format!(
                "derivative_epsilon must be non-negative and finite, got {}",
                self.derivative_epsilon
            )));
        }
        Ok(())
    }
}

/// One pass of the Newton-Raphson loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord {
    /// 1-based iteration number.
    pub index: u32,
    /// Iterate `x_n` at which the function was evaluated.
    pub x: f64,
    /// `f(x_n)`.
    pub fx: f64,
    /// Step size `|x_{n+1} - x_n|` produced by this iteration.
    pub error: f64,
}

/// How a solve terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// The step size fell within tolerance.
    Converged,
    /// The iteration budget ran out before the tolerance was met.
    DivergedOrMaxIterationsReached,
    /// The derivative vanished, so the Newton update is undefined.
    DerivativeZero,
    /// A function value, derivative or iterate became NaN or infinite.
    NumericInstability,
}

impl SolveStatus {
    /// Returns true only for [`SolveStatus::Converged`].
    pub fn is_converged(self) -> bool {
        matches!(self, Self::Converged)
    }

    /// Short machine-friendly name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Converged => "converged",
            Self::DivergedOrMaxIterationsReached => "max-iterations",
            Self::DerivativeZero => "derivative-zero",
            Self::NumericInstability => "numeric-instability",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Converged => "converged",
            Self::DivergedOrMaxIterationsReached => {
                "did not converge (maximum iterations reached)"
            }
            Self::DerivativeZero => "stopped: derivative is zero",
            Self::NumericInstability => "stopped: non-finite value encountered",
        };
        f.write_str(text)
    }
}

/// Outcome of a single solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    /// Terminal status.
    pub status: SolveStatus,
    /// Final iterate. Only a root estimate when the run converged.
    pub root: f64,
    /// `f(root)`.
    pub residual: f64,
    /// Loop passes performed, including one that stopped before recording.
    pub iterations: u32,
    /// Recorded iterations in order.
    pub records: Vec<IterationRecord>,
}

impl SolveResult {
    /// Returns true if the solver converged.
    pub fn converged(&self) -> bool {
        self.status.is_converged()
    }

    /// Step size of the last recorded iteration.
    pub fn last_error(&self) -> Option<f64> {
        self.records.last().map(|record| record.error)
    }
}

/// Trait for root-finding solvers with optional derivative.
///
/// # Example
///
/// ```rust
/// use raphson_math::solvers::{NewtonSolver, Solver, SolverConfig};
///
/// let solver = NewtonSolver;
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = solver.solve(f, Some(df), 1.5, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-6);
/// ```
pub trait Solver: Send + Sync {
    /// Solves for a root of `f` starting at `initial_guess`.
    fn solve<F, D>(
        &self,
        f: F,
        derivative: Option<D>,
        initial_guess: f64,
        config: &SolverConfig,
    ) -> MathResult<SolveResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64;

    /// Returns the name of the solver.
    fn name(&self) -> &'static str;
}

/// Newton-Raphson solver implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonSolver;

impl Solver for NewtonSolver {
    fn solve<F, D>(
        &self,
        f: F,
        derivative: Option<D>,
        initial_guess: f64,
        config: &SolverConfig,
    ) -> MathResult<SolveResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        match derivative {
            Some(df) => newton_raphson(f, df, initial_guess, config),
            None => newton_raphson_numerical(f, initial_guess, config),
        }
    }

    fn name(&self) -> &'static str {
        "Newton-Raphson"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solver_config() {
        let config = SolverConfig::default()
            .with_tolerance(1e-8)
            .with_max_iterations(50)
            .with_derivative_epsilon(1e-12);

        assert!((config.tolerance - 1e-8).abs() < f64::EPSILON);
        assert_eq!(config.max_iterations, 50);
        assert!((config.derivative_epsilon - 1e-12).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_matches_constants() {
        let config = SolverConfig::default();
        assert_eq!(config, SolverConfig::new(DEFAULT_TOLERANCE, DEFAULT_MAX_ITERATIONS));
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(SolverConfig::new(0.0, 10).validate().is_err());
        assert!(SolverConfig::new(-1e-6, 10).validate().is_err());
        assert!(SolverConfig::new(f64::NAN, 10).validate().is_err());
        assert!(SolverConfig::new(1e-6, 0).validate().is_err());
        assert!(SolverConfig::default()
            .with_derivative_epsilon(-1.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_status_text_is_distinct() {
        let statuses = [
            SolveStatus::Converged,
            SolveStatus::DivergedOrMaxIterationsReached,
            SolveStatus::DerivativeZero,
            SolveStatus::NumericInstability,
        ];
        for (i, a) in statuses.iter().enumerate() {
            for b in &statuses[i + 1..] {
                assert_ne!(a.to_string(), b.to_string());
                assert_ne!(a.as_str(), b.as_str());
            }
        }
        assert!(statuses[0].is_converged());
        assert!(statuses[1..].iter().all(|s| !s.is_converged()));
    }

    #[test]
    fn test_solver_trait_newton() {
        let solver = NewtonSolver;
        let f = |x: f64| x * x - 2.0;
        let df = |x: f64| 2.0 * x;

        let result = solver
            .solve(f, Some(df), 1.5, &SolverConfig::default())
            .unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
        assert_eq!(solver.name(), "Newton-Raphson");
    }

    #[test]
    fn test_solver_trait_without_derivative() {
        let solver = NewtonSolver;
        let f = |x: f64| x * x * x - 27.0;
        let no_deriv: Option<fn(f64) -> f64> = None;

        let result = solver
            .solve(f, no_deriv, 2.0, &SolverConfig::default())
            .unwrap();

        assert!(result.converged());
        assert_relative_eq!(result.root, 3.0, epsilon = 1e-8);
    }

    #[test]
    fn test_last_error() {
        let result = newton_raphson(|x| x * x - 4.0, |x| 2.0 * x, 3.0, &SolverConfig::default())
            .unwrap();
        assert_eq!(result.last_error(), result.records.last().map(|r| r.error));

        let stalled = newton_raphson(|x| x * x, |x| 2.0 * x, 0.0, &SolverConfig::default())
            .unwrap();
        assert_eq!(stalled.last_error(), None);
    }
}
