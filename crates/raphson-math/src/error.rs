//! Error types for mathematical operations.

use thiserror::Error;

use crate::expr::ExprError;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur before or outside of an iteration run.
///
/// Solver outcomes such as a vanishing derivative or an exhausted iteration
/// budget are not errors; they are reported through
/// [`SolveStatus`](crate::solvers::SolveStatus).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Invalid sampling range for a plot series.
    #[error("Invalid range: [{min}, {max}] must be finite with min < max")]
    InvalidRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Expression could not be parsed or evaluated.
    #[error(transparent)]
    Expression(#[from] ExprError),
}

impl MathError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::invalid_input("tolerance must be positive");
        assert_eq!(err.to_string(), "Invalid input: tolerance must be positive");

        let err = MathError::InvalidRange { min: 2.0, max: 1.0 };
        assert!(err.to_string().contains("[2, 1]"));
    }

    #[test]
    fn test_expression_error_is_transparent() {
        let inner = ExprError::Evaluation {
            x: 0.0,
            reason: "division by zero".to_string(),
        };
        let err = MathError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }
}
