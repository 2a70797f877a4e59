//! CLI error types.

use raphson_math::expr::ExprError;
use raphson_math::solvers::SolveStatus;
use raphson_math::MathError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The expression could not be parsed or evaluated.
    #[error(transparent)]
    Expression(#[from] ExprError),

    /// Invalid solver or sampling input.
    #[error(transparent)]
    Math(#[from] MathError),

    /// The solver stopped without converging.
    #[error("Newton-Raphson {status} after {iterations} iterations")]
    NotConverged {
        /// Terminal status.
        status: SolveStatus,
        /// Iterations performed.
        iterations: u32,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_converged_message_names_status() {
        let err = CliError::NotConverged {
            status: SolveStatus::DerivativeZero,
            iterations: 1,
        };
        assert_eq!(
            err.to_string(),
            "Newton-Raphson stopped: derivative is zero after 1 iterations"
        );
    }

    #[test]
    fn test_expression_error_passes_through() {
        let err = CliError::from(ExprError::Parse {
            position: 3,
            message: "unexpected ')'".to_string(),
        });
        assert_eq!(err.to_string(), "Parse error at position 3: unexpected ')'");
    }
}
