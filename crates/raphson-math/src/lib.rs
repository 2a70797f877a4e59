//! # Raphson Math
//!
//! Numerical core of the Raphson root-finding tool.
//!
//! This crate provides:
//!
//! - **Solvers**: Newton-Raphson iteration with a full per-iteration trace
//! - **Expressions**: Parsing, evaluation and symbolic differentiation of
//!   single-variable functions of `x`
//! - **Plot**: Data series for charting a function and the solver's convergence
//!
//! ## Design Philosophy
//!
//! - **Pure Core**: The solver takes any `Fn(f64) -> f64` and has no I/O
//! - **Explicit Outcomes**: Every run ends in a distinguishable terminal status
//! - **Traceable**: Each iteration is recorded for tables and charts
//!
//! ## Example
//!
//! ```rust
//! use raphson_math::prelude::*;
//!
//! let function = Function::parse("x^2 - 4").unwrap();
//! let result = newton_raphson(
//!     |x| function.value(x),
//!     |x| function.slope(x),
//!     3.0,
//!     &SolverConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(result.status, SolveStatus::Converged);
//! assert!((result.root - 2.0).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod expr;
pub mod plot;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::expr::{differentiate, evaluate, parse, Expr, ExprError, Function};
    pub use crate::plot::{error_series, function_series, linspace, PlotData};
    pub use crate::solvers::{
        newton_raphson, newton_raphson_numerical, IterationRecord, NewtonSolver, SolveResult,
        SolveStatus, Solver, SolverConfig,
    };
}

pub use error::{MathError, MathResult};
