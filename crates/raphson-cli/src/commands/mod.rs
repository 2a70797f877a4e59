//! CLI command implementations.

pub mod config;
pub mod derive;
pub mod eval;
pub mod plot;
pub mod solve;

// Re-export submodules for convenience
pub use config::ConfigArgs;
pub use derive::DeriveArgs;
pub use eval::EvalArgs;
pub use plot::PlotArgs;
pub use solve::SolveArgs;

use std::path::PathBuf;

use clap::Args;
use raphson_math::expr::Function;
use raphson_math::solvers::SolverConfig;

use crate::cli::OutputFormat;
use crate::error::CliResult;
use crate::settings::Settings;

/// State shared by every command.
#[derive(Debug)]
pub struct Context {
    /// Effective output format.
    pub format: OutputFormat,
    /// Suppress decorative output.
    pub quiet: bool,
    /// Loaded settings.
    pub settings: Settings,
    /// Where the settings live.
    pub config_path: PathBuf,
}

impl Context {
    /// Whether headers and status lines should be printed.
    pub fn decorate(&self) -> bool {
        self.format == OutputFormat::Table && !self.quiet
    }
}

/// Solver options shared by `solve` and `plot`.
#[derive(Args, Debug, Clone)]
pub struct SolverOptions {
    /// Initial guess x0
    #[arg(long, allow_negative_numbers = true)]
    pub x0: f64,

    /// Convergence tolerance on |x_n+1 - x_n| (default from config)
    #[arg(short, long)]
    pub tolerance: Option<f64>,

    /// Maximum iterations (default from config)
    #[arg(short, long)]
    pub max_iterations: Option<u32>,

    /// Derivatives smaller than this stop the solver (default from config)
    #[arg(long)]
    pub derivative_epsilon: Option<f64>,

    /// Use this derivative instead of differentiating symbolically
    #[arg(short, long, allow_hyphen_values = true, conflicts_with = "numerical")]
    pub derivative: Option<String>,

    /// Estimate the derivative with central finite differences
    #[arg(long)]
    pub numerical: bool,
}

impl SolverOptions {
    /// Solver configuration: flags override settings.
    pub fn solver_config(&self, settings: &Settings) -> SolverConfig {
        let mut config = settings.solver_config();
        if let Some(tolerance) = self.tolerance {
            config = config.with_tolerance(tolerance);
        }
        if let Some(max_iterations) = self.max_iterations {
            config = config.with_max_iterations(max_iterations);
        }
        if let Some(epsilon) = self.derivative_epsilon {
            config = config.with_derivative_epsilon(epsilon);
        }
        config
    }

    /// Parses the function together with the derivative to use.
    pub fn function(&self, expression: &str) -> CliResult<Function> {
        let function = match &self.derivative {
            Some(derivative) => Function::with_derivative(expression, derivative)?,
            None => Function::parse(expression)?,
        };
        Ok(function)
    }
}
