//! Solve command implementation.
//!
//! Runs Newton-Raphson on an expression and reports the derivative used,
//! every iteration and the final verdict.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use raphson_math::expr::Function;
use raphson_math::solvers::{
    newton_raphson, newton_raphson_numerical, SolveResult, SolverConfig,
};

use crate::cli::OutputFormat;
use crate::commands::{Context, SolverOptions};
use crate::error::{CliError, CliResult};
use crate::output::{
    format_fixed, print_divider, print_header, print_info, print_json_value, print_output,
    print_success, print_table, print_warning, KeyValue,
};

/// Decimal places for the root and residual summary.
const SUMMARY_PRECISION: usize = 10;

/// Arguments for the solve command.
#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Function of x, e.g. "x^2 - 4", "sin(x) + x**2", "exp(x) - 2"
    #[arg(allow_hyphen_values = true)]
    pub expression: String,

    #[command(flatten)]
    pub solver: SolverOptions,
}

/// One iteration, formatted for the table.
#[derive(Debug, Tabled)]
struct IterationRow {
    #[tabled(rename = "Iteration")]
    iteration: u32,
    #[tabled(rename = "x_i")]
    x: String,
    #[tabled(rename = "f(x_i)")]
    fx: String,
    #[tabled(rename = "Error")]
    error: String,
}

/// One iteration as raw numbers for JSON and CSV.
#[derive(Debug, Serialize, Tabled)]
pub struct IterationOutput {
    pub iteration: u32,
    pub x: f64,
    pub fx: f64,
    pub error: f64,
}

/// Full machine-readable report.
#[derive(Debug, Serialize)]
struct SolveReport<'a> {
    expression: &'a str,
    derivative: String,
    status: &'static str,
    converged: bool,
    iterations: u32,
    root: f64,
    residual: f64,
    tolerance: f64,
    max_iterations: u32,
    records: Vec<IterationOutput>,
}

/// Human-readable derivative label.
pub fn derivative_label(function: &Function, options: &SolverOptions) -> String {
    if options.numerical {
        "central finite difference".to_string()
    } else {
        function.derivative().to_string()
    }
}

/// Runs the solver with the derivative selected by `options`.
pub fn run(
    function: &Function,
    options: &SolverOptions,
    config: &SolverConfig,
) -> CliResult<SolveResult> {
    let f = |x: f64| function.value(x);
    let result = if options.numerical {
        newton_raphson_numerical(f, options.x0, config)?
    } else {
        newton_raphson(f, |x: f64| function.slope(x), options.x0, config)?
    };
    Ok(result)
}

/// Raw iteration rows.
pub fn iteration_outputs(result: &SolveResult) -> Vec<IterationOutput> {
    result
        .records
        .iter()
        .map(|r| IterationOutput {
            iteration: r.index,
            x: r.x,
            fx: r.fx,
            error: r.error,
        })
        .collect()
}

/// Execute the solve command.
pub fn execute(args: SolveArgs, ctx: &Context) -> Result<()> {
    let function = args.solver.function(&args.expression)?;
    let config = args.solver.solver_config(&ctx.settings);
    let derivative = derivative_label(&function, &args.solver);

    info!(
        "solving f(x) = {} from x0 = {} (tolerance {}, max {} iterations)",
        function.source(),
        args.solver.x0,
        config.tolerance,
        config.max_iterations
    );

    let result = run(&function, &args.solver, &config)?;
    info!(
        "{:?} after {} iterations at x = {}",
        result.status, result.iterations, result.root
    );

    match ctx.format {
        OutputFormat::Table => render_table(&function, &derivative, &result, ctx)?,
        OutputFormat::Json => {
            let report = SolveReport {
                expression: function.source(),
                derivative,
                status: result.status.as_str(),
                converged: result.converged(),
                iterations: result.iterations,
                root: result.root,
                residual: result.residual,
                tolerance: config.tolerance,
                max_iterations: config.max_iterations,
                records: iteration_outputs(&result),
            };
            print_json_value(&report)?;
        }
        OutputFormat::Csv => print_output(&iteration_outputs(&result), OutputFormat::Csv)?,
        OutputFormat::Minimal => {
            if result.converged() {
                println!("{}", format_fixed(result.root, SUMMARY_PRECISION));
            }
        }
    }

    if !result.converged() {
        return Err(CliError::NotConverged {
            status: result.status,
            iterations: result.iterations,
        }
        .into());
    }

    Ok(())
}

fn render_table(
    function: &Function,
    derivative: &str,
    result: &SolveResult,
    ctx: &Context,
) -> Result<()> {
    let precision = ctx.settings.precision;

    if ctx.decorate() {
        print_header("Newton-Raphson");
        print_info(&format!("f(x)  = {}", function.source()));
        print_info(&format!("f'(x) = {}", derivative));
        print_header("Iterations");
    }

    let rows: Vec<IterationRow> = result
        .records
        .iter()
        .map(|r| IterationRow {
            iteration: r.index,
            x: format_fixed(r.x, precision),
            fx: format_fixed(r.fx, precision),
            error: format_fixed(r.error, precision),
        })
        .collect();
    print_table(&rows)?;

    if ctx.decorate() {
        print_divider();
    }
    let summary = vec![
        KeyValue::new("Status", result.status.to_string()),
        KeyValue::new("Iterations", result.iterations.to_string()),
        KeyValue::from_f64("Root", result.root, SUMMARY_PRECISION),
        KeyValue::from_f64("f(root)", result.residual, SUMMARY_PRECISION),
    ];
    print_output(&summary, OutputFormat::Table)?;

    if ctx.decorate() {
        if result.converged() {
            print_success(&format!("Converged in {} iterations", result.iterations));
        } else {
            print_warning(&format!("The method {}", result.status));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use raphson_math::solvers::SolveStatus;

    fn options(x0: f64) -> SolverOptions {
        SolverOptions {
            x0,
            tolerance: None,
            max_iterations: None,
            derivative_epsilon: None,
            derivative: None,
            numerical: false,
        }
    }

    #[test]
    fn test_run_symbolic() {
        let opts = options(3.0);
        let function = opts.function("x^2 - 4").unwrap();
        let result = run(&function, &opts, &SolverConfig::default()).unwrap();

        assert_eq!(result.status, SolveStatus::Converged);
        assert_eq!(result.records.len(), 5);
        assert!((result.root - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_run_numerical_matches_symbolic() {
        let mut opts = options(1.0);
        let function = opts.function("x^3 - 2*x - 5").unwrap();
        let symbolic = run(&function, &opts, &SolverConfig::default()).unwrap();

        opts.numerical = true;
        let numerical = run(&function, &opts, &SolverConfig::default()).unwrap();

        assert!(numerical.converged());
        assert!((numerical.root - symbolic.root).abs() < 1e-9);
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let opts = options(1.0);
        let function = opts.function("x - 1").unwrap();
        let config = SolverConfig::default().with_tolerance(-1.0);
        assert!(matches!(
            run(&function, &opts, &config),
            Err(CliError::Math(_))
        ));
    }

    #[test]
    fn test_derivative_label() {
        let mut opts = options(1.0);
        let function = opts.function("x^3").unwrap();
        assert_eq!(derivative_label(&function, &opts), "3*x^2");

        opts.numerical = true;
        assert_eq!(derivative_label(&function, &opts), "central finite difference");
    }

    #[test]
    fn test_iteration_outputs_follow_records() {
        let opts = options(3.0);
        let function = opts.function("x^2 - 4").unwrap();
        let result = run(&function, &opts, &SolverConfig::default()).unwrap();
        let rows = iteration_outputs(&result);

        assert_eq!(rows.len(), result.records.len());
        assert_eq!(rows[0].iteration, 1);
        assert_eq!(rows[0].x, 3.0);
        assert_eq!(rows[0].fx, 5.0);
    }
}
