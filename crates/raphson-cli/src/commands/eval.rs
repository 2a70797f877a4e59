//! Eval command implementation.
//!
//! Evaluates an expression at one or more points, reporting domain errors
//! instead of printing NaN.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use raphson_math::expr::Function;

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::output::{format_fixed, print_header, print_json_value, print_output};

/// Arguments for the eval command.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Function of x to evaluate
    #[arg(allow_hyphen_values = true)]
    pub expression: String,

    /// Points at which to evaluate
    #[arg(
        short,
        long,
        required = true,
        num_args = 1..,
        allow_negative_numbers = true
    )]
    pub at: Vec<f64>,

    /// Also evaluate the derivative
    #[arg(long)]
    pub slope: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct EvalOutput {
    x: f64,
    value: f64,
    #[tabled(skip)]
    slope: Option<f64>,
}

#[derive(Debug, Tabled)]
struct EvalRow {
    #[tabled(rename = "x")]
    x: String,
    #[tabled(rename = "f(x)")]
    value: String,
    #[tabled(rename = "f'(x)")]
    slope: String,
}

/// Evaluates `function` at every point, stopping at the first domain error.
fn evaluate_points(function: &Function, points: &[f64], slope: bool) -> Result<Vec<EvalOutput>> {
    points
        .iter()
        .map(|&x| {
            let value = function.try_value(x)?;
            debug!("f({}) = {}", x, value);
            Ok(EvalOutput {
                x,
                value,
                slope: slope.then(|| function.slope(x)),
            })
        })
        .collect()
}

/// Execute the eval command.
pub fn execute(args: EvalArgs, ctx: &Context) -> Result<()> {
    let function = Function::parse(&args.expression)?;
    let results = evaluate_points(&function, &args.at, args.slope)?;

    match ctx.format {
        OutputFormat::Table => {
            let precision = ctx.settings.precision;
            if ctx.decorate() {
                print_header(&format!("f(x) = {}", function.expression()));
            }
            let rows: Vec<EvalRow> = results
                .iter()
                .map(|r| EvalRow {
                    x: r.x.to_string(),
                    value: format_fixed(r.value, precision),
                    slope: r
                        .slope
                        .map_or_else(|| "-".to_string(), |s| format_fixed(s, precision)),
                })
                .collect();
            crate::output::print_table(&rows)?;
        }
        OutputFormat::Json => print_json_value(&results)?,
        OutputFormat::Csv => print_output(&results, OutputFormat::Csv)?,
        OutputFormat::Minimal => {
            for r in &results {
                println!("{}", r.value);
            }
        }
    }

    Ok(())
}
