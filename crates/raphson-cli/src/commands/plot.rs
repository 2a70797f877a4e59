//! Plot command implementation.
//!
//! Solves, then emits the two chart series: the sampled function with the
//! root marker, and the per-iteration error for a logarithmic axis.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::{info, warn};

use raphson_math::plot::PlotData;

use crate::cli::OutputFormat;
use crate::commands::solve::run;
use crate::commands::{Context, SolverOptions};
use crate::output::{print_header, print_json_value, print_output, print_warning, KeyValue};

/// Arguments for the plot command.
#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Function of x to solve and sample
    #[arg(allow_hyphen_values = true)]
    pub expression: String,

    #[command(flatten)]
    pub solver: SolverOptions,

    /// Left end of the sampled interval
    #[arg(long, allow_negative_numbers = true)]
    pub x_min: f64,

    /// Right end of the sampled interval
    #[arg(long, allow_negative_numbers = true)]
    pub x_max: f64,

    /// Number of samples (default from config)
    #[arg(short, long)]
    pub samples: Option<usize>,
}

/// One chart point.
#[derive(Debug, Serialize, Tabled)]
pub struct SeriesPoint {
    /// "function", "error" or "root".
    pub series: &'static str,
    pub x: f64,
    pub y: f64,
}

/// Flattens plot data into tagged points, function curve first.
pub fn series_points(data: &PlotData) -> Vec<SeriesPoint> {
    let function = data.function.iter().map(|&(x, y)| SeriesPoint {
        series: "function",
        x,
        y,
    });
    let root = data.root.iter().map(|&(x, y)| SeriesPoint {
        series: "root",
        x,
        y,
    });
    let errors = data.errors.iter().map(|&(i, e)| SeriesPoint {
        series: "error",
        x: f64::from(i),
        y: e,
    });
    function.chain(root).chain(errors).collect()
}

/// Execute the plot command.
pub fn execute(args: PlotArgs, ctx: &Context) -> Result<()> {
    let function = args.solver.function(&args.expression)?;
    let config = args.solver.solver_config(&ctx.settings);
    let samples = args.samples.unwrap_or(ctx.settings.samples);

    let result = run(&function, &args.solver, &config)?;
    if !result.converged() {
        warn!("{}; plotting without a root marker", result.status);
    }

    let data = PlotData::new(
        |x| function.value(x),
        &result,
        args.x_min,
        args.x_max,
        samples,
    )?;
    info!(
        "{} function points, {} error points",
        data.function.len(),
        data.errors.len()
    );

    match ctx.format {
        OutputFormat::Table => {
            if ctx.decorate() {
                print_header(&format!("Plot data for f(x) = {}", function.source()));
            }
            let mut summary = vec![
                KeyValue::new("Interval", format!("[{}, {}]", args.x_min, args.x_max)),
                KeyValue::new("Function points", data.function.len().to_string()),
                KeyValue::new("Error points", data.errors.len().to_string()),
            ];
            if let Some((root, _)) = data.root {
                summary.push(KeyValue::new("Root", root.to_string()));
            }
            print_output(&summary, OutputFormat::Table)?;
            if ctx.decorate() && data.root.is_none() {
                print_warning(&format!("No root marker: {}", result.status));
            }
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct PlotOutput<'a> {
                expression: &'a str,
                status: &'static str,
                function: &'a [(f64, f64)],
                errors: &'a [(u32, f64)],
                root: Option<(f64, f64)>,
            }
            print_json_value(&PlotOutput {
                expression: function.source(),
                status: result.status.as_str(),
                function: &data.function,
                errors: &data.errors,
                root: data.root,
            })?;
        }
        OutputFormat::Csv => print_output(&series_points(&data), OutputFormat::Csv)?,
        OutputFormat::Minimal => {
            for point in series_points(&data) {
                println!("{} {} {}", point.series, point.x, point.y);
            }
        }
    }

    Ok(())
}
