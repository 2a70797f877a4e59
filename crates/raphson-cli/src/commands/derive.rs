//! Derive command implementation.
//!
//! Prints the symbolic derivative of an expression.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use raphson_math::expr::Function;

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::output::{print_header, print_json_value, print_output, KeyValue};

/// Arguments for the derive command.
#[derive(Args, Debug)]
pub struct DeriveArgs {
    /// Function of x to differentiate
    #[arg(allow_hyphen_values = true)]
    pub expression: String,
}

#[derive(Debug, Serialize, Tabled)]
struct DerivativeOutput {
    expression: String,
    derivative: String,
}

/// Execute the derive command.
pub fn execute(args: DeriveArgs, ctx: &Context) -> Result<()> {
    let function = Function::parse(&args.expression)?;
    let output = DerivativeOutput {
        expression: function.expression().to_string(),
        derivative: function.derivative().to_string(),
    };

    match ctx.format {
        OutputFormat::Table => {
            if ctx.decorate() {
                print_header("Derivative");
            }
            let rows = vec![
                KeyValue::new("f(x)", output.expression),
                KeyValue::new("f'(x)", output.derivative),
            ];
            print_output(&rows, OutputFormat::Table)?;
        }
        OutputFormat::Json => print_json_value(&output)?,
        OutputFormat::Csv => print_output(&[output], OutputFormat::Csv)?,
        OutputFormat::Minimal => println!("{}", output.derivative),
    }

    Ok(())
}
