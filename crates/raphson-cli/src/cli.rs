//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::commands::{ConfigArgs, DeriveArgs, EvalArgs, PlotArgs, SolveArgs};

/// Raphson - Newton-Raphson root finding with symbolic derivatives
#[derive(Parser)]
#[command(name = "raphson")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging (per-iteration solver trace on stderr)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, env = "RAPHSON_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Find a root of f(x) with Newton-Raphson
    Solve(SolveArgs),

    /// Print the symbolic derivative of f(x)
    Derive(DeriveArgs),

    /// Evaluate f(x) at one or more points
    Eval(EvalArgs),

    /// Emit chart series: f(x) samples, error per iteration and the root
    Plot(PlotArgs),

    /// Manage configuration defaults
    Config(ConfigArgs),
}

/// Output format options
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}

impl OutputFormat {
    /// Parses a format name as used in the config file.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "table" => Some(Self::Table),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Name as used in the config file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Minimal => "minimal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_initial_guess_and_expression() {
        let cli = Cli::try_parse_from(["raphson", "solve", "-x^2 + 4", "--x0", "-3"]).unwrap();
        match cli.command {
            Commands::Solve(args) => {
                assert_eq!(args.expression, "-x^2 + 4");
                assert_eq!(args.solver.x0, -3.0);
            }
            _ => panic!("expected solve"),
        }
    }

    #[test]
    fn test_format_names_round_trip() {
        for format in [
            OutputFormat::Table,
            OutputFormat::Json,
            OutputFormat::Csv,
            OutputFormat::Minimal,
        ] {
            assert_eq!(OutputFormat::from_name(format.as_str()), Some(format));
        }
        assert_eq!(OutputFormat::from_name("yaml"), None);
    }
}
