//! Raphson CLI - Newton-Raphson root finding from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Find a root, showing the derivative, iteration table and summary
//! raphson solve "x^2 - 4" --x0 3
//!
//! # Tighter tolerance and a custom iteration budget
//! raphson solve "cos(x) - x" --x0 1 --tolerance 1e-12 --max-iterations 50
//!
//! # Print a derivative
//! raphson derive "x^3 + sin(x)"
//!
//! # Chart series as CSV
//! raphson plot "x^2 - 4" --x0 3 --x-min -5 --x-max 5 --format csv
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;
mod settings;

use cli::{Cli, Commands};
use commands::Context;
use settings::Settings;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for results
    let default_filter = if cli.verbose {
        "raphson=debug,raphson_math=debug"
    } else if cli.quiet {
        "raphson=error,raphson_math=error"
    } else {
        "raphson=info,raphson_math=warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = settings::config_path(cli.config.as_deref())?;
    let settings = Settings::load(&config_path)?;
    tracing::debug!("loaded settings from {}", config_path.display());

    if !settings.use_colors {
        colored::control::set_override(false);
    }

    let ctx = Context {
        format: cli.format.unwrap_or(settings.format),
        quiet: cli.quiet,
        settings,
        config_path,
    };

    // Execute command
    match cli.command {
        Commands::Solve(args) => commands::solve::execute(args, &ctx)?,
        Commands::Derive(args) => commands::derive::execute(args, &ctx)?,
        Commands::Eval(args) => commands::eval::execute(args, &ctx)?,
        Commands::Plot(args) => commands::plot::execute(args, &ctx)?,
        Commands::Config(args) => commands::config::execute(args, &ctx)?,
    }

    Ok(())
}
