//! Config command implementation.
//!
//! Manages the stored solver and output defaults.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::collections::BTreeMap;

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::error::CliError;
use crate::output::{print_header, print_info, print_json_value, print_success, print_warning, KeyValue};
use crate::settings::{ConfigKey, Settings};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// List available configuration keys
    List,

    /// Reset configuration to defaults
    Reset(ResetArgs),

    /// Show configuration file location
    Path,
}

/// Arguments for get subcommand.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

/// Arguments for set subcommand.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// Configuration value
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Arguments for reset subcommand.
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Reset all settings (not just one)
    #[arg(long, conflicts_with = "key")]
    pub all: bool,

    /// Specific key to reset (optional)
    pub key: Option<String>,
}

fn parse_key(name: &str) -> Result<ConfigKey, CliError> {
    ConfigKey::from_name(name)
        .ok_or_else(|| CliError::Config(format!("Unknown configuration key: {}", name)))
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => execute_show(ctx),
        ConfigCommand::Get(get_args) => execute_get(get_args, ctx),
        ConfigCommand::Set(set_args) => execute_set(set_args, ctx),
        ConfigCommand::List => execute_list(ctx),
        ConfigCommand::Reset(reset_args) => execute_reset(reset_args, ctx),
        ConfigCommand::Path => execute_path(ctx),
    }
}

/// Show current configuration.
fn execute_show(ctx: &Context) -> Result<()> {
    let settings = &ctx.settings;
    let results: Vec<KeyValue> = ConfigKey::all()
        .iter()
        .map(|key| KeyValue::new(key.as_str(), settings.get(*key)))
        .collect();

    match ctx.format {
        OutputFormat::Table => {
            if ctx.decorate() {
                print_header("Current Configuration");
            }
            crate::output::print_output(&results, OutputFormat::Table)?;
        }
        OutputFormat::Json => print_json_value(settings)?,
        OutputFormat::Csv => crate::output::print_output(&results, OutputFormat::Csv)?,
        OutputFormat::Minimal => {
            for kv in &results {
                println!("{}={}", kv.key, kv.value);
            }
        }
    }

    Ok(())
}

/// Get a configuration value.
fn execute_get(args: GetArgs, ctx: &Context) -> Result<()> {
    let key = parse_key(&args.key)?;
    let value = ctx.settings.get(key);

    match ctx.format {
        OutputFormat::Table | OutputFormat::Csv => {
            println!("{}: {}", key.as_str(), value);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "key": key.as_str(),
                "value": value
            });
            print_json_value(&output)?;
        }
        OutputFormat::Minimal => {
            println!("{}", value);
        }
    }

    Ok(())
}

/// Set a configuration value.
fn execute_set(args: SetArgs, ctx: &Context) -> Result<()> {
    let key = parse_key(&args.key)?;

    let mut settings = ctx.settings.clone();
    settings.set(key, &args.value)?;
    settings.save(&ctx.config_path)?;

    if !ctx.quiet {
        print_success(&format!("Set {} = {}", key.as_str(), settings.get(key)));
    }
    Ok(())
}

/// List available configuration keys.
fn execute_list(ctx: &Context) -> Result<()> {
    let defaults = Settings::default();

    match ctx.format {
        OutputFormat::Table => {
            let results: Vec<KeyValue> = ConfigKey::all()
                .iter()
                .map(|key| {
                    KeyValue::new(
                        key.as_str(),
                        format!("{} (default: {})", key.description(), defaults.get(*key)),
                    )
                })
                .collect();
            if ctx.decorate() {
                print_header("Available Configuration Keys");
            }
            crate::output::print_output(&results, OutputFormat::Table)?;
        }
        OutputFormat::Json => {
            let output: Vec<_> = ConfigKey::all()
                .iter()
                .map(|key| {
                    serde_json::json!({
                        "key": key.as_str(),
                        "description": key.description(),
                        "default": defaults.get(*key)
                    })
                })
                .collect();
            print_json_value(&output)?;
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["key", "description", "default"])?;
            for key in ConfigKey::all() {
                wtr.write_record([key.as_str(), key.description(), defaults.get(*key).as_str()])?;
            }
            wtr.flush()?;
        }
        OutputFormat::Minimal => {
            for key in ConfigKey::all() {
                println!("{}", key.as_str());
            }
        }
    }

    Ok(())
}

/// Reset configuration.
fn execute_reset(args: ResetArgs, ctx: &Context) -> Result<()> {
    if args.all {
        Settings::default().save(&ctx.config_path)?;
        print_success("Reset all configuration to defaults");
    } else if let Some(name) = args.key {
        let key = parse_key(&name)?;
        let mut settings = ctx.settings.clone();
        settings.reset(key);
        settings.save(&ctx.config_path)?;
        print_success(&format!(
            "Reset {} to default ({})",
            key.as_str(),
            settings.get(key)
        ));
    } else {
        print_warning("Use --all to reset all settings, or specify a key to reset");
    }

    Ok(())
}

/// Show configuration file path.
fn execute_path(ctx: &Context) -> Result<()> {
    let path = &ctx.config_path;
    match ctx.format {
        OutputFormat::Json => {
            let mut output = BTreeMap::new();
            output.insert("path", path.display().to_string());
            output.insert("exists", path.exists().to_string());
            print_json_value(&output)?;
        }
        OutputFormat::Minimal | OutputFormat::Csv => println!("{}", path.display()),
        OutputFormat::Table => {
            print_info(&format!("Config file: {}", path.display()));
            if path.exists() {
                print_info("Status: exists");
            } else {
                print_info("Status: not created yet (using defaults)");
            }
        }
    }
    Ok(())
}
