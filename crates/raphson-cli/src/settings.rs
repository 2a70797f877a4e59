//! Persisted user defaults.
//!
//! Stored as JSON in the user config directory. Missing keys fall back to the
//! solver defaults, so an empty or partial file is valid.

use std::path::{Path, PathBuf};

use raphson_math::plot::DEFAULT_SAMPLES;
use raphson_math::solvers::{
    SolverConfig, DEFAULT_DERIVATIVE_EPSILON, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

/// Decimal places used for the iteration table.
pub const DEFAULT_PRECISION: usize = 8;

/// Stored configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Step-size tolerance.
    pub tolerance: f64,
    /// Iteration budget.
    pub max_iterations: u32,
    /// Zero-derivative threshold.
    pub derivative_epsilon: f64,
    /// Default output format.
    pub format: OutputFormat,
    /// Decimal places for iteration values.
    pub precision: usize,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Samples per function curve.
    pub samples: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            derivative_epsilon: DEFAULT_DERIVATIVE_EPSILON,
            format: OutputFormat::Table,
            precision: DEFAULT_PRECISION,
            use_colors: true,
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl Settings {
    /// Loads settings, using defaults when the file does not exist.
    pub fn load(path: &Path) -> CliResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| {
                CliError::Config(format!("{} is not valid: {}", path.display(), e))
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Writes settings, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Solver configuration from the stored defaults.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.tolerance, self.max_iterations)
            .with_derivative_epsilon(self.derivative_epsilon)
    }

    /// Current value of `key` as text.
    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::Tolerance => self.tolerance.to_string(),
            ConfigKey::MaxIterations => self.max_iterations.to_string(),
            ConfigKey::DerivativeEpsilon => self.derivative_epsilon.to_string(),
            ConfigKey::Format => self.format.as_str().to_string(),
            ConfigKey::Precision => self.precision.to_string(),
            ConfigKey::UseColors => self.use_colors.to_string(),
            ConfigKey::Samples => self.samples.to_string(),
        }
    }

    /// Validates and stores `value` under `key`.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> CliResult<()> {
        let invalid = |expected: &str| {
            CliError::Config(format!("Invalid {}: {}. {}", key.as_str(), value, expected))
        };

        match key {
            ConfigKey::Tolerance => {
                let v: f64 = value.parse().map_err(|_| invalid("Must be a number."))?;
                if !v.is_finite() || v <= 0.0 {
                    return Err(invalid("Must be positive."));
                }
                self.tolerance = v;
            }
            ConfigKey::MaxIterations => {
                let v: u32 = value.parse().map_err(|_| invalid("Must be an integer."))?;
                if v == 0 {
                    return Err(invalid("Must be at least 1."));
                }
                self.max_iterations = v;
            }
            ConfigKey::DerivativeEpsilon => {
                let v: f64 = value.parse().map_err(|_| invalid("Must be a number."))?;
                if !v.is_finite() || v < 0.0 {
                    return Err(invalid("Must be non-negative."));
                }
                self.derivative_epsilon = v;
            }
            ConfigKey::Format => {
                self.format = OutputFormat::from_name(value)
                    .ok_or_else(|| invalid("Use table, json, csv, or minimal."))?;
            }
            ConfigKey::Precision => {
                let v: usize = value.parse().map_err(|_| invalid("Must be a number."))?;
                if !(2..=16).contains(&v) {
                    return Err(invalid("Must be between 2 and 16."));
                }
                self.precision = v;
            }
            ConfigKey::UseColors => {
                self.use_colors = match value.to_lowercase().as_str() {
                    "true" | "1" | "yes" => true,
                    "false" | "0" | "no" => false,
                    _ => return Err(invalid("Use true or false.")),
                };
            }
            ConfigKey::Samples => {
                let v: usize = value.parse().map_err(|_| invalid("Must be an integer."))?;
                if v < 2 {
                    return Err(invalid("Must be at least 2."));
                }
                self.samples = v;
            }
        }
        Ok(())
    }

    /// Restores the default value of `key`.
    pub fn reset(&mut self, key: ConfigKey) {
        let defaults = Self::default();
        match key {
            ConfigKey::Tolerance => self.tolerance = defaults.tolerance,
            ConfigKey::MaxIterations => self.max_iterations = defaults.max_iterations,
            ConfigKey::DerivativeEpsilon => self.derivative_epsilon = defaults.derivative_epsilon,
            ConfigKey::Format => self.format = defaults.format,
            ConfigKey::Precision => self.precision = defaults.precision,
            ConfigKey::UseColors => self.use_colors = defaults.use_colors,
            ConfigKey::Samples => self.samples = defaults.samples,
        }
    }
}

/// Configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// Step-size tolerance
    Tolerance,
    /// Iteration budget
    MaxIterations,
    /// Zero-derivative threshold
    DerivativeEpsilon,
    /// Default output format
    Format,
    /// Decimal places for iteration values
    Precision,
    /// Whether to use colors
    UseColors,
    /// Samples per function curve
    Samples,
}

impl ConfigKey {
    /// Looks up a key by name or alias.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tolerance" | "tol" => Some(Self::Tolerance),
            "max_iterations" | "max-iterations" | "max_iter" => Some(Self::MaxIterations),
            "derivative_epsilon" | "derivative-epsilon" | "epsilon" => {
                Some(Self::DerivativeEpsilon)
            }
            "format" | "default_format" => Some(Self::Format),
            "precision" | "decimal_precision" => Some(Self::Precision),
            "use_colors" | "colors" => Some(Self::UseColors),
            "samples" => Some(Self::Samples),
            _ => None,
        }
    }

    /// Canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tolerance => "tolerance",
            Self::MaxIterations => "max_iterations",
            Self::DerivativeEpsilon => "derivative_epsilon",
            Self::Format => "format",
            Self::Precision => "precision",
            Self::UseColors => "use_colors",
            Self::Samples => "samples",
        }
    }

    /// One-line description for `config list`.
    pub fn description(self) -> &'static str {
        match self {
            Self::Tolerance => "Maximum step |x_n+1 - x_n| accepted as converged",
            Self::MaxIterations => "Maximum number of Newton iterations",
            Self::DerivativeEpsilon => "Derivatives smaller than this stop the solver",
            Self::Format => "Default output format (table, json, csv, minimal)",
            Self::Precision => "Decimal places in the iteration table (2-16)",
            Self::UseColors => "Enable colored output (true, false)",
            Self::Samples => "Points sampled per function curve in plot output",
        }
    }

    /// All keys in display order.
    pub fn all() -> &'static [Self] {
        &[
            Self::Tolerance,
            Self::MaxIterations,
            Self::DerivativeEpsilon,
            Self::Format,
            Self::Precision,
            Self::UseColors,
            Self::Samples,
        ]
    }
}

/// Resolves the config file path.
pub fn config_path(explicit: Option<&Path>) -> CliResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let base = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| CliError::Config("Could not determine config directory".to_string()))?;
    Ok(base.join("raphson").join("config.json"))
}
