//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! power-rankings tool, including environment variable and TOML loading and
//! validation.

use crate::error::RatingError;
use crate::types::TeamUniverse;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub feed: FeedSettings,
    pub solver: SolverSettings,
    pub output: OutputSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Results feed settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// Season results page
    pub url: String,
    /// Saved copy of the results page; when set, no request is made
    pub input_path: Option<PathBuf>,
    /// CSS selector of the results table (first match is used)
    pub table_selector: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent sent with the request
    pub user_agent: String,
    /// Which teams are rated
    pub team_universe: TeamUniverse,
}

/// Optimizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Gradient infinity-norm tolerance
    pub gradient_tolerance: f64,
    /// Iteration cap; unset means 200 per parameter
    pub max_iterations: Option<usize>,
    /// Step halvings allowed per line search
    pub max_line_search_steps: usize,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Where to write the rankings CSV; unset disables the file
    pub csv_path: Option<PathBuf>,
    /// Run the interactive spread prompt after printing rankings
    pub prompt_spreads: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "power-rankings".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: "https://www.hockey-reference.com/leagues/NHL_2023_games.html".to_string(),
            input_path: None,
            table_selector: "table".to_string(),
            timeout_seconds: 30,
            user_agent: concat!("power-rankings/", env!("CARGO_PKG_VERSION")).to_string(),
            team_universe: TeamUniverse::Home,
        }
    }
}

impl FeedSettings {
    /// Request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            gradient_tolerance: 1e-5,
            max_iterations: None,
            max_line_search_steps: 50,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            csv_path: Some(PathBuf::from("nhl_power_rankings.csv")),
            prompt_spreads: true,
        }
    }
}

fn config_error(message: String) -> anyhow::Error {
    RatingError::ConfigurationError { message }.into()
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| config_error(format!("Invalid {} value: {}", name, raw)))
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| env::var(key).ok())?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.apply_overrides(|key| env::var(key).ok())?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Service settings
        if let Some(name) = lookup("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Some(log_level) = lookup("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Feed settings
        if let Some(url) = lookup("RESULTS_URL") {
            self.feed.url = url;
        }
        if let Some(path) = lookup("RESULTS_FILE") {
            self.feed.input_path = Some(PathBuf::from(path));
        }
        if let Some(selector) = lookup("RESULTS_TABLE_SELECTOR") {
            self.feed.table_selector = selector;
        }
        if let Some(timeout) = lookup("FEED_TIMEOUT_SECONDS") {
            self.feed.timeout_seconds = parse_var("FEED_TIMEOUT_SECONDS", &timeout)?;
        }
        if let Some(agent) = lookup("FEED_USER_AGENT") {
            self.feed.user_agent = agent;
        }
        if let Some(universe) = lookup("TEAM_UNIVERSE") {
            self.feed.team_universe = parse_var("TEAM_UNIVERSE", &universe)?;
        }

        // Solver settings
        if let Some(tolerance) = lookup("SOLVER_GRADIENT_TOLERANCE") {
            self.solver.gradient_tolerance = parse_var("SOLVER_GRADIENT_TOLERANCE", &tolerance)?;
        }
        if let Some(iterations) = lookup("SOLVER_MAX_ITERATIONS") {
            self.solver.max_iterations = Some(parse_var("SOLVER_MAX_ITERATIONS", &iterations)?);
        }
        if let Some(steps) = lookup("SOLVER_LINE_SEARCH_STEPS") {
            self.solver.max_line_search_steps = parse_var("SOLVER_LINE_SEARCH_STEPS", &steps)?;
        }

        // Output settings
        if let Some(path) = lookup("RANKINGS_CSV_PATH") {
            self.output.csv_path = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
        if let Some(prompt) = lookup("PROMPT_SPREADS") {
            self.output.prompt_spreads = parse_var("PROMPT_SPREADS", &prompt)?;
        }

        Ok(())
    }

}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => {
            return Err(config_error(format!(
                "Invalid log level: {}",
                config.service.log_level
            )))
        }
    }

    // Validate feed settings
    if config.feed.input_path.is_none() && config.feed.url.is_empty() {
        return Err(config_error(
            "Results URL cannot be empty without an input file".to_string(),
        ));
    }
    if config.feed.table_selector.trim().is_empty() {
        return Err(config_error("Table selector cannot be empty".to_string()));
    }
    if config.feed.timeout_seconds == 0 {
        return Err(config_error("Feed timeout must be greater than 0".to_string()));
    }

    // Validate solver settings
    if !(config.solver.gradient_tolerance > 0.0) {
        return Err(config_error("Gradient tolerance must be positive".to_string()));
    }
    if config.solver.max_iterations == Some(0) {
        return Err(config_error("Max iterations must be greater than 0".to_string()));
    }
    if config.solver.max_line_search_steps == 0 {
        return Err(config_error("Line search steps must be greater than 0".to_string()));
    }

    Ok(())
}
