//! TOML configuration file parsing
//!
//! ```toml
//! [input]
//! points_file = "points.txt"
//! centroids_file = "centroids.txt"
//!
//! [output]
//! json_report = "run.json"
//!
//! [clustering]
//! tolerance = 0.1
//! max_rounds = 50
//!
//! [runtime]
//! threads = 8
//! round_timeout_secs = 600
//! ```

use super::cli::Cli;
use super::cli_convert::parse_duration;
use super::{Config, ConfigFile};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<ConfigFile> {
    let config: ConfigFile = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    if let Some(ref points_file) = cli.points_file {
        config.input.points_file = points_file.clone();
    }
    if let Some(ref centroids_file) = cli.centroids_file {
        config.input.centroids_file = centroids_file.clone();
    }

    if let Some(tolerance) = cli.tolerance {
        config.clustering.tolerance = tolerance;
    }
    if let Some(max_rounds) = cli.max_rounds {
        config.clustering.max_rounds = max_rounds;
    }

    if let Some(threads) = cli.threads {
        config.runtime.threads = threads;
    }
    if let Some(ref timeout) = cli.round_timeout {
        let timeout = parse_duration(timeout).context("Invalid round timeout")?;
        if timeout.subsec_nanos() != 0 {
            anyhow::bail!("Round timeout must be a whole number of seconds, got {:?}", timeout);
        }
        config.runtime.round_timeout_secs = Some(timeout.as_secs());
    }

    if let Some(ref path) = cli.json_report {
        config.output.json_report = Some(path.clone());
    }

    Ok(config)
}

/// Build the run configuration: defaults, then `--config` file, then CLI flags
pub fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::new(cli.input_dir.clone(), cli.output_base.clone());

    if let Some(ref path) = cli.config {
        let file = parse_toml_file(path)?;
        config.apply_file(file);
    }

    merge_cli_with_config(cli, config)
}
