//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//!
//! Precedence, lowest to highest: built-in defaults, `--config` TOML file,
//! explicit CLI flags. The input directory and output base always come from
//! the command line.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::cluster::DEFAULT_TOLERANCE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub clustering: ClusterConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl Config {
    /// Default configuration for an input directory and output base
    pub fn new(input_dir: PathBuf, output_base: PathBuf) -> Self {
        Self {
            input: InputConfig {
                dir: input_dir,
                points_file: default_points_file(),
                centroids_file: default_centroids_file(),
            },
            output: OutputConfig {
                base: output_base,
                json_report: None,
            },
            clustering: ClusterConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }

    /// Overlay the settings present in a configuration file
    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(input) = file.input {
            if let Some(points_file) = input.points_file {
                self.input.points_file = points_file;
            }
            if let Some(centroids_file) = input.centroids_file {
                self.input.centroids_file = centroids_file;
            }
        }
        if let Some(output) = file.output {
            if output.json_report.is_some() {
                self.output.json_report = output.json_report;
            }
        }
        if let Some(clustering) = file.clustering {
            self.clustering = clustering;
        }
        if let Some(runtime) = file.runtime {
            self.runtime = runtime;
        }
    }
}

/// Input locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory holding the point and initial centroid files
    pub dir: PathBuf,
    /// Point file name inside `dir`
    #[serde(default = "default_points_file")]
    pub points_file: String,
    /// Initial centroid file name inside `dir`
    #[serde(default = "default_centroids_file")]
    pub centroids_file: String,
}

fn default_points_file() -> String {
    "points.txt".to_string()
}

fn default_centroids_file() -> String {
    "centroids.txt".to_string()
}

/// Output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives one sub-directory per round
    pub base: PathBuf,
    /// Optional JSON run report path
    #[serde(default)]
    pub json_report: Option<PathBuf>,
}

/// Clustering loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    /// Maximum per-centroid movement that counts as converged
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Upper bound on rounds; the run stops here even if not converged
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_rounds() -> u32 {
    50
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_rounds: default_max_rounds(),
        }
    }
}

/// Execution settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Worker threads (0 = one per logical CPU)
    #[serde(default)]
    pub threads: usize,
    /// Per-round timeout in seconds (None = unbounded)
    #[serde(default)]
    pub round_timeout_secs: Option<u64>,
}

impl RuntimeConfig {
    pub fn round_timeout(&self) -> Option<Duration> {
        self.round_timeout_secs.map(Duration::from_secs)
    }
}

/// Contents of a `--config` TOML file
///
/// Every section is optional; sections that are present replace the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub input: Option<InputFileSection>,
    pub output: Option<OutputFileSection>,
    pub clustering: Option<ClusterConfig>,
    pub runtime: Option<RuntimeConfig>,
}

/// `[input]` section of a configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputFileSection {
    pub points_file: Option<String>,
    pub centroids_file: Option<String>,
}

/// `[output]` section of a configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputFileSection {
    pub json_report: Option<PathBuf>,
}
