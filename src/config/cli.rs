//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

/// scalarmeans - round-based k-means clustering of one-dimensional data
#[derive(Parser, Debug)]
#[command(name = "scalarmeans")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the point file and the initial centroid file
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Base directory for per-round outputs (one sub-directory per round)
    #[arg(value_name = "OUTPUT_BASE")]
    pub output_base: PathBuf,

    /// TOML configuration file (CLI flags take precedence)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    // === Clustering Options ===
    /// Maximum number of rounds before giving up on convergence
    #[arg(short = 'r', long)]
    pub max_rounds: Option<u32>,

    /// Convergence tolerance: maximum per-centroid movement between rounds
    #[arg(long)]
    pub tolerance: Option<f64>,

    // === Input Options ===
    /// Point file name inside INPUT_DIR
    #[arg(long)]
    pub points_file: Option<String>,

    /// Initial centroid file name inside INPUT_DIR
    #[arg(long)]
    pub centroids_file: Option<String>,

    // === Runtime Options ===
    /// Number of worker threads (0 = one per logical CPU)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Per-round timeout in whole seconds (e.g., 90s, 5m, 1h)
    #[arg(long)]
    pub round_timeout: Option<String>,

    // === Output Options ===
    /// Write a JSON run report to this path
    #[arg(long)]
    pub json_report: Option<PathBuf>,

    /// Validate and print the configuration without running
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments that can be checked before building a config
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(tolerance) = self.tolerance {
            if !tolerance.is_finite() || tolerance < 0.0 {
                anyhow::bail!("--tolerance must be a non-negative number, got {}", tolerance);
            }
        }

        if self.max_rounds == Some(0) {
            anyhow::bail!("--max-rounds must be at least 1");
        }

        if let Some(ref path) = self.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
        }

        Ok(())
    }
}
