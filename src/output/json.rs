//! JSON run report
//!
//! Written at the end of a successful run when `--json-report` is set. Holds the
//! configuration echo, per-round statistics, the final status and centroid set.

use crate::cluster::Verdict;
use crate::config::Config;
use crate::coordinator::{RunOutcome, RunStatus};
use crate::stats::RoundStats;
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Duration with both microseconds and human-readable format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDuration {
    pub micros: u64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        let micros = d.as_micros() as u64;
        let human = format_duration_human(d);
        Self { micros, human }
    }
}

/// One round in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRound {
    /// Round number (1-based)
    pub round: u32,
    pub points: usize,
    pub centroids_in: usize,
    pub centroids_out: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_shift: Option<f64>,
    pub verdict: Verdict,
    pub output: PathBuf,
    pub elapsed: JsonDuration,
}

impl From<&RoundStats> for JsonRound {
    fn from(stats: &RoundStats) -> Self {
        Self {
            round: stats.round + 1,
            points: stats.points,
            centroids_in: stats.centroids_in,
            centroids_out: stats.centroids_out,
            max_shift: stats.max_shift,
            verdict: stats.verdict,
            output: stats.output.clone(),
            elapsed: JsonDuration::from_duration(stats.elapsed),
        }
    }
}

/// Complete run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRunReport {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub config: Config,
    pub status: RunStatus,
    pub centroids: Vec<f64>,
    pub final_output: PathBuf,
    pub rounds: Vec<JsonRound>,
    pub elapsed: JsonDuration,
}

impl JsonRunReport {
    pub fn new(config: &Config, outcome: &RunOutcome, elapsed: Duration) -> Self {
        Self {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            config: config.clone(),
            status: outcome.status,
            centroids: outcome.centroids.clone(),
            final_output: outcome.final_output.clone(),
            rounds: outcome.rounds.iter().map(JsonRound::from).collect(),
            elapsed: JsonDuration::from_duration(elapsed),
        }
    }
}

/// Write the run report as pretty-printed JSON
pub fn write_run_report(path: &Path, config: &Config, outcome: &RunOutcome, elapsed: Duration) -> Result<()> {
    let report = JsonRunReport::new(config, outcome, elapsed);

    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON report: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report)
        .with_context(|| format!("Failed to write JSON report: {}", path.display()))?;
    writer.flush()
        .with_context(|| format!("Failed to write JSON report: {}", path.display()))?;

    Ok(())
}

/// Format duration in human-readable format
fn format_duration_human(d: Duration) -> String {
    let micros = d.as_micros() as u64;

    if micros == 0 {
        return "0µs".to_string();
    }

    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.3}ms", micros as f64 / 1000.0)
    } else if micros < 60_000_000 {
        format!("{:.3}s", micros as f64 / 1_000_000.0)
    } else if micros < 3_600_000_000 {
        format!("{:.2}m", micros as f64 / 60_000_000.0)
    } else {
        format!("{:.2}h", micros as f64 / 3_600_000_000.0)
    }
}
