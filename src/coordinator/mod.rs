//! Round coordinator
//!
//! Drives a clustering run as a sequence of rounds. Each round:
//!
//! 1. loads the round's centroid source into a [`Broadcast`]
//! 2. submits one batch job (assign, shuffle, aggregate) and blocks on it
//! 3. reads the new centroid set back from the round's output partition
//! 4. compares it with the round's input set and decides whether to continue
//!
//! Round *n+1* broadcasts round *n*'s output, so rounds are strictly sequential.
//! The loop ends on convergence or when the configured round limit is reached.
//! Every fatal condition ends the run with a [`ClusterError`]; a size mismatch
//! between centroid sets is logged and counts as "not converged".

use crate::cluster::{self, Broadcast, Verdict};
use crate::config::Config;
use crate::engine::{AbortFlag, BatchEngine, JobReport, RoundJob};
use crate::error::ClusterError;
use crate::stats::RoundStats;
use crate::storage::{self, read_centroids, read_values, RunLayout};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Where a round reads its centroids from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CentroidSource {
    /// The initial centroid file (round 0)
    Initial(PathBuf),
    /// The output directory of an earlier round
    RoundOutput { round: u32, dir: PathBuf },
}

impl CentroidSource {
    /// File holding the centroid records
    pub fn path(&self) -> PathBuf {
        match self {
            CentroidSource::Initial(path) => path.clone(),
            CentroidSource::RoundOutput { dir, .. } => storage::partition_path(dir),
        }
    }
}

/// Inputs and output of one round
///
/// Derived from the previous round's state once that round completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    /// Round index (0-based)
    pub index: u32,
    pub points: PathBuf,
    pub centroids: CentroidSource,
    pub output: PathBuf,
}

impl RoundState {
    /// State of the first round
    pub fn initial(layout: &RunLayout) -> Self {
        Self {
            index: 0,
            points: layout.points().to_path_buf(),
            centroids: CentroidSource::Initial(layout.initial_centroids().to_path_buf()),
            output: layout.round_dir(0),
        }
    }

    /// State of the round after this one: same points, this round's output as centroids
    pub fn next(self, layout: &RunLayout) -> Self {
        let index = self.index + 1;
        Self {
            index,
            points: self.points,
            centroids: CentroidSource::RoundOutput {
                round: self.index,
                dir: self.output,
            },
            output: layout.round_dir(index),
        }
    }
}

/// Run-level cancellation, checked before every round
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Converged,
    RoundLimitReached,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub status: RunStatus,
    /// Final centroid set, sorted ascending
    pub centroids: Vec<f64>,
    /// Per-round statistics in execution order
    pub rounds: Vec<RoundStats>,
    /// Partition holding the final centroid set
    pub final_output: PathBuf,
}

/// Coordinator for a clustering run
pub struct Coordinator {
    layout: RunLayout,
    tolerance: f64,
    max_rounds: u32,
    round_timeout: Option<Duration>,
    engine: Arc<dyn BatchEngine>,
}

impl Coordinator {
    /// Create a coordinator for a validated configuration
    pub fn new(config: &Config, engine: Arc<dyn BatchEngine>) -> Self {
        Self {
            layout: RunLayout::from_config(config),
            tolerance: config.clustering.tolerance,
            max_rounds: config.clustering.max_rounds,
            round_timeout: config.runtime.round_timeout(),
            engine,
        }
    }

    /// Override the per-round timeout
    pub fn with_round_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.round_timeout = timeout;
        self
    }

    pub fn layout(&self) -> &RunLayout {
        &self.layout
    }

    /// Run rounds until convergence or the round limit
    pub async fn run(&self, cancel: &CancelToken) -> Result<RunOutcome, ClusterError> {
        info!(
            engine = self.engine.name(),
            points = %self.layout.points().display(),
            output = %self.layout.output_base().display(),
            max_rounds = self.max_rounds,
            tolerance = self.tolerance,
            "Starting clustering run"
        );

        let mut state = RoundState::initial(&self.layout);
        let mut rounds = Vec::new();

        loop {
            if cancel.is_cancelled() {
                return Err(ClusterError::Cancelled { round: state.index });
            }

            let started = Instant::now();
            let broadcast = self.load_broadcast(&state)?;
            debug!(
                round = state.index + 1,
                centroids = broadcast.len(),
                source = %state.centroids.path().display(),
                "Broadcast loaded"
            );

            let report = self.submit(&state, broadcast.clone()).await?;

            let new_centroids = read_centroids(&state.output)
                .map_err(|e| ClusterError::from_job_input(state.index, e))?;
            let comparison = cluster::report(broadcast.centroids(), &new_centroids, self.tolerance);

            let stats = RoundStats {
                round: state.index,
                points: report.points,
                centroids_in: broadcast.len(),
                centroids_out: new_centroids.len(),
                max_shift: comparison.max_shift(),
                verdict: comparison.verdict,
                output: state.output.clone(),
                elapsed: started.elapsed(),
            };
            log_round(&stats);
            rounds.push(stats);

            let status = if comparison.verdict.is_converged() {
                Some(RunStatus::Converged)
            } else if state.index + 1 >= self.max_rounds {
                warn!(
                    rounds = self.max_rounds,
                    "Round limit reached without convergence"
                );
                Some(RunStatus::RoundLimitReached)
            } else {
                None
            };

            if let Some(status) = status {
                let mut centroids = new_centroids;
                centroids.sort_by(f64::total_cmp);
                return Ok(RunOutcome {
                    status,
                    centroids,
                    rounds,
                    final_output: report.partition,
                });
            }

            state = state.next(&self.layout);
        }
    }

    /// Load and check the round's centroid broadcast
    fn load_broadcast(&self, state: &RoundState) -> Result<Broadcast, ClusterError> {
        let path = state.centroids.path();
        let centroids =
            read_values(&path).map_err(|e| ClusterError::from_broadcast(state.index, e))?;

        Broadcast::new(centroids).ok_or(ClusterError::EmptyCentroidSet {
            round: state.index,
            path,
        })
    }

    /// Submit the round's job and wait for it, honoring the round timeout
    async fn submit(&self, state: &RoundState, broadcast: Broadcast) -> Result<JobReport, ClusterError> {
        let round = state.index;
        let job = RoundJob {
            round,
            points: state.points.clone(),
            broadcast,
            output_dir: state.output.clone(),
        };

        let abort = AbortFlag::new();
        let engine = Arc::clone(&self.engine);
        let job_abort = abort.clone();
        let handle = tokio::task::spawn_blocking(move || engine.execute(&job, &job_abort));

        let joined = match self.round_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    abort.raise();
                    return Err(ClusterError::RoundTimeout {
                        round,
                        output: state.output.clone(),
                        timeout,
                    });
                }
            },
            None => handle.await,
        };

        joined.map_err(|e| ClusterError::job(round, &state.output, e))?
    }
}

fn log_round(stats: &RoundStats) {
    match stats.verdict {
        Verdict::SizeMismatch { old, new } => warn!(
            round = stats.round + 1,
            old,
            new,
            "Centroid count changed; sets cannot be compared, continuing"
        ),
        verdict => info!(
            round = stats.round + 1,
            points = stats.points,
            centroids = stats.centroids_out,
            max_shift = stats.max_shift.unwrap_or(0.0),
            ?verdict,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "Round complete"
        ),
    }
}
