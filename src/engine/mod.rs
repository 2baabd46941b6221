//! Batch execution substrate
//!
//! This module defines the seam between the round coordinator and whatever runs
//! a round's batch job. A job is one full assignment + shuffle + aggregation pass:
//!
//! ```text
//! read points ─► assign (parallel, broadcast centroids) ─► group by exact key ─► aggregate (parallel) ─► commit partition
//! ```
//!
//! # Architecture
//!
//! The `BatchEngine` trait lets the coordinator stay agnostic of how the job is
//! scheduled. The crate ships [`local::LocalEngine`], which runs every stage on
//! a dedicated rayon thread pool; a cluster scheduler would implement the same
//! trait.
//!
//! # Contract
//!
//! - `execute` blocks until the job's output partition is durable, or fails.
//! - The output directory must not exist before the job; a job never overwrites
//!   an earlier round.
//! - Engines check the [`AbortFlag`] between stages and never commit output once
//!   it is raised.

pub mod local;
pub mod shuffle;

pub use local::LocalEngine;

use crate::cluster::Broadcast;
use crate::error::ClusterError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Batch engine trait for running one round
///
/// Engines must be `Send + Sync`: the coordinator hands the job to a blocking
/// task while keeping its own handle to the engine.
pub trait BatchEngine: Send + Sync {
    /// Short engine name for logs and reports
    fn name(&self) -> &str;

    /// Run one round's job to completion
    ///
    /// # Errors
    ///
    /// Returns `Parse` for a malformed point record and `JobExecution` when the
    /// job cannot be scheduled, fails, or is aborted.
    fn execute(&self, job: &RoundJob, abort: &AbortFlag) -> Result<JobReport, ClusterError>;
}

/// Everything a round's job needs
#[derive(Debug, Clone)]
pub struct RoundJob {
    /// Round index (0-based)
    pub round: u32,
    /// Point source
    pub points: PathBuf,
    /// Centroid set every Assigner of the round is built from
    pub broadcast: Broadcast,
    /// Fresh directory the job's single partition is committed to
    pub output_dir: PathBuf,
}

/// Summary of a completed job
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    /// Points read and assigned
    pub points: usize,
    /// Non-empty cluster groups aggregated
    pub groups: usize,
    /// Committed output partition
    pub partition: PathBuf,
    pub elapsed: Duration,
}

/// Shared flag asking a running job to stop
///
/// Raised by the coordinator when a round exceeds its timeout.
#[derive(Debug, Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
