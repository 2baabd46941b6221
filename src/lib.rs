//! scalarmeans - round-based k-means clustering of one-dimensional data
//!
//! scalarmeans clusters scalar values by running k-means as a sequence of batch
//! rounds. Every round is one parallel job over the full point set, and every
//! round's centroid set is persisted before the next round reads it back.
//!
//! # Architecture
//!
//! - **Cluster stages**: nearest-centroid assignment, per-cluster mean, convergence check
//! - **Batch engine**: pluggable round executor; the local engine runs on a rayon pool
//! - **Storage**: text inputs and one durable output partition per round
//! - **Coordinator**: threads round state through the loop, enforces round limit,
//!   timeouts and cancellation

pub mod cluster;
pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod output;
pub mod stats;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::{CancelToken, Coordinator, RunOutcome, RunStatus};
pub use engine::BatchEngine;
pub use error::ClusterError;

/// Result type used throughout scalarmeans
pub type Result<T> = anyhow::Result<T>;
