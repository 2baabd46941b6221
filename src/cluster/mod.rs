//! Clustering stages of a round
//!
//! A round is two stages joined by a shuffle:
//!
//! ```text
//! points ──► Assigner (parallel) ──► shuffle by centroid ──► Aggregator (parallel) ──► new centroids
//!                 ▲
//!             Broadcast (round-scoped, read-only centroid set)
//! ```
//!
//! The [`convergence`] check then compares the round's input and output centroid
//! sets. All three stages are pure; scheduling and storage live in
//! [`crate::engine`] and [`crate::storage`].
//!
//! # Grouping key equality
//!
//! Assignments are grouped by *exact* equality of the centroid value the Assigner
//! emitted. The Assigner always emits the stored broadcast value itself, never a
//! recomputed one, so equal keys are bit-identical within a round. Do not replace
//! this with tolerance-based bucketing: merging nearby centroids changes the
//! clustering result.

pub mod aggregate;
pub mod assign;
pub mod convergence;

pub use aggregate::{aggregate, mean, ClusterGroup};
pub use assign::{nearest, Assigner};
pub use convergence::{check, report, ConvergenceReport, Verdict, DEFAULT_TOLERANCE};

use std::sync::Arc;

/// A point paired with the centroid it was assigned to
///
/// Exists only between the assignment stage and the shuffle of one round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub centroid: f64,
    pub point: f64,
}

/// Round-scoped, read-only centroid set shared by every Assigner of a round
///
/// Never empty. Cloning shares the underlying values, so every parallel
/// Assigner sees the identical set in the identical order.
#[derive(Debug, Clone, PartialEq)]
pub struct Broadcast {
    centroids: Arc<[f64]>,
}

impl Broadcast {
    /// Wrap a centroid set, or `None` if it is empty
    pub fn new(centroids: Vec<f64>) -> Option<Self> {
        if centroids.is_empty() {
            return None;
        }
        Some(Self {
            centroids: centroids.into(),
        })
    }

    /// Centroids in source order
    pub fn centroids(&self) -> &[f64] {
        &self.centroids
    }

    pub fn len(&self) -> usize {
        self.centroids.len()
    }
}
