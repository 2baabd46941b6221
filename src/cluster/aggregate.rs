//! Per-cluster aggregation

use crate::storage::OutputRecord;

/// All points assigned to one centroid in a round
///
/// Produced by the shuffle, so it always holds at least one point.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterGroup {
    /// Centroid value the Assigner emitted for these points
    pub key: f64,
    pub points: Vec<f64>,
}

/// Arithmetic mean of a non-empty slice
///
/// Finite points always yield a finite mean: if the plain sum overflows, each
/// point is scaled by the count before summing.
pub fn mean(points: &[f64]) -> f64 {
    let n = points.len() as f64;
    let sum: f64 = points.iter().sum();
    if sum.is_finite() {
        return sum / n;
    }
    points.iter().map(|p| p / n).sum()
}

/// Recompute a group's centroid
///
/// The new centroid is the mean of the group's points; the record keeps every
/// member point exactly once for the round's audit output.
pub fn aggregate(group: ClusterGroup) -> OutputRecord {
    debug_assert!(
        !group.points.is_empty(),
        "group for centroid {} reached aggregation without points",
        group.key
    );

    OutputRecord {
        centroid: mean(&group.points),
        members: group.points,
    }
}
