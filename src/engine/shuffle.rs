//! Shuffle: group assignments by centroid
//!
//! Keys are compared by exact bit pattern. The Assigner emits the stored
//! broadcast value, so all points sent to one centroid share identical bits and
//! land in the same group; there is no tolerance-based bucketing.

use crate::cluster::{Assignment, ClusterGroup};
use rayon::prelude::*;
use std::collections::HashMap;

/// Group assignments by their centroid
///
/// Runs as a parallel fold/reduce over per-task maps. Groups come back sorted by
/// ascending key; member order inside a group is unspecified. Every assignment
/// ends up in exactly one group, and no group is empty.
pub fn group_by_centroid<I>(assignments: I) -> Vec<ClusterGroup>
where
    I: ParallelIterator<Item = Assignment>,
{
    let buckets = assignments
        .fold(HashMap::new, |mut acc: HashMap<u64, Vec<f64>>, assignment| {
            acc.entry(assignment.centroid.to_bits())
                .or_default()
                .push(assignment.point);
            acc
        })
        .reduce(HashMap::new, merge_buckets);

    let mut groups: Vec<ClusterGroup> = buckets
        .into_iter()
        .map(|(bits, points)| ClusterGroup {
            key: f64::from_bits(bits),
            points,
        })
        .collect();

    groups.sort_by(|a, b| a.key.total_cmp(&b.key));
    groups
}

fn merge_buckets(
    mut left: HashMap<u64, Vec<f64>>,
    right: HashMap<u64, Vec<f64>>,
) -> HashMap<u64, Vec<f64>> {
    // Merge the smaller map into the larger one
    if left.len() < right.len() {
        return merge_buckets(right, left);
    }
    for (key, mut points) in right {
        left.entry(key).or_default().append(&mut points);
    }
    left
}
