//! Nearest-centroid assignment

use super::{Assignment, Broadcast};

/// Find the centroid nearest to `point`
///
/// Distance is `|centroid - point|`. On an exact tie the centroid that comes
/// first in `centroids` wins: a later candidate replaces the running best only
/// when it is strictly closer. Returns `None` for an empty set.
pub fn nearest(point: f64, centroids: &[f64]) -> Option<f64> {
    let (&first, rest) = centroids.split_first()?;
    Some(nearest_from(point, first, rest))
}

#[inline]
fn nearest_from(point: f64, first: f64, rest: &[f64]) -> f64 {
    let mut best = first;
    let mut best_distance = (first - point).abs();

    for &centroid in rest {
        let distance = (centroid - point).abs();
        if distance < best_distance {
            best = centroid;
            best_distance = distance;
        }
    }

    best
}

/// Assignment stage for one task of a round
///
/// Built from the round's [`Broadcast`] before any point is processed. Holds no
/// mutable state, so one instance can serve any number of points.
#[derive(Debug, Clone)]
pub struct Assigner {
    broadcast: Broadcast,
}

impl Assigner {
    pub fn new(broadcast: Broadcast) -> Self {
        Self { broadcast }
    }

    /// Pair `point` with its nearest centroid
    ///
    /// The emitted centroid is the broadcast value itself, so every point sent to
    /// the same centroid carries a bit-identical grouping key.
    pub fn assign(&self, point: f64) -> Assignment {
        // Broadcast is never empty
        let centroids = self.broadcast.centroids();
        Assignment {
            centroid: nearest_from(point, centroids[0], &centroids[1..]),
            point,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assigner(centroids: &[f64]) -> Assigner {
        Assigner::new(Broadcast::new(centroids.to_vec()).unwrap())
    }

    #[test]
    fn test_nearest_basic() {
        assert_eq!(nearest(1.0, &[0.0, 10.0]), Some(0.0));
        assert_eq!(nearest(9.0, &[0.0, 10.0]), Some(10.0));
        assert_eq!(nearest(-7.0, &[-5.0, 0.0, 5.0]), Some(-5.0));
    }

    #[test]
    fn test_nearest_empty_set() {
        assert_eq!(nearest(1.0, &[]), None);
    }

    #[test]
    fn test_tie_keeps_earliest_centroid() {
        // 1.0 is equally close to 0.0 and 2.0
        assert_eq!(nearest(1.0, &[0.0, 2.0]), Some(0.0));
        assert_eq!(nearest(1.0, &[2.0, 0.0]), Some(2.0));
        // Duplicate centroids: first occurrence wins
        assert_eq!(nearest(5.0, &[7.0, 3.0, 7.0, 3.0]), Some(7.0));
    }

    #[test]
    fn test_assign_matches_brute_force_minimum() {
        let centroids = [-12.5, -3.0, 0.0, 0.25, 4.0, 4.5, 19.0, 100.0];
        let assigner = assigner(&centroids);

        let mut point = -30.0;
        while point < 130.0 {
            let assignment = assigner.assign(point);
            let best_distance = centroids
                .iter()
                .map(|c| (c - point).abs())
                .fold(f64::INFINITY, f64::min);
            let earliest = centroids
                .iter()
                .copied()
                .find(|c| (c - point).abs() == best_distance)
                .unwrap();

            assert_eq!(assignment.point, point);
            assert_eq!(assignment.centroid, earliest, "point {}", point);
            point += 0.125;
        }
    }

    #[test]
    fn test_assign_emits_stored_value() {
        let stored: f64 = 0.1 + 0.2;
        let assignment = assigner(&[stored, 10.0]).assign(0.3);
        assert_eq!(assignment.centroid.to_bits(), stored.to_bits());
    }

    #[test]
    fn test_assign_is_deterministic() {
        let assigner = assigner(&[1.0, 3.0, 5.0]);
        let first: Vec<_> = [2.0, 4.0, 0.0, 6.0].iter().map(|&p| assigner.assign(p)).collect();
        let second: Vec<_> = [2.0, 4.0, 0.0, 6.0].iter().map(|&p| assigner.assign(p)).collect();
        assert_eq!(first, second);
        assert_eq!(first[0].centroid, 1.0);
        assert_eq!(first[1].centroid, 3.0);
    }
}
