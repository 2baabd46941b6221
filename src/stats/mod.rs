//! Round and run statistics
//!
//! The coordinator records one [`RoundStats`] per completed round. A run's rounds
//! are summarized by [`RunSummary`] for the console and JSON reports.

use crate::cluster::Verdict;
use std::path::PathBuf;
use std::time::Duration;

/// Statistics for one completed round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundStats {
    /// Round index (0-based)
    pub round: u32,
    /// Points assigned in the round
    pub points: usize,
    /// Centroids broadcast to the round
    pub centroids_in: usize,
    /// Centroids the round produced
    pub centroids_out: usize,
    /// Largest centroid movement, `None` if the sets could not be paired
    pub max_shift: Option<f64>,
    pub verdict: Verdict,
    /// Round output directory
    pub output: PathBuf,
    pub elapsed: Duration,
}

impl RoundStats {
    /// Centroids that received no points and dropped out
    pub fn vanished(&self) -> usize {
        self.centroids_in.saturating_sub(self.centroids_out)
    }
}

/// Totals across the rounds of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub rounds: usize,
    /// Point assignments across all rounds
    pub assignments: usize,
    /// Rounds whose verdict was a size mismatch
    pub size_mismatches: usize,
    /// Time spent inside rounds
    pub round_time: Duration,
}

impl RunSummary {
    pub fn from_rounds(rounds: &[RoundStats]) -> Self {
        rounds.iter().fold(Self::default(), |mut acc, r| {
            acc.rounds += 1;
            acc.assignments += r.points;
            if matches!(r.verdict, Verdict::SizeMismatch { .. }) {
                acc.size_mismatches += 1;
            }
            acc.round_time += r.elapsed;
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(round: u32, centroids_in: usize, centroids_out: usize, verdict: Verdict) -> RoundStats {
        RoundStats {
            round,
            points: 4,
            centroids_in,
            centroids_out,
            max_shift: None,
            verdict,
            output: PathBuf::from(format!("out/round-{:04}", round)),
            elapsed: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_vanished_centroids() {
        let stats = round(0, 3, 2, Verdict::SizeMismatch { old: 3, new: 2 });
        assert_eq!(stats.vanished(), 1);
        assert_eq!(round(1, 2, 2, Verdict::Converged).vanished(), 0);
    }

    #[test]
    fn test_summary_totals() {
        let rounds = vec![
            round(0, 3, 2, Verdict::SizeMismatch { old: 3, new: 2 }),
            round(1, 2, 2, Verdict::NotConverged),
            round(2, 2, 2, Verdict::Converged),
        ];
        let summary = RunSummary::from_rounds(&rounds);
        assert_eq!(summary.rounds, 3);
        assert_eq!(summary.assignments, 12);
        assert_eq!(summary.size_mismatches, 1);
        assert_eq!(summary.round_time, Duration::from_millis(15));
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(RunSummary::from_rounds(&[]), RunSummary::default());
    }
}
