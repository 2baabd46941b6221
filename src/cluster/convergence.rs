//! Convergence check between consecutive centroid sets
//!
//! Both sets are sorted ascending and compared index by index. The sets can
//! differ in size when a centroid attracted no points and dropped out of the
//! round's output; such sets cannot be paired up, so the verdict is
//! [`Verdict::SizeMismatch`], which the coordinator treats as "not converged".

use serde::{Deserialize, Serialize};

/// Maximum per-centroid movement between rounds that still counts as stable
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// Outcome of comparing two centroid sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every sorted pair moved by at most the tolerance
    Converged,
    /// At least one sorted pair moved by more than the tolerance
    NotConverged,
    /// The sets have different sizes and cannot be compared
    SizeMismatch { old: usize, new: usize },
}

impl Verdict {
    pub fn is_converged(&self) -> bool {
        matches!(self, Verdict::Converged)
    }
}

/// Full comparison of two centroid sets
///
/// Unlike [`check`], every pair is compared, so the report carries all
/// per-centroid shifts.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceReport {
    pub verdict: Verdict,
    /// Absolute shift of each sorted pair (empty on size mismatch)
    pub shifts: Vec<f64>,
}

impl ConvergenceReport {
    /// Largest shift, or `None` if the sets could not be paired
    pub fn max_shift(&self) -> Option<f64> {
        self.shifts.iter().copied().reduce(f64::max)
    }

    /// Number of pairs that moved by more than `tolerance`
    pub fn violations(&self, tolerance: f64) -> usize {
        self.shifts.iter().filter(|&&shift| shift > tolerance).count()
    }
}

/// Decide convergence, stopping at the first pair beyond `tolerance`
pub fn check(old: &[f64], new: &[f64], tolerance: f64) -> Verdict {
    if old.len() != new.len() {
        return Verdict::SizeMismatch {
            old: old.len(),
            new: new.len(),
        };
    }

    let old = sorted(old);
    let new = sorted(new);

    if old.iter().zip(&new).all(|(o, n)| (o - n).abs() <= tolerance) {
        Verdict::Converged
    } else {
        Verdict::NotConverged
    }
}

/// Compare every pair and report all shifts
pub fn report(old: &[f64], new: &[f64], tolerance: f64) -> ConvergenceReport {
    if old.len() != new.len() {
        return ConvergenceReport {
            verdict: Verdict::SizeMismatch {
                old: old.len(),
                new: new.len(),
            },
            shifts: Vec::new(),
        };
    }

    let shifts: Vec<f64> = sorted(old)
        .iter()
        .zip(&sorted(new))
        .map(|(o, n)| (o - n).abs())
        .collect();

    let verdict = if shifts.iter().all(|&shift| shift <= tolerance) {
        Verdict::Converged
    } else {
        Verdict::NotConverged
    };

    ConvergenceReport { verdict, shifts }
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut values = values.to_vec();
    values.sort_by(f64::total_cmp);
    values
}
