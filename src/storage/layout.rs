//! Input and output locations for a run
//!
//! The input directory holds the point set and the initial centroid set. Each
//! round writes under the output base into a directory named by its round
//! counter, `round-0000`, `round-0001`, ..., so round outputs never collide and
//! are retained after the run for inspection.

use crate::config::Config;
use std::path::{Path, PathBuf};

/// Resolved paths for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    points: PathBuf,
    initial_centroids: PathBuf,
    output_base: PathBuf,
}

impl RunLayout {
    pub fn new(points: PathBuf, initial_centroids: PathBuf, output_base: PathBuf) -> Self {
        Self {
            points,
            initial_centroids,
            output_base,
        }
    }

    /// Resolve the layout described by a configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.input.dir.join(&config.input.points_file),
            config.input.dir.join(&config.input.centroids_file),
            config.output.base.clone(),
        )
    }

    pub fn points(&self) -> &Path {
        &self.points
    }

    pub fn initial_centroids(&self) -> &Path {
        &self.initial_centroids
    }

    pub fn output_base(&self) -> &Path {
        &self.output_base
    }

    /// Output directory for a round (0-based)
    pub fn round_dir(&self, round: u32) -> PathBuf {
        self.output_base.join(format!("round-{:04}", round))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn layout() -> RunLayout {
        RunLayout::new(
            PathBuf::from("in/points.txt"),
            PathBuf::from("in/centroids.txt"),
            PathBuf::from("out"),
        )
    }

    #[test]
    fn test_round_dir_naming() {
        let layout = layout();
        assert_eq!(layout.round_dir(0), PathBuf::from("out/round-0000"));
        assert_eq!(layout.round_dir(42), PathBuf::from("out/round-0042"));
        assert_eq!(layout.round_dir(12345), PathBuf::from("out/round-12345"));
    }

    #[test]
    fn test_round_dirs_pairwise_distinct() {
        let layout = layout();
        let dirs: HashSet<PathBuf> = (0..20_000).map(|r| layout.round_dir(r)).collect();
        assert_eq!(dirs.len(), 20_000);
    }
}
