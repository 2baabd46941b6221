//! Local multi-threaded engine
//!
//! Runs a round's job on a dedicated rayon thread pool. Each rayon task builds
//! its own [`Assigner`] from the round's broadcast before it handles any point,
//! so assignment tasks share nothing but the read-only centroid set.

use super::shuffle::group_by_centroid;
use super::{AbortFlag, BatchEngine, JobReport, RoundJob};
use crate::cluster::{aggregate, Assigner};
use crate::error::ClusterError;
use crate::storage::{create_round_dir, read_points, stage_partition, OutputRecord};
use anyhow::Context;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::Instant;
use tracing::debug;

/// Engine running every stage on an in-process thread pool
pub struct LocalEngine {
    pool: ThreadPool,
    threads: usize,
}

impl LocalEngine {
    /// Create an engine with `threads` workers (0 = one per logical CPU)
    pub fn new(threads: usize) -> crate::Result<Self> {
        let threads = if threads == 0 { num_cpus::get() } else { threads };

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("scalarmeans-worker-{}", i))
            .build()
            .context("Failed to build worker thread pool")?;

        Ok(Self { pool, threads })
    }

    /// Number of worker threads
    pub fn threads(&self) -> usize {
        self.threads
    }
}

impl BatchEngine for LocalEngine {
    fn name(&self) -> &str {
        "local"
    }

    fn execute(&self, job: &RoundJob, abort: &AbortFlag) -> Result<JobReport, ClusterError> {
        let start = Instant::now();
        let round = job.round;

        create_round_dir(&job.output_dir)
            .map_err(|e| ClusterError::job(round, &job.output_dir, e))?;

        let points = read_points(&job.points).map_err(|e| ClusterError::from_job_input(round, e))?;
        debug!(round = round + 1, points = points.len(), "Points loaded");
        ensure_running(job, abort)?;

        let broadcast = &job.broadcast;
        let groups = self.pool.install(|| {
            let assignments = points
                .par_iter()
                .map_init(|| Assigner::new(broadcast.clone()), |assigner, &point| assigner.assign(point));
            group_by_centroid(assignments)
        });
        debug!(round = round + 1, groups = groups.len(), "Shuffle complete");
        ensure_running(job, abort)?;

        let group_count = groups.len();
        let records: Vec<OutputRecord> =
            self.pool.install(|| groups.into_par_iter().map(aggregate).collect());
        ensure_running(job, abort)?;

        if let Some(record) = records.iter().find(|r| !r.centroid.is_finite()) {
            return Err(ClusterError::job(
                round,
                &job.output_dir,
                format!("non-finite centroid {} computed from {} points", record.centroid, record.members.len()),
            ));
        }

        let staged = stage_partition(&job.output_dir, &records)
            .map_err(|e| ClusterError::job(round, &job.output_dir, e))?;

        // A timeout may fire while the partition is being written
        if let Err(err) = ensure_running(job, abort) {
            if let Err(e) = staged.discard() {
                debug!(round = round + 1, error = %e, "Failed to remove staged partition");
            }
            return Err(err);
        }

        let partition = staged
            .commit()
            .map_err(|e| ClusterError::job(round, &job.output_dir, e))?;

        Ok(JobReport {
            points: points.len(),
            groups: group_count,
            partition,
            elapsed: start.elapsed(),
        })
    }
}

fn ensure_running(job: &RoundJob, abort: &AbortFlag) -> Result<(), ClusterError> {
    if abort.is_raised() {
        return Err(ClusterError::job(job.round, &job.output_dir, "job aborted"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Broadcast;
    use crate::storage::{read_centroids, PART_FILE_NAME};
    use std::fs;
    use std::path::Path;

    fn job(dir: &Path, points: &str, centroids: &[f64]) -> RoundJob {
        let points_path = dir.join("points.txt");
        fs::write(&points_path, points).unwrap();
        RoundJob {
            round: 0,
            points: points_path,
            broadcast: Broadcast::new(centroids.to_vec()).unwrap(),
            output_dir: dir.join("out").join("round-0000"),
        }
    }

    #[test]
    fn test_round_recomputes_centroids() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path(), "1\n2\n3\n9\n10\n11\n", &[0.0, 10.0]);
        let engine = LocalEngine::new(2).unwrap();

        let report = engine.execute(&job, &AbortFlag::new()).unwrap();

        assert_eq!(report.points, 6);
        assert_eq!(report.groups, 2);
        assert_eq!(report.partition, job.output_dir.join(PART_FILE_NAME));
        assert_eq!(read_centroids(&job.output_dir).unwrap(), vec![2.0, 10.0]);
    }

    #[test]
    fn test_partition_lists_every_member_once() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path(), "1\n2\n3\n9\n10\n11\n", &[0.0, 10.0]);
        LocalEngine::new(4).unwrap().execute(&job, &AbortFlag::new()).unwrap();

        let content = fs::read_to_string(job.output_dir.join(PART_FILE_NAME)).unwrap();
        let mut members: Vec<f64> = content
            .lines()
            .flat_map(|line| {
                let (_, members) = line.split_once('\t').unwrap();
                members.split(' ').map(|m| m.parse::<f64>().unwrap()).collect::<Vec<_>>()
            })
            .collect();
        members.sort_by(f64::total_cmp);
        assert_eq!(members, vec![1.0, 2.0, 3.0, 9.0, 10.0, 11.0]);
    }

    #[test]
    fn test_empty_cluster_produces_no_record() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path(), "1\n2\n3\n4\n", &[0.0, 5.0, 100.0]);
        let report = LocalEngine::new(2).unwrap().execute(&job, &AbortFlag::new()).unwrap();

        assert_eq!(report.groups, 2);
        // 1, 2 -> 0; 3, 4 -> 5
        assert_eq!(read_centroids(&job.output_dir).unwrap(), vec![1.5, 3.5]);
    }

    #[test]
    fn test_existing_output_refused() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path(), "1\n", &[0.0]);
        fs::create_dir_all(&job.output_dir).unwrap();

        let err = LocalEngine::new(1).unwrap().execute(&job, &AbortFlag::new()).unwrap_err();
        assert!(matches!(err, ClusterError::JobExecution { round: 0, .. }));
    }

    #[test]
    fn test_malformed_point_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path(), "1\n2\nx7\n", &[0.0]);

        match LocalEngine::new(1).unwrap().execute(&job, &AbortFlag::new()) {
            Err(ClusterError::Parse { line, record, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(record, "x7");
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_point_record_with_extra_text_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path(), "1 2\n3\n", &[0.0]);

        match LocalEngine::new(1).unwrap().execute(&job, &AbortFlag::new()) {
            Err(ClusterError::Parse { line, record, .. }) => {
                assert_eq!(line, 1);
                assert_eq!(record, "1 2");
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
        assert!(!job.output_dir.join(PART_FILE_NAME).exists());
    }

    #[test]
    fn test_huge_points_keep_finite_centroid() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path(), "1e308\n1e308\n", &[0.0]);
        LocalEngine::new(1).unwrap().execute(&job, &AbortFlag::new()).unwrap();

        assert_eq!(read_centroids(&job.output_dir).unwrap(), vec![1e308]);
    }

    #[test]
    fn test_raised_abort_commits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path(), "1\n2\n", &[0.0]);
        let abort = AbortFlag::new();
        abort.raise();

        let err = LocalEngine::new(1).unwrap().execute(&job, &abort).unwrap_err();
        assert!(matches!(err, ClusterError::JobExecution { .. }));
        assert!(!job.output_dir.join(PART_FILE_NAME).exists());
    }

    #[test]
    fn test_zero_threads_uses_all_cpus() {
        let engine = LocalEngine::new(0).unwrap();
        assert_eq!(engine.threads(), num_cpus::get());
        assert_eq!(engine.name(), "local");
    }
}
