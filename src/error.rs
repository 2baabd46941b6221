//! Fatal error kinds for a clustering run
//!
//! Every variant identifies the round it happened in, the input that caused it and
//! the underlying cause, so a single diagnostic is enough to locate the failure.
//! Rounds are stored 0-based and displayed 1-based.
//!
//! A size mismatch between consecutive centroid sets is *not* an error; it is a
//! convergence verdict (see [`crate::cluster::convergence::Verdict`]).

use crate::storage::RecordError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Boxed cause carried by [`ClusterError::JobExecution`]
pub type JobFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort a clustering run
#[derive(Debug, Error)]
pub enum ClusterError {
    /// A record in an input or round output is not a finite number
    #[error("round {}: malformed record at {}:{line}: {record:?} is not a finite number", .round + 1, .path.display())]
    Parse {
        round: u32,
        path: PathBuf,
        line: usize,
        record: String,
    },

    /// The round's batch job failed or could not be scheduled
    #[error("round {}: job failed on {}", .round + 1, .path.display())]
    JobExecution {
        round: u32,
        path: PathBuf,
        #[source]
        source: JobFailure,
    },

    /// The round's centroid source holds no centroids
    #[error("round {}: centroid set loaded from {} is empty", .round + 1, .path.display())]
    EmptyCentroidSet { round: u32, path: PathBuf },

    /// The round's centroid broadcast could not be loaded
    #[error("round {}: centroid broadcast {} could not be loaded", .round + 1, .path.display())]
    MissingBroadcast {
        round: u32,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The round's job did not finish within the configured timeout
    #[error("round {}: job writing {} exceeded timeout of {timeout:?}", .round + 1, .output.display())]
    RoundTimeout {
        round: u32,
        output: PathBuf,
        timeout: Duration,
    },

    /// The run was cancelled before the round started
    #[error("run cancelled before round {}", .round + 1)]
    Cancelled { round: u32 },
}

impl ClusterError {
    /// Build a job failure from any error or message
    pub fn job(round: u32, path: impl Into<PathBuf>, source: impl Into<JobFailure>) -> Self {
        Self::JobExecution {
            round,
            path: path.into(),
            source: source.into(),
        }
    }

    /// Lift a record error raised while reading the round's centroid source
    pub fn from_broadcast(round: u32, err: RecordError) -> Self {
        match err {
            RecordError::Malformed { path, line, record } => Self::Parse { round, path, line, record },
            RecordError::Io { path, source } => Self::MissingBroadcast { round, path, source },
        }
    }

    /// Lift a record error raised while reading points or a round output
    pub fn from_job_input(round: u32, err: RecordError) -> Self {
        match err {
            RecordError::Malformed { path, line, record } => Self::Parse { round, path, line, record },
            RecordError::Io { path, source } => Self::job(round, path, source),
        }
    }

    /// Round the error was raised in
    pub fn round(&self) -> u32 {
        match self {
            Self::Parse { round, .. }
            | Self::JobExecution { round, .. }
            | Self::EmptyCentroidSet { round, .. }
            | Self::MissingBroadcast { round, .. }
            | Self::RoundTimeout { round, .. }
            | Self::Cancelled { round } => *round,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_names_round_and_location() {
        let err = ClusterError::Parse {
            round: 2,
            path: PathBuf::from("in/points.txt"),
            line: 7,
            record: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("round 3"));
        assert!(msg.contains("in/points.txt:7"));
        assert!(msg.contains("\"abc\""));
    }

    #[test]
    fn test_broadcast_io_becomes_missing_broadcast() {
        let err = ClusterError::from_broadcast(
            0,
            RecordError::Io {
                path: PathBuf::from("in/centroids.txt"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            },
        );
        assert!(matches!(err, ClusterError::MissingBroadcast { round: 0, .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_job_input_io_becomes_job_execution() {
        let err = ClusterError::from_job_input(
            4,
            RecordError::Io {
                path: PathBuf::from("in/points.txt"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            },
        );
        assert!(matches!(err, ClusterError::JobExecution { round: 4, .. }));
        assert_eq!(err.round(), 4);
    }
}
