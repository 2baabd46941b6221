//! Durable storage for round inputs and outputs
//!
//! Points, the initial centroid set and every round's output are plain text
//! artifacts on a filesystem. This module owns their formats and locations:
//!
//! - `records`: parsing one numeric value per text record
//! - `round_output`: writing and reading a round's single output partition
//! - `layout`: where inputs live and where each round writes

pub mod layout;
pub mod records;
pub mod round_output;

pub use layout::RunLayout;
pub use records::{parse_points, parse_values, read_points, read_values};
pub use round_output::{
    create_round_dir, partition_path, read_centroids, stage_partition, OutputRecord, StagedPartition,
    PART_FILE_NAME,
};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading text records
#[derive(Debug, Error)]
pub enum RecordError {
    /// A record is not a finite number
    #[error("malformed record at {}:{line}: {record:?}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        record: String,
    },

    /// The artifact could not be read
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
