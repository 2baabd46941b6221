//! Round output partitions
//!
//! Each round writes exactly one partition file, `part-00000`, into its own
//! directory. One record per surviving cluster:
//!
//! ```text
//! <new centroid>\t<member> <member> ...
//! ```
//!
//! Only the leading centroid is consumed by the next round; the member list is
//! kept for audit. Values are written with the shortest representation that
//! parses back to the identical `f64` (switching to exponent notation for very
//! large or small magnitudes), so the centroids a round computes are exactly the
//! centroids the next round broadcasts.

use super::records::read_values;
use super::RecordError;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the single output partition in a round directory
pub const PART_FILE_NAME: &str = "part-00000";

/// Name the partition is staged under until it is complete
const STAGING_FILE_NAME: &str = ".part-00000.inprogress";

/// One output record: a recomputed centroid and the points that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub centroid: f64,
    pub members: Vec<f64>,
}

impl fmt::Display for OutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}\t", self.centroid)?;
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:?}", member)?;
        }
        Ok(())
    }
}

/// Create a round's output directory
///
/// Fails with `AlreadyExists` if the directory is already there: round outputs
/// are never overwritten. Parent directories are created as needed.
pub fn create_round_dir(dir: &Path) -> io::Result<()> {
    if let Some(parent) = dir.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::create_dir(dir)
}

/// A fully written and synced partition that is not yet visible to readers
#[derive(Debug)]
pub struct StagedPartition {
    staging: PathBuf,
    target: PathBuf,
}

impl StagedPartition {
    /// Rename the partition into place and return its final path
    pub fn commit(self) -> io::Result<PathBuf> {
        fs::rename(&self.staging, &self.target)?;
        Ok(self.target)
    }

    /// Drop the staged file without publishing it
    pub fn discard(self) -> io::Result<()> {
        fs::remove_file(&self.staging)
    }
}

/// Write the round's partition under a staging name
///
/// Nothing is visible at `part-00000` until [`StagedPartition::commit`], so
/// readers see either no partition or a complete one.
pub fn stage_partition(dir: &Path, records: &[OutputRecord]) -> io::Result<StagedPartition> {
    let staging = dir.join(STAGING_FILE_NAME);

    let file = File::create(&staging)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        writeln!(writer, "{}", record)?;
    }
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    Ok(StagedPartition {
        staging,
        target: dir.join(PART_FILE_NAME),
    })
}

/// Path of the partition inside a round directory
pub fn partition_path(dir: &Path) -> PathBuf {
    dir.join(PART_FILE_NAME)
}

/// Read the centroid set a round produced
pub fn read_centroids(dir: &Path) -> Result<Vec<f64>, RecordError> {
    read_values(&partition_path(dir))
}
