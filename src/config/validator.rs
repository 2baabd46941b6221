//! Configuration validation

use super::*;
use anyhow::Result;
use tracing::warn;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_input(&config.input)?;
    validate_output(&config.output, &config.input)?;
    validate_clustering(&config.clustering)?;
    validate_runtime(&config.runtime)?;

    Ok(())
}

/// Validate input configuration
pub fn validate_input(input: &InputConfig) -> Result<()> {
    validate_file_name(&input.points_file, "points_file")?;
    validate_file_name(&input.centroids_file, "centroids_file")?;

    if input.points_file == input.centroids_file {
        anyhow::bail!(
            "points_file and centroids_file must differ, both are {:?}",
            input.points_file
        );
    }

    Ok(())
}

/// File names are resolved inside the input directory
fn validate_file_name(name: &str, field: &str) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("{} must not be empty", field);
    }
    if name.contains('/') || name.contains('\\') {
        anyhow::bail!("{} must be a plain file name, got {:?}", field, name);
    }
    Ok(())
}

/// Validate output configuration
pub fn validate_output(output: &OutputConfig, input: &InputConfig) -> Result<()> {
    if output.base.as_os_str().is_empty() {
        anyhow::bail!("output base must not be empty");
    }

    if output.base == input.dir {
        anyhow::bail!(
            "output base must differ from the input directory ({})",
            input.dir.display()
        );
    }

    Ok(())
}

/// Validate clustering configuration
pub fn validate_clustering(clustering: &ClusterConfig) -> Result<()> {
    if !clustering.tolerance.is_finite() || clustering.tolerance < 0.0 {
        anyhow::bail!(
            "tolerance must be a non-negative number, got {}",
            clustering.tolerance
        );
    }

    if clustering.max_rounds == 0 {
        anyhow::bail!("max_rounds must be at least 1");
    }

    if clustering.max_rounds > 10_000 {
        warn!(
            max_rounds = clustering.max_rounds,
            "max_rounds is very large; every round keeps its output on disk"
        );
    }

    Ok(())
}

/// Validate runtime configuration
pub fn validate_runtime(runtime: &RuntimeConfig) -> Result<()> {
    if runtime.threads > 1024 {
        anyhow::bail!("threads must be between 0 and 1024, got {}", runtime.threads);
    }

    if runtime.round_timeout_secs == Some(0) {
        anyhow::bail!("round timeout must be at least 1 second");
    }

    Ok(())
}
