//! scalarmeans CLI entry point

use anyhow::{Context, Result};
use scalarmeans::config::{cli::Cli, toml::build_config, validator};
use scalarmeans::engine::LocalEngine;
use scalarmeans::output;
use scalarmeans::{CancelToken, Coordinator, RunStatus};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Exit code for a run that stopped at the round limit without converging
const EXIT_NOT_CONVERGED: i32 = 2;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug)?;
    cli.validate()?;

    println!("scalarmeans v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let config = build_config(&cli)?;
    validator::validate_config(&config)
        .context("Configuration validation failed")?;

    output::text::print_configuration(&config);

    if cli.dry_run {
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    let engine = LocalEngine::new(config.runtime.threads)
        .context("Failed to create local engine")?;
    println!("  Workers:        {}", engine.threads());
    println!();

    let runtime = tokio::runtime::Runtime::new()
        .context("Failed to create tokio runtime")?;

    let start = Instant::now();
    let cancel = CancelToken::new();

    let result = runtime.block_on(async {
        let interrupt = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupt received, stopping before the next round");
                    cancel.cancel();
                }
            })
        };

        let coordinator = Coordinator::new(&config, Arc::new(engine));
        let outcome = coordinator.run(&cancel).await;

        interrupt.abort();
        outcome
    });

    // A timed-out job may still be unwinding on a blocking thread
    runtime.shutdown_timeout(Duration::from_secs(5));

    let outcome = result.context("Clustering run failed")?;
    let elapsed = start.elapsed();

    println!();
    output::text::print_results(&outcome, elapsed);

    if let Some(ref path) = config.output.json_report {
        output::json::write_run_report(path, &config, &outcome, elapsed)?;
        println!("JSON report written to: {}", path.display());
    }

    if outcome.status == RunStatus::RoundLimitReached {
        std::process::exit(EXIT_NOT_CONVERGED);
    }

    Ok(())
}

/// Install the stderr log subscriber
fn init_logging(debug: bool) -> Result<()> {
    let level = if debug { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;

    Ok(())
}
