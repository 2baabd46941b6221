//! Human-readable text output

use crate::cluster::Verdict;
use crate::config::Config;
use crate::coordinator::{RunOutcome, RunStatus};
use crate::stats::{RoundStats, RunSummary};
use std::time::Duration;

/// Print the effective configuration
pub fn print_configuration(config: &Config) {
    println!("Configuration:");
    println!("  Points:         {}", config.input.dir.join(&config.input.points_file).display());
    println!("  Centroids:      {}", config.input.dir.join(&config.input.centroids_file).display());
    println!("  Output base:    {}", config.output.base.display());
    println!("  Tolerance:      {}", config.clustering.tolerance);
    println!("  Max rounds:     {}", config.clustering.max_rounds);
    if config.runtime.threads == 0 {
        println!("  Threads:        auto ({} CPUs)", num_cpus::get());
    } else {
        println!("  Threads:        {}", config.runtime.threads);
    }
    match config.runtime.round_timeout() {
        Some(timeout) => println!("  Round timeout:  {}s", timeout.as_secs()),
        None => println!("  Round timeout:  none"),
    }
    if let Some(ref path) = config.output.json_report {
        println!("  JSON report:    {}", path.display());
    }
}

/// Print run results to console
///
/// Displays one line per round followed by the final centroid set.
pub fn print_results(outcome: &RunOutcome, elapsed: Duration) {
    let summary = RunSummary::from_rounds(&outcome.rounds);

    println!("═══════════════════════════════════════════════════════════");
    println!("                    RUN RESULTS");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Elapsed Time: {:.3}s", elapsed.as_secs_f64());
    println!();

    println!("Rounds:");
    for round in &outcome.rounds {
        println!("  {}", format_round(round));
    }
    println!();

    println!("Summary:");
    println!("  Rounds:          {}", summary.rounds);
    println!("  Assignments:     {}", format_number(summary.assignments as u64));
    if summary.size_mismatches > 0 {
        println!("  Size mismatches: {}", summary.size_mismatches);
    }
    match outcome.status {
        RunStatus::Converged => println!("  Status:          converged"),
        RunStatus::RoundLimitReached => println!("  Status:          round limit reached (not converged)"),
    }
    println!();

    println!("Centroids ({}):", outcome.centroids.len());
    for centroid in &outcome.centroids {
        println!("  {}", centroid);
    }
    println!();
    println!("Final output: {}", outcome.final_output.display());
    println!("═══════════════════════════════════════════════════════════");
}

/// One console line for a round
fn format_round(round: &RoundStats) -> String {
    let movement = match (round.verdict, round.max_shift) {
        (Verdict::SizeMismatch { old, new }, _) => format!("size mismatch {} -> {}", old, new),
        (_, Some(shift)) => format!("max shift {:.6}", shift),
        (_, None) => "max shift n/a".to_string(),
    };
    let verdict = match round.verdict {
        Verdict::Converged => "converged",
        Verdict::NotConverged | Verdict::SizeMismatch { .. } => "not converged",
    };

    format!(
        "#{:<4} {:>12} points  {:>3} -> {:<3} centroids  {:<28} {:<14} {:.3}s",
        round.round + 1,
        format_number(round.points as u64),
        round.centroids_in,
        round.centroids_out,
        movement,
        verdict,
        round.elapsed.as_secs_f64()
    )
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (count, c) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}
