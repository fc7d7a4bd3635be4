//! Simulation and verification commands (VOPR integration).

use std::path::Path;

use anyhow::Result;
use headsweep_kernel::trace_hash_hex;
use headsweep_sim::{VoprConfig, VoprResult, VoprRunner, WorkloadConfig};
use headsweep_types::Algorithm;

use super::load_config;
use crate::style::{self, colors::SemanticStyle};

/// Runs VOPR simulations.
pub fn run(
    project: &Path,
    iterations: Option<u64>,
    seed: Option<u64>,
    max_requests: Option<usize>,
    verbose: bool,
) -> Result<()> {
    let settings = load_config(project)?;
    let config = VoprConfig {
        seed: seed.unwrap_or(settings.simulation.seed),
        iterations: iterations.unwrap_or(settings.simulation.iterations),
        workload: WorkloadConfig {
            num_requests: max_requests.unwrap_or(settings.simulation.max_requests),
            ..WorkloadConfig::default()
        },
        verbose,
        ..VoprConfig::default()
    };

    println!(
        "Running {} VOPR simulations (seed: {})...",
        config.iterations.to_string().header(),
        config.seed.to_string().code()
    );

    let runner = VoprRunner::new(config)?;
    let results = runner.run_batch();

    // Output summary
    println!();
    if results.all_passed() {
        style::print_success(&format!(
            "All {} simulations passed",
            results.successes.to_string().success()
        ));
    } else {
        println!(
            "{} {} passed, {} failed",
            "✗".error(),
            results.successes.to_string().success(),
            results.failures.to_string().error()
        );
    }

    println!(
        "  Time: {:.2}s ({:.0} sims/sec)",
        results.elapsed_secs,
        results.rate()
    );

    if !results.failed_seeds.is_empty() {
        println!();
        println!("{}", "Failed seeds (reproduce with):".warning());
        for seed in &results.failed_seeds {
            println!("  {} sim verify --seed {}", "headsweep".code(), seed);
        }
    }

    if results.all_passed() {
        Ok(())
    } else {
        anyhow::bail!("{} simulation(s) failed", results.failures)
    }
}

/// Replays one seed: prints its scenario, every algorithm's totals, and the
/// invariant verdict.
pub fn verify(project: &Path, seed: u64, algorithm: Option<&str>) -> Result<()> {
    let settings = load_config(project)?;
    let focus = algorithm.map(str::parse::<Algorithm>).transpose()?;

    println!("Verifying seed {}...", seed.to_string().code());
    println!();

    let runner = VoprRunner::new(VoprConfig {
        seed,
        iterations: 1,
        workload: WorkloadConfig {
            num_requests: settings.simulation.max_requests,
            ..WorkloadConfig::default()
        },
        verbose: true,
        ..VoprConfig::default()
    })?;

    let scenario = runner.scenario(seed);
    let requests = scenario
        .requests
        .iter()
        .map(|r| format!("{}@{}", r.track, r.arrival_time))
        .collect::<Vec<_>>()
        .join(",");
    style::print_info_table(&[
        ("Initial track", scenario.initial_track.to_string()),
        ("Domain", format!("{}..={}", scenario.min_track, scenario.effective_max_track())),
        ("Direction", scenario.direction.to_string()),
        ("Time per track", scenario.time_per_track.to_string()),
        ("Time per request", scenario.time_per_request.to_string()),
        ("N-step", scenario.n_step.to_string()),
        ("Requests", if requests.is_empty() { "-".to_string() } else { requests }),
    ]);
    println!();

    for candidate in &runner.config().algorithms {
        match runner.replay(seed, *candidate) {
            Ok((_, result)) => {
                style::print_labeled(
                    candidate.as_str(),
                    &format!(
                        "{} tracks, time {:.1}, {}",
                        result.total_tracks,
                        result.total_time,
                        &trace_hash_hex(&result)[..16]
                    ),
                );
                if focus == Some(*candidate) && !result.steps.is_empty() {
                    println!("{}", style::step_table(&result));
                }
            }
            Err(e) => style::print_labeled(candidate.as_str(), &e.to_string().error()),
        }
    }
    println!();

    match runner.run_single(seed) {
        VoprResult::Success { .. } => {
            style::print_success(&format!("Seed {seed} passed all invariants"));
            Ok(())
        }
        VoprResult::InvariantViolation {
            algorithm,
            invariant,
            message,
            context,
            ..
        } => {
            style::print_error(&format!("{algorithm}: {invariant} violated"));
            style::print_labeled("Message", &message);
            for (key, value) in &context {
                style::print_labeled(key, value);
            }
            anyhow::bail!("seed {seed} failed")
        }
    }
}
