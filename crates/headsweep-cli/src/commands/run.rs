//! Single-algorithm run.

use std::path::Path;

use anyhow::{Context, Result};
use headsweep_config::OutputFormat;
use headsweep_kernel::{calculate_algorithm, trace_hash_hex};
use headsweep_types::{Algorithm, AlgorithmResult, Scenario};
use serde::Serialize;

use super::{ScenarioArgs, load_config};
use crate::style::{self, colors::SemanticStyle};

/// Machine-readable run report.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReport<'a> {
    algorithm: Algorithm,
    scenario: &'a Scenario,
    #[serde(flatten)]
    result: &'a AlgorithmResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
}

pub fn run(
    project: &Path,
    algorithm: Option<&str>,
    args: &ScenarioArgs,
    format: Option<OutputFormat>,
    fingerprint: bool,
) -> Result<()> {
    let config = load_config(project)?;
    let algorithm = match algorithm {
        Some(tag) => tag.parse::<Algorithm>()?,
        None => config.scheduler.algorithm,
    };
    let scenario = args.resolve(&config)?;
    let format = format.unwrap_or(config.output.format);
    let fingerprint = fingerprint || config.output.fingerprint;

    let result = calculate_algorithm(algorithm, &scenario)
        .with_context(|| format!("{algorithm} rejected the scenario"))?;
    tracing::debug!(%algorithm, steps = result.steps.len(), "run complete");

    let hash = fingerprint.then(|| trace_hash_hex(&result));

    match format {
        OutputFormat::Json => {
            let report = RunReport {
                algorithm,
                scenario: &scenario,
                result: &result,
                fingerprint: hash,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to render JSON")?
            );
        }
        OutputFormat::Text => print_text(algorithm, &scenario, &result, hash.as_deref()),
    }

    Ok(())
}

fn print_text(
    algorithm: Algorithm,
    scenario: &Scenario,
    result: &AlgorithmResult,
    hash: Option<&str>,
) {
    style::print_section(&format!(
        "{} from track {} ({} request{})",
        algorithm,
        scenario.initial_track,
        scenario.requests.len(),
        if scenario.requests.len() == 1 { "" } else { "s" }
    ));

    if result.steps.is_empty() {
        style::print_spacer();
        style::print_hint("Nothing to schedule");
    } else {
        println!("{}", style::step_table(result));
    }

    style::print_spacer();
    let sequence = result
        .sequence
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ");
    style::print_labeled("Sequence", &sequence);
    style::print_labeled("Total tracks", &result.total_tracks.to_string().header());
    style::print_labeled("Total time", &format!("{:.1}", result.total_time));
    style::print_labeled("Average seek", &format!("{:.2}", result.average_seek()));
    if result.overhead_moves() > 0 {
        style::print_labeled("Overhead moves", &result.overhead_moves().to_string());
    }
    if let Some(hash) = hash {
        style::print_labeled("Fingerprint", &hash.code());
    }
}
