//! Runs every algorithm on one scenario and ranks them.

use std::path::Path;

use anyhow::{Context, Result};
use headsweep_config::OutputFormat;
use headsweep_kernel::calculate_algorithm;
use headsweep_types::{Algorithm, AlgorithmResult, Track};
use serde::Serialize;

use super::{ScenarioArgs, load_config};
use crate::style::{self, RankingRow};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ComparisonEntry {
    algorithm: Algorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_tracks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sequence: Option<Vec<Track>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(project: &Path, args: &ScenarioArgs, format: Option<OutputFormat>) -> Result<()> {
    let config = load_config(project)?;
    let scenario = args.resolve(&config)?;
    let format = format.unwrap_or(config.output.format);

    let mut outcomes: Vec<(Algorithm, Result<AlgorithmResult, String>)> = Algorithm::ALL
        .into_iter()
        .map(|algorithm| {
            let outcome = calculate_algorithm(algorithm, &scenario).map_err(|e| e.to_string());
            (algorithm, outcome)
        })
        .collect();

    // Fewest tracks first, then shortest time; failures sink to the bottom.
    outcomes.sort_by(|(_, a), (_, b)| match (a, b) {
        (Ok(a), Ok(b)) => a
            .total_tracks
            .cmp(&b.total_tracks)
            .then(a.total_time.total_cmp(&b.total_time)),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => std::cmp::Ordering::Equal,
    });

    match format {
        OutputFormat::Json => {
            let entries: Vec<ComparisonEntry> = outcomes
                .iter()
                .map(|(algorithm, outcome)| match outcome {
                    Ok(result) => ComparisonEntry {
                        algorithm: *algorithm,
                        total_tracks: Some(result.total_tracks),
                        total_time: Some(result.total_time),
                        sequence: Some(result.sequence.clone()),
                        error: None,
                    },
                    Err(message) => ComparisonEntry {
                        algorithm: *algorithm,
                        total_tracks: None,
                        total_time: None,
                        sequence: None,
                        error: Some(message.clone()),
                    },
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&entries).context("Failed to render JSON")?
            );
        }
        OutputFormat::Text => {
            style::print_section(&format!(
                "Comparing {} algorithms from track {} ({} requests)",
                outcomes.len(),
                scenario.initial_track,
                scenario.requests.len()
            ));
            let rows: Vec<RankingRow> = outcomes
                .iter()
                .map(|(algorithm, outcome)| RankingRow {
                    algorithm: algorithm.to_string(),
                    outcome: outcome
                        .as_ref()
                        .map(|result| {
                            (
                                result.total_tracks,
                                result.total_time,
                                result.sequence.len(),
                                result.overhead_moves(),
                            )
                        })
                        .map_err(Clone::clone),
                })
                .collect();
            println!("{}", style::ranking_table(&rows));

            if let Some((best, _)) = outcomes.first().filter(|(_, outcome)| outcome.is_ok()) {
                style::print_success(&format!("{best} moves the head the least"));
            }
        }
    }

    Ok(())
}
