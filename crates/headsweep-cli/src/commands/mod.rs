//! CLI command implementations.

pub mod compare;
pub mod config;
pub mod run;
pub mod sim;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use headsweep_config::{ConfigLoader, HeadsweepConfig};
use headsweep_types::{Direction, DiskRequest, Scenario, Track, parse_request_list};
use serde::Deserialize;

/// Scenario flags shared by `run` and `compare`.
///
/// Values are layered: configuration defaults, then `--file`, then flags.
#[derive(Args, Debug, Clone, Default)]
pub struct ScenarioArgs {
    /// Initial head position.
    #[arg(short, long, allow_negative_numbers = true)]
    pub initial: Option<i64>,

    /// Requests as TRACK[@ARRIVAL], comma or space separated (e.g. 10@0,19@1,3).
    #[arg(short, long)]
    pub requests: Option<String>,

    /// Upper track bound.
    #[arg(long, allow_negative_numbers = true)]
    pub max_track: Option<i64>,

    /// Lower track bound.
    #[arg(long, allow_negative_numbers = true)]
    pub min_track: Option<i64>,

    /// Initial sweep direction (asc or desc).
    #[arg(short, long)]
    pub direction: Option<Direction>,

    /// Simulated time to cross one track.
    #[arg(long)]
    pub time_per_track: Option<f64>,

    /// Simulated time to service one request.
    #[arg(long)]
    pub time_per_request: Option<f64>,

    /// Batch size for SCAN-N and LOOK-N.
    #[arg(short, long)]
    pub n_step: Option<usize>,

    /// JSON scenario file (camelCase fields, same shape as the json output).
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Scenario file with every field optional, so absent keys keep the
/// configured defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ScenarioFile {
    initial_track: Option<Track>,
    requests: Option<Vec<DiskRequest>>,
    max_track: Option<Track>,
    min_track: Option<Track>,
    direction: Option<Direction>,
    time_per_track: Option<f64>,
    time_per_request: Option<f64>,
    n_step: Option<usize>,
}

impl ScenarioArgs {
    /// Builds the scenario to simulate.
    pub fn resolve(&self, config: &HeadsweepConfig) -> Result<Scenario> {
        let mut scenario = config.scenario_defaults();
        let mut has_initial = false;
        let mut has_requests = false;

        if let Some(path) = &self.file {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
            let file: ScenarioFile = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse scenario file {}", path.display()))?;

            if let Some(track) = file.initial_track {
                scenario.initial_track = track;
                has_initial = true;
            }
            if let Some(requests) = file.requests {
                scenario.requests = requests;
                has_requests = true;
            }
            scenario.max_track = file.max_track.or(scenario.max_track);
            scenario.min_track = file.min_track.unwrap_or(scenario.min_track);
            scenario.direction = file.direction.unwrap_or(scenario.direction);
            scenario.time_per_track = file.time_per_track.unwrap_or(scenario.time_per_track);
            scenario.time_per_request =
                file.time_per_request.unwrap_or(scenario.time_per_request);
            scenario.n_step = file.n_step.unwrap_or(scenario.n_step);
        }

        if let Some(track) = self.initial {
            scenario.initial_track = Track::new(track);
            has_initial = true;
        }
        if let Some(list) = &self.requests {
            scenario.requests = parse_request_list(list).context("Invalid --requests")?;
            has_requests = true;
        }
        if let Some(track) = self.max_track {
            scenario.max_track = Some(Track::new(track));
        }
        if let Some(track) = self.min_track {
            scenario.min_track = Track::new(track);
        }
        if let Some(direction) = self.direction {
            scenario.direction = direction;
        }
        if let Some(time) = self.time_per_track {
            scenario.time_per_track = time;
        }
        if let Some(time) = self.time_per_request {
            scenario.time_per_request = time;
        }
        if let Some(n_step) = self.n_step {
            scenario.n_step = n_step;
        }

        if !has_initial {
            anyhow::bail!("No initial head position. Pass --initial or set initialTrack in --file");
        }
        if !has_requests {
            anyhow::bail!("No requests. Pass --requests or set requests in --file");
        }

        Ok(scenario)
    }
}

/// Loads and validates the layered configuration for `project`.
pub fn load_config(project: &Path) -> Result<HeadsweepConfig> {
    ConfigLoader::new()
        .with_project_dir(project)
        .load()
        .context("Failed to load configuration")
}
