//! Configuration management commands.

use std::path::Path;

use anyhow::{Context, Result};
use headsweep_config::{ConfigLoader, HeadsweepConfig, Paths};

use crate::style::{self, colors::SemanticStyle};

/// Show the effective configuration.
pub fn show(project: &Path, format: &str) -> Result<()> {
    let config = ConfigLoader::new()
        .with_project_dir(project)
        .load()
        .context("Failed to load configuration")?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        "toml" => {
            println!("{}", config.to_toml_string()?);
        }
        _ => {
            println!("{}", "headsweep Configuration".header());
            println!();

            style::print_section("Geometry:");
            style::print_labeled("Min track", &config.geometry.min_track.to_string());
            style::print_labeled("Max track", &config.geometry.max_track.to_string());
            println!();

            style::print_section("Timing:");
            style::print_labeled("Time per track", &config.timing.time_per_track.to_string());
            style::print_labeled(
                "Time per request",
                &config.timing.time_per_request.to_string(),
            );
            println!();

            style::print_section("Scheduler:");
            style::print_labeled("Algorithm", config.scheduler.algorithm.as_str());
            style::print_labeled("Direction", config.scheduler.direction.as_str());
            style::print_labeled("N-step", &config.scheduler.n_step.to_string());
            println!();

            style::print_section("Output:");
            style::print_labeled("Format", &format!("{:?}", config.output.format));
            style::print_labeled("Fingerprint", &config.output.fingerprint.to_string());
            println!();

            style::print_section("Simulation:");
            style::print_labeled("Iterations", &config.simulation.iterations.to_string());
            style::print_labeled("Max requests", &config.simulation.max_requests.to_string());
            style::print_labeled("Seed", &config.simulation.seed.to_string());

            if !Paths::is_initialized(project) {
                println!();
                style::print_hint("No headsweep.toml here; showing defaults and overrides");
            }
        }
    }

    Ok(())
}

/// Write a default headsweep.toml into the project directory.
pub fn init(project: &Path, force: bool) -> Result<()> {
    let path = Paths::project_config_file(project);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        );
    }

    let rendered = HeadsweepConfig::default().to_toml_string()?;
    std::fs::write(&path, rendered)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    style::print_success(&format!("Created {}", path.display().to_string().code()));
    Ok(())
}

/// Validate configuration files.
pub fn validate(project: &Path, file: Option<&Path>) -> Result<()> {
    let (config, source) = match file {
        Some(path) => (
            HeadsweepConfig::from_file(path)?,
            path.display().to_string(),
        ),
        None => (
            ConfigLoader::new()
                .with_project_dir(project)
                .load()
                .context("Failed to load configuration")?,
            project.display().to_string(),
        ),
    };

    println!("Validating configuration in {}...", source.code());

    match config.validate() {
        Ok(()) => {
            style::print_success("Configuration is valid");
            Ok(())
        }
        Err(e) => {
            style::print_error(&e.to_string());
            anyhow::bail!("Configuration is invalid")
        }
    }
}
