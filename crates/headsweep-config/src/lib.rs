//! Configuration management for headsweep
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. CLI arguments (highest precedence)
//! 2. Environment variables (HSW_* prefix, `__` between section and key)
//! 3. headsweep.local.toml (gitignored, local overrides)
//! 4. headsweep.toml (git-tracked, project config)
//! 5. ~/.config/headsweep/config.toml (user defaults)
//! 6. Built-in defaults (lowest precedence)

use anyhow::Result;
use headsweep_types::{
    Algorithm, DEFAULT_MAX_TRACK, DEFAULT_MIN_TRACK, DEFAULT_N_STEP, DEFAULT_TIME_PER_TRACK,
    Direction, Scenario,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::{LOCAL_CONFIG_FILE, Layer, PROJECT_CONFIG_FILE, Paths, USER_CONFIG_FILE};

/// Main headsweep configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadsweepConfig {
    pub geometry: GeometryConfig,
    pub timing: TimingConfig,
    pub scheduler: SchedulerConfig,
    pub output: OutputConfig,
    pub simulation: SimulationConfig,
}

/// Track domain bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub min_track: i64,
    pub max_track: i64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            min_track: DEFAULT_MIN_TRACK,
            max_track: DEFAULT_MAX_TRACK,
        }
    }
}

/// Simulated cost model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub time_per_track: f64,
    pub time_per_request: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            time_per_track: DEFAULT_TIME_PER_TRACK,
            time_per_request: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Algorithm used by `run` when none is given.
    pub algorithm: Algorithm,
    pub direction: Direction,
    pub n_step: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Look,
            direction: Direction::Asc,
            n_step: DEFAULT_N_STEP,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Print the BLAKE3 trace fingerprint after each run.
    pub fingerprint: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub iterations: u64,
    pub max_requests: usize,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            max_requests: 20,
            seed: 0,
        }
    }
}

impl HeadsweepConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Parse a single TOML file, without layering.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render as TOML, suitable for `headsweep.toml`.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check values the simulator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.geometry.max_track <= self.geometry.min_track {
            return Err(ConfigError::ValidationError(format!(
                "geometry.max_track ({}) must be greater than geometry.min_track ({})",
                self.geometry.max_track, self.geometry.min_track
            )));
        }

        for (name, value) in [
            ("timing.time_per_track", self.timing.time_per_track),
            ("timing.time_per_request", self.timing.time_per_request),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be a finite, non-negative number, got {value}"
                )));
            }
        }

        if self.scheduler.n_step == 0 {
            return Err(ConfigError::ValidationError(
                "scheduler.n_step must be at least 1".to_string(),
            ));
        }

        if self.simulation.iterations == 0 {
            return Err(ConfigError::ValidationError(
                "simulation.iterations must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// A request-less scenario carrying the configured defaults.
    pub fn scenario_defaults(&self) -> Scenario {
        Scenario::default()
            .with_min_track(self.geometry.min_track)
            .with_max_track(self.geometry.max_track)
            .with_direction(self.scheduler.direction)
            .with_time_per_track(self.timing.time_per_track)
            .with_time_per_request(self.timing.time_per_request)
            .with_n_step(self.scheduler.n_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headsweep_types::Track;

    #[test]
    fn test_default_config() {
        let config = HeadsweepConfig::default();
        assert_eq!(config.geometry.max_track, 999);
        assert_eq!(config.scheduler.algorithm, Algorithm::Look);
        assert_eq!(config.scheduler.n_step, 2);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scenario_defaults() {
        let mut config = HeadsweepConfig::default();
        config.geometry.max_track = 199;
        config.scheduler.direction = Direction::Desc;
        config.timing.time_per_request = 2.5;

        let scenario = config.scenario_defaults();
        assert_eq!(scenario.max_track, Some(Track::new(199)));
        assert_eq!(scenario.direction, Direction::Desc);
        assert!((scenario.time_per_request - 2.5).abs() < f64::EPSILON);
        assert!(scenario.requests.is_empty());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = HeadsweepConfig::default();
        config.geometry.max_track = config.geometry.min_track;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = HeadsweepConfig::default();
        config.timing.time_per_track = -1.0;
        assert!(config.validate().is_err());

        let mut config = HeadsweepConfig::default();
        config.scheduler.n_step = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = HeadsweepConfig::default();
        config.scheduler.algorithm = Algorithm::CScan;
        config.output.fingerprint = true;

        let rendered = config.to_toml_string().unwrap();
        assert!(rendered.contains("algorithm = \"C-SCAN\""));

        let parsed: HeadsweepConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
