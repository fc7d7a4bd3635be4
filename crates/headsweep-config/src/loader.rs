//! Layered configuration loading.
//!
//! Built-in defaults, then the user, project and local TOML files that
//! exist, then `HSW_*` environment variables. The merged result is
//! validated before it is returned.

use crate::{HeadsweepConfig, Layer, Paths};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    include_user_config: bool,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "HSW".to_string(),
            include_user_config: true,
        }
    }

    /// Set the project directory
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix (default: "HSW")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Skip ~/.config/headsweep/config.toml
    pub fn without_user_config(mut self) -> Self {
        self.include_user_config = false;
        self
    }

    /// Layer files that exist, lowest precedence first.
    pub fn layer_files(&self) -> Vec<(Layer, PathBuf)> {
        let paths = Paths::new();
        Layer::ALL
            .into_iter()
            .filter(|&layer| layer != Layer::User || self.include_user_config)
            .filter_map(|layer| Some((layer, paths.layer_file(layer, &self.project_dir)?)))
            .filter(|(_, file)| file.is_file())
            .collect()
    }

    /// Merge every source and validate the result.
    pub fn load(self) -> Result<HeadsweepConfig> {
        let defaults = config::Config::try_from(&HeadsweepConfig::default())?;
        let mut builder = config::Config::builder().add_source(defaults);

        for (layer, file) in self.layer_files() {
            debug!(layer = layer.as_str(), path = %file.display(), "config layer");
            builder = builder.add_source(config::File::from(file).format(config::FileFormat::Toml));
        }

        // HSW_SCHEDULER__N_STEP=4
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: HeadsweepConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headsweep_types::{Algorithm, Direction};
    use std::fs;
    use tempfile::tempdir;

    fn loader(dir: &Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_project_dir(dir)
            .without_user_config()
            .with_env_prefix("HSW_LOADER_TEST_UNSET")
    }

    #[test]
    fn test_load_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = loader(temp_dir.path()).load().expect("Failed to load config");

        assert_eq!(config, HeadsweepConfig::default());
    }

    #[test]
    fn test_load_project_config() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        let config_content = r#"
[geometry]
max_track = 199

[timing]
time_per_track = 5

[scheduler]
algorithm = "C-LOOK"
direction = "desc"
n_step = 4
"#;
        fs::write(project_dir.join("headsweep.toml"), config_content)
            .expect("Failed to write config");

        let config = loader(project_dir).load().expect("Failed to load config");

        assert_eq!(config.geometry.max_track, 199);
        assert_eq!(config.geometry.min_track, 0);
        assert!((config.timing.time_per_track - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.scheduler.algorithm, Algorithm::CLook);
        assert_eq!(config.scheduler.direction, Direction::Desc);
        assert_eq!(config.scheduler.n_step, 4);
    }

    #[test]
    fn test_local_overrides() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("headsweep.toml"),
            r"
[scheduler]
n_step = 3
",
        )
        .expect("Failed to write project config");

        fs::write(
            project_dir.join("headsweep.local.toml"),
            r"
[scheduler]
n_step = 6
",
        )
        .expect("Failed to write local config");

        let config = loader(project_dir).load().expect("Failed to load config");

        // Local config should override project config
        assert_eq!(config.scheduler.n_step, 6);
    }

    #[test]
    fn test_malformed_project_config_is_an_error() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("headsweep.toml"), "[geometry\nmax_track = ")
            .expect("Failed to write config");

        assert!(loader(temp_dir.path()).load().is_err());
    }

    #[test]
    fn test_merged_config_is_validated() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        // Each file is fine alone; together the domain is inverted.
        fs::write(project_dir.join("headsweep.toml"), "[geometry]\nmin_track = 50\n")
            .expect("Failed to write project config");
        fs::write(project_dir.join("headsweep.local.toml"), "[geometry]\nmax_track = 10\n")
            .expect("Failed to write local config");

        let err = loader(project_dir).load().unwrap_err();
        assert!(format!("{err:#}").contains("max_track"));
    }

    #[test]
    fn test_layer_files_skip_missing_and_user() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();
        assert!(loader(project_dir).layer_files().is_empty());

        fs::write(project_dir.join("headsweep.local.toml"), "").expect("Failed to write");
        let layers = loader(project_dir).layer_files();
        assert_eq!(layers, vec![(Layer::Local, project_dir.join("headsweep.local.toml"))]);
    }
}
