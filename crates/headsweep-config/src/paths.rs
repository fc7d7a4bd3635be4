//! Where headsweep looks for configuration files.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Name of the git-tracked project config file.
pub const PROJECT_CONFIG_FILE: &str = "headsweep.toml";

/// Name of the gitignored local override file.
pub const LOCAL_CONFIG_FILE: &str = "headsweep.local.toml";

/// Name of the per-user config file inside the user config directory.
pub const USER_CONFIG_FILE: &str = "config.toml";

/// A TOML file in the configuration stack.
///
/// [`Layer::ALL`] lists them lowest precedence first; environment variables
/// sit above all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// `~/.config/headsweep/config.toml`
    User,
    /// `headsweep.toml` in the project directory.
    Project,
    /// `headsweep.local.toml` in the project directory.
    Local,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::User, Layer::Project, Layer::Local];

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::User => "user",
            Layer::Project => "project",
            Layer::Local => "local",
        }
    }
}

/// Resolves layer files for a project.
pub struct Paths {
    user_dir: Option<PathBuf>,
}

impl Paths {
    pub fn new() -> Self {
        Self {
            user_dir: ProjectDirs::from("dev", "headsweep", "headsweep")
                .map(|dirs| dirs.config_dir().to_path_buf()),
        }
    }

    /// `None` when the platform has no home directory.
    pub fn user_config_file(&self) -> Option<PathBuf> {
        self.user_dir.as_ref().map(|dir| dir.join(USER_CONFIG_FILE))
    }

    pub fn project_config_file(project_dir: impl AsRef<Path>) -> PathBuf {
        project_dir.as_ref().join(PROJECT_CONFIG_FILE)
    }

    pub fn local_config_file(project_dir: impl AsRef<Path>) -> PathBuf {
        project_dir.as_ref().join(LOCAL_CONFIG_FILE)
    }

    /// Check if a project is initialized (has headsweep.toml)
    pub fn is_initialized(project_dir: impl AsRef<Path>) -> bool {
        Self::project_config_file(project_dir).exists()
    }

    /// Location of `layer` for `project_dir`, whether or not it exists.
    pub fn layer_file(&self, layer: Layer, project_dir: impl AsRef<Path>) -> Option<PathBuf> {
        match layer {
            Layer::User => self.user_config_file(),
            Layer::Project => Some(Self::project_config_file(project_dir)),
            Layer::Local => Some(Self::local_config_file(project_dir)),
        }
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}
