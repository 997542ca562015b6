use serde::{Deserialize, Serialize};
use shellscout_platform::{AppPaths, AppPathsError};
use shellscout_profiles::ProfilesConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Paths(#[from] AppPathsError),

    #[error("Failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,

    #[serde(default)]
    pub quick_launch_only: bool,

    /// Folder substituted for `${workspaceFolder}` in profile paths.
    #[serde(default)]
    pub workspace_folder: Option<PathBuf>,

    #[serde(default)]
    pub profiles: ProfilesConfig,
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
            quick_launch_only: false,
            workspace_folder: None,
            profiles: ProfilesConfig::default(),
        }
    }
}

impl AppSettings {
    /// Load the user's settings file, falling back to defaults when it does
    /// not exist yet.
    pub fn load() -> Result<Self, SettingsError> {
        let paths = AppPaths::new()?;
        Self::load_from(&paths.settings_file())
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
