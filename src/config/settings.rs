//! Settings file management
//!
//! Reads optional defaults from `config.toml` in the config directory.
//! Every value can still be overridden on the command line; environment
//! variables sit between the two.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::error::ConfigError;
use crate::infra::dirs::BuildchainDirs;

/// Settings loaded from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Build invocation settings
    #[serde(default)]
    pub build: BuildSettings,

    /// Restore tool settings
    #[serde(default)]
    pub restore: RestoreSettings,

    /// Checkpoint settings
    #[serde(default)]
    pub checkpoint: CheckpointSettings,
}

/// Build invocation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Build program to invoke per project
    pub tool: Option<String>,

    /// Default arguments passed to the build program
    pub args: Option<String>,

    /// Name of the error marker file the build program writes on failure
    pub marker: Option<String>,
}

/// Restore tool settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestoreSettings {
    /// Path to the primary restore tool (managed projects)
    pub primary: Option<PathBuf>,

    /// Command line restoring every other project format
    pub alternate: Option<String>,
}

/// Checkpoint settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckpointSettings {
    /// Location of the resume file
    pub path: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the config directory
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the file exists but is not valid TOML.
    pub fn load(dirs: &BuildchainDirs) -> Result<Self, ConfigError> {
        Self::load_from_path(&dirs.config_path())
    }

    /// Load settings from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Effective build program
    #[must_use]
    pub fn build_tool(&self) -> &str {
        self.build
            .tool
            .as_deref()
            .unwrap_or(defaults::DEFAULT_BUILD_TOOL)
    }

    /// Effective error marker file name
    #[must_use]
    pub fn error_marker(&self) -> &str {
        self.build
            .marker
            .as_deref()
            .unwrap_or(defaults::DEFAULT_ERROR_MARKER)
    }

    /// Effective checkpoint path, resolved against `base` when relative
    #[must_use]
    pub fn checkpoint_path(&self, base: &Path) -> PathBuf {
        let path = self
            .checkpoint
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::DEFAULT_CHECKPOINT_FILE));
        if path.is_absolute() {
            path
        } else {
            base.join(path)
        }
    }
}
