//! Platform-specific directory management
//!
//! Locates the directory holding `config.toml`. The platform config
//! directory is used unless `BUILDCHAIN_CONFIG_DIR` overrides it.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::env::CONFIG_DIR;

/// Application name used in directory paths
const APP_NAME: &str = "buildchain";

/// Settings file name inside the config directory
const CONFIG_FILE: &str = "config.toml";

/// Platform-specific directory provider for buildchain
#[derive(Debug, Clone)]
pub struct BuildchainDirs {
    config_dir: PathBuf,
}

impl BuildchainDirs {
    /// Create a new `BuildchainDirs` instance
    ///
    /// Checks the environment first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Use an explicit config directory
    #[must_use]
    pub fn with_config_dir(path: &Path) -> Self {
        Self {
            config_dir: path.to_path_buf(),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/buildchain` or `~/.config/buildchain`
    /// - macOS: `~/Library/Application Support/buildchain`
    /// - Windows: `%APPDATA%\buildchain`
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the settings file path
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_DIR) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for BuildchainDirs {
    fn default() -> Self {
        Self::new()
    }
}
