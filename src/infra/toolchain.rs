//! Restore tool discovery
//!
//! Locates the primary restore tool for managed projects and the alternate
//! restore command used for every other project format.

use std::path::{Path, PathBuf};

use crate::config::defaults::DEFAULT_RESTORE_TOOL;
use crate::config::env::{ALT_RESTORE_COMMAND, RESTORE_TOOL};
use crate::config::settings::RestoreSettings;
use crate::error::ToolError;
use crate::infra::process::split_command_line;

/// Restore tools available for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreTools {
    /// Primary restore tool (managed projects)
    primary: PathBuf,
    /// Alternate restore command line, already split into words
    alternate: Option<Vec<String>>,
}

impl RestoreTools {
    /// Create from explicit values
    pub fn new(primary: PathBuf, alternate: Option<Vec<String>>) -> Self {
        Self { primary, alternate }
    }

    /// Locate the restore tools
    ///
    /// The primary tool comes from `BUILDCHAIN_NUGET_PATH`, then the settings
    /// file, then `PATH`. The alternate command comes from
    /// `BUILDCHAIN_ALT_RESTORE`, then the settings file, and may be absent.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::RestoreToolNotFound` when no primary tool exists.
    pub fn locate(settings: &RestoreSettings) -> Result<Self, ToolError> {
        let primary = std::env::var_os(RESTORE_TOOL)
            .map(PathBuf::from)
            .or_else(|| settings.primary.clone())
            .map_or_else(
                || which::which(DEFAULT_RESTORE_TOOL).ok(),
                |p| usable_tool(&p).then_some(p),
            )
            .ok_or_else(|| ToolError::RestoreToolNotFound {
                tool: DEFAULT_RESTORE_TOOL.to_string(),
                env: RESTORE_TOOL.to_string(),
            })?;

        let alternate = match std::env::var(ALT_RESTORE_COMMAND)
            .ok()
            .or_else(|| settings.alternate.clone())
            .filter(|line| !line.trim().is_empty())
        {
            Some(line) => Some(split_command_line(&line)?),
            None => None,
        };

        tracing::debug!("Primary restore tool: {}", primary.display());
        Ok(Self { primary, alternate })
    }

    /// Path to the primary restore tool
    pub fn primary(&self) -> &Path {
        &self.primary
    }

    /// Alternate restore command words, if configured
    pub fn alternate(&self) -> Option<&[String]> {
        self.alternate.as_deref()
    }
}

/// A configured tool path is usable if it exists or resolves on PATH
fn usable_tool(path: &Path) -> bool {
    path.is_file() || which::which(path).is_ok()
}
