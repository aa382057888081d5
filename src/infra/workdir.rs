//! Scoped working directory
//!
//! The build loop runs every external tool from the directory of the project
//! being built. Instead of mutating the process-wide working directory, the
//! executor threads a [`DirContext`] through the loop: entering a project
//! yields a [`DirScope`] guard whose drop restores the origin, whether the
//! iteration succeeded or bailed out with `?`.

use std::path::{Path, PathBuf};

use crate::error::BuildError;

/// Working directory context for external tool invocations
#[derive(Debug, Clone)]
pub struct DirContext {
    origin: PathBuf,
    current: PathBuf,
}

impl DirContext {
    /// Create a context rooted at `origin`
    pub fn new(origin: PathBuf) -> Self {
        Self {
            current: origin.clone(),
            origin,
        }
    }

    /// Create a context rooted at the process working directory
    pub fn from_process() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Directory tools are currently run from
    pub fn current(&self) -> &Path {
        &self.current
    }

    /// Directory the context returns to between projects
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Enter `dir` for the lifetime of the returned guard
    pub fn enter(&mut self, dir: &Path) -> Result<DirScope<'_>, BuildError> {
        if !dir.is_dir() {
            return Err(BuildError::MissingDirectory {
                path: dir.to_path_buf(),
            });
        }
        tracing::trace!("Entering {}", dir.display());
        self.current = dir.to_path_buf();
        Ok(DirScope { context: self })
    }
}

/// Guard returned by [`DirContext::enter`]
#[derive(Debug)]
pub struct DirScope<'a> {
    context: &'a mut DirContext,
}

impl DirScope<'_> {
    /// The scoped directory
    pub fn path(&self) -> &Path {
        &self.context.current
    }
}

impl Drop for DirScope<'_> {
    fn drop(&mut self) {
        tracing::trace!("Leaving {}", self.context.current.display());
        self.context.current = self.context.origin.clone();
    }
}
