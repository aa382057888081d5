//! Checkpoint (resume file) handling
//!
//! The checkpoint records the part of a build order that has not been built
//! successfully yet: one project path per line, no header. It is written by
//! `--dry-run` and on build failure, read by `--resume`, and deleted once a
//! build completes.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::core::order::BuildOrder;
use crate::error::CheckpointError;
use crate::infra::filesystem;

/// Persisted remainder of a build order
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    /// Store backed by the file at `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the checkpoint file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a checkpoint file is present
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Overwrite the checkpoint with `order`
    pub fn save(&self, order: &BuildOrder) -> Result<(), CheckpointError> {
        let mut content = String::new();
        for project in order {
            content.push_str(&project.to_string_lossy());
            content.push('\n');
        }
        filesystem::write_file(&self.path, &content)?;
        tracing::info!(
            "Saved {} project(s) to checkpoint {}",
            order.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Read the checkpoint, if present
    ///
    /// Environment references in each line are expanded and blank lines are
    /// skipped.
    pub fn load(&self) -> Result<Option<BuildOrder>, CheckpointError> {
        if !self.exists() {
            return Ok(None);
        }

        let content = filesystem::read_file(&self.path)?;
        let projects: Vec<PathBuf> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| PathBuf::from(expand_env(line)))
            .collect();

        tracing::info!(
            "Loaded {} project(s) from checkpoint {}",
            projects.len(),
            self.path.display()
        );
        Ok(Some(BuildOrder::new(projects)))
    }

    /// Read the checkpoint, failing if there is none
    pub fn load_required(&self) -> Result<BuildOrder, CheckpointError> {
        self.load()?.ok_or_else(|| CheckpointError::NotFound {
            path: self.path.clone(),
        })
    }

    /// Delete the checkpoint if present
    pub fn clear(&self) -> Result<(), CheckpointError> {
        filesystem::remove_file(&self.path)?;
        tracing::debug!("Cleared checkpoint {}", self.path.display());
        Ok(())
    }
}

fn env_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"%([A-Za-z_][A-Za-z0-9_]*)%",
            r"|\$\{([A-Za-z_][A-Za-z0-9_]*)\}",
            r"|\$([A-Za-z_][A-Za-z0-9_]*)",
        ))
        .expect("environment pattern is valid")
    })
}

/// Expand `%NAME%`, `${NAME}` and `$NAME` from the process environment
///
/// Unset variables are left as written.
pub fn expand_env(line: &str) -> String {
    env_pattern()
        .replace_all(line, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map_or("", |m| m.as_str());
            std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
