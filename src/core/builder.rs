//! Build execution
//!
//! Walks a build order one project at a time: optional restore, then the
//! external build command, then a probe decides whether the project failed.
//! The first failure stops the run and leaves the unbuilt remainder, failed
//! project included, in the checkpoint. A run that gets through everything
//! clears the checkpoint.

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;

use crate::core::checkpoint::CheckpointStore;
use crate::core::order::BuildOrder;
use crate::core::project::ProjectFormat;
use crate::error::{BuildError, BuildchainError};
use crate::infra::process::{Invocation, ToolOutcome, ToolRunner};
use crate::infra::toolchain::RestoreTools;
use crate::infra::workdir::DirContext;

/// Decides whether a build invocation failed
pub trait BuildProbe {
    /// Inspect the project directory and tool outcome after a build
    fn failed(&self, project_dir: &Path, outcome: &ToolOutcome) -> bool;
}

/// Fails when the build tool left an error marker file behind
///
/// The exit status is ignored; the marker is the build tool's own
/// convention for reporting errors.
#[derive(Debug, Clone)]
pub struct MarkerFileProbe {
    marker: String,
}

impl MarkerFileProbe {
    /// Probe for a marker file called `marker`
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl BuildProbe for MarkerFileProbe {
    fn failed(&self, project_dir: &Path, _outcome: &ToolOutcome) -> bool {
        let marker = project_dir.join(&self.marker);
        let failed = marker.exists();
        if failed {
            tracing::error!("Build errors reported in {}", marker.display());
        }
        failed
    }
}

/// Fails when the build tool exits with a non-zero status
#[derive(Debug, Clone, Copy, Default)]
pub struct ExitStatusProbe;

impl BuildProbe for ExitStatusProbe {
    fn failed(&self, project_dir: &Path, outcome: &ToolOutcome) -> bool {
        let failed = !outcome.success();
        if failed {
            tracing::error!(
                "Build tool exited with {:?} in {}",
                outcome.code,
                project_dir.display()
            );
        }
        failed
    }
}

/// External build command run in every project directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    /// Program to run
    pub program: String,
    /// Arguments passed on every invocation
    pub args: Vec<String>,
}

impl BuildCommand {
    /// Create a build command
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Projects built, in order
    pub built: Vec<PathBuf>,
}

/// Sequential build driver
pub struct BuildExecutor<R: ToolRunner> {
    runner: R,
    probe: Box<dyn BuildProbe>,
    command: BuildCommand,
    restore: Option<RestoreTools>,
    checkpoint: CheckpointStore,
    dirs: DirContext,
    progress: ProgressBar,
}

impl<R: ToolRunner> BuildExecutor<R> {
    /// Create an executor using the marker-file probe with its default name
    pub fn new(
        runner: R,
        command: BuildCommand,
        checkpoint: CheckpointStore,
        dirs: DirContext,
    ) -> Self {
        Self {
            runner,
            probe: Box::new(MarkerFileProbe::new(
                crate::config::defaults::DEFAULT_ERROR_MARKER,
            )),
            command,
            restore: None,
            checkpoint,
            dirs,
            progress: ProgressBar::hidden(),
        }
    }

    /// Use a different failure probe
    #[must_use]
    pub fn with_probe(mut self, probe: Box<dyn BuildProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Run a restore step before each build
    #[must_use]
    pub fn with_restore(mut self, tools: RestoreTools) -> Self {
        self.restore = Some(tools);
        self
    }

    /// Report progress on `bar`
    #[must_use]
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = bar;
        self
    }

    /// The tool runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// The directory context
    pub fn dirs(&self) -> &DirContext {
        &self.dirs
    }

    /// Build every project in `order`
    ///
    /// # Errors
    ///
    /// On the first failing project the remainder of `order`, starting at
    /// that project, is saved to the checkpoint and
    /// `BuildError::ProjectFailed` (or the tool error that stopped the
    /// project) is returned. No later project is attempted.
    pub fn run(&mut self, order: &BuildOrder) -> Result<BuildReport, BuildchainError> {
        let mut report = BuildReport::default();
        self.progress.set_length(order.len() as u64);

        for (index, project) in order.iter().enumerate() {
            let name = project.file_name().map_or_else(
                || project.display().to_string(),
                |n| n.to_string_lossy().into_owned(),
            );
            self.progress.set_message(name);
            tracing::info!("[{}/{}] Building {}", index + 1, order.len(), project.display());

            let result = self.build_project(project);
            let failure = match result {
                Ok(true) => None,
                Ok(false) => Some(BuildError::ProjectFailed {
                    project: project.clone(),
                    remaining: order.len() - index,
                }),
                Err(e) => Some(e),
            };

            if let Some(error) = failure {
                self.progress.abandon();
                self.checkpoint.save(&order.suffix_from(index))?;
                return Err(error.into());
            }

            report.built.push(project.clone());
            self.progress.inc(1);
        }

        self.progress.finish_and_clear();
        self.checkpoint.clear()?;
        tracing::info!("Built {} project(s)", report.built.len());
        Ok(report)
    }

    /// Build one project; `Ok(false)` means the probe reported a failure
    fn build_project(&mut self, project: &Path) -> Result<bool, BuildError> {
        // A bare file name lives in the directory the run started from.
        let dir = match project.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => self.dirs.origin().to_path_buf(),
        };
        let scope = self.dirs.enter(&dir)?;

        if let Some(tools) = &self.restore {
            restore_project(&mut self.runner, tools, project, scope.path())?;
        }

        let invocation = Invocation::new(self.command.program.as_str(), scope.path())
            .with_args(self.command.args.iter().cloned());
        let outcome = self
            .runner
            .run(&invocation)
            .map_err(|source| BuildError::Tool {
                project: project.to_path_buf(),
                source,
            })?;
        tracing::debug!("Build tool exited with {:?}", outcome.code);

        Ok(!self.probe.failed(scope.path(), &outcome))
    }
}

/// Run the restore tool matching the project's format
fn restore_project<R: ToolRunner>(
    runner: &mut R,
    tools: &RestoreTools,
    project: &Path,
    cwd: &Path,
) -> Result<(), BuildError> {
    let invocation = match ProjectFormat::from_path(project) {
        Some(ProjectFormat::Managed) => {
            Invocation::new(tools.primary().to_string_lossy(), cwd).with_args([
                "restore".to_string(),
                project.to_string_lossy().into_owned(),
            ])
        }
        _ => match tools.alternate() {
            Some([program, args @ ..]) => {
                Invocation::new(program.as_str(), cwd).with_args(args.iter().cloned())
            }
            _ => {
                tracing::warn!(
                    "No alternate restore command configured; skipping restore of {}",
                    project.display()
                );
                return Ok(());
            }
        },
    };

    tracing::info!("Restoring {}", project.display());
    let outcome = runner
        .run(&invocation)
        .map_err(|e| BuildError::RestoreFailed {
            project: project.to_path_buf(),
            error: e.to_string(),
        })?;
    if !outcome.success() {
        tracing::warn!(
            "Restore of {} exited with {:?}; building anyway",
            project.display(),
            outcome.code
        );
    }
    Ok(())
}
