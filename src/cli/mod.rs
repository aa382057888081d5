//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no resolution or build logic - that belongs in the
//! [`crate::core`] module.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::config::settings::Settings;
use crate::core::checkpoint::CheckpointStore;
use crate::core::graph::resolve_build_order;
use crate::core::order::BuildOrder;
use crate::infra::dirs::BuildchainDirs;
use crate::infra::process::split_command_line;
use crate::infra::toolchain::RestoreTools;
use output::OutputConfig;

/// How a failed project build is detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProbeKind {
    /// The build tool left an error marker file in the project directory
    Marker,
    /// The build tool exited with a non-zero status
    ExitCode,
}

/// Version line with build metadata, for `--version`
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nbuilt:  ",
    env!("VERGEN_BUILD_TIMESTAMP"),
    "\ntarget: ",
    env!("VERGEN_CARGO_TARGET_TRIPLE"),
    "\nrustc:  ",
    env!("VERGEN_RUSTC_SEMVER"),
);

/// Buildchain - build a project and everything it depends on, in order
///
/// Follows the assembly references in PROJECT, finds the projects producing
/// them under ROOTS, and builds each one before anything that needs it.
#[derive(Parser, Debug)]
#[command(name = "buildchain")]
#[command(author, version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Cli {
    /// Root project file
    #[arg(required_unless_present = "resume")]
    pub project: Option<PathBuf>,

    /// Directories searched for dependency projects
    #[arg(required_unless_present = "resume")]
    pub roots: Vec<PathBuf>,

    /// Only follow references containing this text (case-insensitive)
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Compute the build order and save it without building
    #[arg(long, conflicts_with = "resume")]
    pub dry_run: bool,

    /// Continue from the saved checkpoint instead of resolving again
    #[arg(long)]
    pub resume: bool,

    /// Restore packages for each project before building it
    #[arg(long)]
    pub restore: bool,

    /// Arguments passed to the build tool, split with shell quoting rules
    #[arg(long, allow_hyphen_values = true, value_name = "ARGS")]
    pub build_args: Option<String>,

    /// Checkpoint file location
    #[arg(long, value_name = "PATH")]
    pub checkpoint: Option<PathBuf>,

    /// Build program run in each project directory
    #[arg(long, value_name = "PROGRAM")]
    pub build_tool: Option<String>,

    /// How build failures are detected
    #[arg(long, value_enum, default_value_t = ProbeKind::Marker)]
    pub probe: ProbeKind,

    /// Enable verbose output (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self, output: &OutputConfig) -> Result<()> {
        let dirs = BuildchainDirs::new();
        let settings = Settings::load(&dirs)?;

        let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
        let checkpoint = CheckpointStore::new(
            self.checkpoint
                .clone()
                .unwrap_or_else(|| settings.checkpoint_path(&cwd)),
        );

        let restore = if self.restore {
            Some(RestoreTools::locate(&settings.restore)?)
        } else {
            None
        };

        let order = self.build_order(&checkpoint)?;

        if self.dry_run {
            return commands::plan::execute(&order, &checkpoint, output);
        }

        let args_line = self
            .build_args
            .as_deref()
            .or(settings.build.args.as_deref())
            .unwrap_or_default();
        let options = commands::build::BuildOptions {
            tool: self
                .build_tool
                .clone()
                .unwrap_or_else(|| settings.build_tool().to_string()),
            args: split_command_line(args_line)?,
            probe: self.probe,
            marker: settings.error_marker().to_string(),
            restore,
        };

        commands::build::execute(&order, checkpoint, options, output)
    }

    /// Load the order from the checkpoint or resolve it from the project
    fn build_order(&self, checkpoint: &CheckpointStore) -> Result<BuildOrder> {
        if self.resume {
            if self.project.is_some() || !self.roots.is_empty() {
                tracing::warn!(
                    "--resume builds the saved checkpoint; PROJECT and ROOTS are ignored"
                );
            }
            return Ok(checkpoint.load_required()?);
        }

        let project = self
            .project
            .as_deref()
            .context("A project file is required unless --resume is given")?;
        let order = resolve_build_order(project, &self.roots, self.keyword.as_deref())?;
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_project_and_roots_required_without_resume() {
        assert!(Cli::try_parse_from(["buildchain"]).is_err());
        assert!(Cli::try_parse_from(["buildchain", "App.csproj"]).is_err());

        let cli = Cli::try_parse_from(["buildchain", "App.csproj", "src", "lib"]).unwrap();
        assert_eq!(cli.project, Some(PathBuf::from("App.csproj")));
        assert_eq!(cli.roots, [PathBuf::from("src"), PathBuf::from("lib")]);
        assert_eq!(cli.probe, ProbeKind::Marker);
    }

    #[test]
    fn test_resume_needs_no_positionals() {
        let cli = Cli::try_parse_from(["buildchain", "--resume"]).unwrap();
        assert!(cli.resume);
        assert!(cli.project.is_none());
    }

    #[test]
    fn test_dry_run_conflicts_with_resume() {
        let result = Cli::try_parse_from(["buildchain", "--resume", "--dry-run"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_args_accept_leading_hyphen() {
        let cli = Cli::try_parse_from([
            "buildchain",
            "App.csproj",
            "src",
            "--build-args",
            "-c -Z",
            "--probe",
            "exit-code",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.build_args.as_deref(), Some("-c -Z"));
        assert_eq!(cli.probe, ProbeKind::ExitCode);
        assert_eq!(cli.verbose, 2);
    }
}
