//! Build command implementation
//!
//! Runs the external build tool over a build order with the configured
//! probe and optional restore step.

use anyhow::{Context, Result};
use indicatif::ProgressBar;

use crate::cli::output::{create_build_bar, status, OutputConfig};
use crate::cli::ProbeKind;
use crate::core::builder::{
    BuildCommand, BuildExecutor, BuildProbe, ExitStatusProbe, MarkerFileProbe,
};
use crate::core::checkpoint::CheckpointStore;
use crate::core::order::BuildOrder;
use crate::infra::process::ProcessRunner;
use crate::infra::toolchain::RestoreTools;
use crate::infra::workdir::DirContext;

/// Build options
#[derive(Debug)]
pub struct BuildOptions {
    /// Build program
    pub tool: String,
    /// Arguments for the build program
    pub args: Vec<String>,
    /// Failure detection
    pub probe: ProbeKind,
    /// Marker file name for [`ProbeKind::Marker`]
    pub marker: String,
    /// Restore tools, when `--restore` was given
    pub restore: Option<RestoreTools>,
}

/// Execute the build
pub fn execute(
    order: &BuildOrder,
    checkpoint: CheckpointStore,
    options: BuildOptions,
    output: &OutputConfig,
) -> Result<()> {
    let dirs = DirContext::from_process().context("Failed to determine the current directory")?;
    let probe: Box<dyn BuildProbe> = match options.probe {
        ProbeKind::Marker => Box::new(MarkerFileProbe::new(options.marker)),
        ProbeKind::ExitCode => Box::new(ExitStatusProbe),
    };
    let bar = if output.interactive() {
        create_build_bar(order.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    tracing::info!(
        "Building {} project(s) with `{}`",
        order.len(),
        std::iter::once(options.tool.as_str())
            .chain(options.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    );

    let mut executor = BuildExecutor::new(
        ProcessRunner,
        BuildCommand::new(options.tool, options.args),
        checkpoint,
        dirs,
    )
    .with_probe(probe)
    .with_progress(bar);
    if let Some(tools) = options.restore {
        executor = executor.with_restore(tools);
    }

    let report = executor.run(order)?;

    if output.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "built": report.built }))?
        );
    } else if output.interactive() {
        println!("{} Build complete!", status::SUCCESS);
        println!("  Projects built: {}", report.built.len());
    }
    Ok(())
}
