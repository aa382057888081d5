//! Dry-run implementation
//!
//! Saves the computed build order as the checkpoint so a later `--resume`
//! builds exactly this order, and prints it.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{status, OutputConfig};
use crate::core::checkpoint::CheckpointStore;
use crate::core::order::BuildOrder;

/// JSON shape printed under `--json`
#[derive(Debug, Serialize)]
struct PlanOutput<'a> {
    projects: &'a BuildOrder,
    checkpoint: &'a Path,
}

/// Execute a dry run
pub fn execute(
    order: &BuildOrder,
    checkpoint: &CheckpointStore,
    output: &OutputConfig,
) -> Result<()> {
    checkpoint.save(order)?;

    if output.json {
        let plan = PlanOutput {
            projects: order,
            checkpoint: checkpoint.path(),
        };
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    for project in order {
        println!("{}", project.display());
    }
    if output.interactive() {
        eprintln!(
            "{} {} project(s) saved to {}; run with --resume to build them",
            status::SUCCESS,
            order.len(),
            checkpoint.path().display()
        );
    }
    Ok(())
}
