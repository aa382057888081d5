//! Buildchain CLI
//!
//! Entry point for the buildchain command-line application.

use anyhow::Result;
use clap::Parser;

use buildchain::cli::output::{display_error, OutputConfig};
use buildchain::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let output_config = OutputConfig::new(cli.quiet, cli.json, cli.verbose);
    output_config.init_tracing();

    match cli.run(&output_config) {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
