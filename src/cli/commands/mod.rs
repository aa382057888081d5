//! CLI command implementations
//!
//! - [`plan`] - `--dry-run`: save and print the build order
//! - [`build`] - build the order, fresh or resumed

pub mod build;
pub mod plan;
