//! Buildchain - dependency-ordered builds for multi-project source trees
//!
//! Follows the assembly references declared in project files to find every
//! project a root project transitively depends on, orders them so each
//! dependency builds first, and drives an external build tool over that
//! order with checkpointed resume after failure.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Resolution and build logic
//! - [`infra`] - Infrastructure layer (filesystem, processes, tool discovery)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
