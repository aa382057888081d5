//! Infrastructure layer
//!
//! Handles filesystem access, tool discovery and external processes.

pub mod dirs;
pub mod filesystem;
pub mod process;
pub mod toolchain;
pub mod workdir;
