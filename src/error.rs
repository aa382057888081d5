//! Error types for buildchain
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a project file
#[derive(Error, Debug)]
pub enum ProjectError {
    /// Failed to read the project file
    #[error("Failed to read project '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Project file is not a well-formed document
    #[error("Failed to parse project '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// File extension is not a known project format
    #[error("Not a recognised project file: {path}")]
    UnknownFormat { path: PathBuf },
}

/// Checkpoint (resume file) errors
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// Resume requested but there is nothing to resume from
    #[error("No checkpoint file found at '{path}'. Run without --resume first.")]
    NotFound { path: PathBuf },

    /// Failed to read the checkpoint file
    #[error("Failed to read checkpoint '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Failed to write the checkpoint file
    #[error("Failed to write checkpoint '{path}': {error}")]
    Write { path: PathBuf, error: String },

    /// Failed to delete the checkpoint file
    #[error("Failed to remove checkpoint '{path}': {error}")]
    Remove { path: PathBuf, error: String },
}

/// External tool errors
#[derive(Error, Debug)]
pub enum ToolError {
    /// Restore was requested but the restore tool is nowhere to be found
    #[error("Restore tool '{tool}' not found. Set {env} or add it to PATH")]
    RestoreToolNotFound { tool: String, env: String },

    /// A command line could not be split into arguments
    #[error("Invalid command line '{command}': {error}")]
    InvalidCommandLine { command: String, error: String },

    /// The process could not be started
    #[error("Failed to run '{program}': {error}")]
    Spawn { program: String, error: String },
}

/// Build execution errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// The build probe reported a failure for a project
    #[error("Build failed for '{project}' ({remaining} project(s) saved for --resume)")]
    ProjectFailed { project: PathBuf, remaining: usize },

    /// The restore step for a project could not run
    #[error("Restore failed for '{project}': {error}")]
    RestoreFailed { project: PathBuf, error: String },

    /// Project directory cannot be entered
    #[error("Project directory '{path}' does not exist")]
    MissingDirectory { path: PathBuf },

    /// External tool error while building a project
    #[error("Build of '{project}' aborted: {source}")]
    Tool {
        project: PathBuf,
        #[source]
        source: ToolError,
    },
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: PathBuf, error: String },
}

/// Top-level buildchain error type
#[derive(Error, Debug)]
pub enum BuildchainError {
    /// Project error
    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    /// Checkpoint error
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// Tool error
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Build error
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Config error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
