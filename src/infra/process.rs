//! External process invocation
//!
//! Build and restore tools are opaque programs. They are run synchronously
//! with inherited stdio; the caller decides what their outcome means.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ToolError;

/// A single external tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path
    pub program: String,
    /// Arguments passed verbatim
    pub args: Vec<String>,
    /// Directory the program runs in
    pub cwd: PathBuf,
}

impl Invocation {
    /// Create an invocation of `program` in `cwd`
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    /// Append arguments
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Render as a single line for logs
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How an external tool exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolOutcome {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
}

impl ToolOutcome {
    /// Whether the tool exited with status zero
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external tools
pub trait ToolRunner {
    /// Run `invocation` to completion
    fn run(&mut self, invocation: &Invocation) -> Result<ToolOutcome, ToolError>;
}

/// [`ToolRunner`] backed by real child processes
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<ToolOutcome, ToolError> {
        tracing::debug!(
            "Running `{}` in {}",
            invocation.display(),
            invocation.cwd.display()
        );

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .status()
            .map_err(|e| ToolError::Spawn {
                program: invocation.program.clone(),
                error: e.to_string(),
            })?;

        Ok(ToolOutcome {
            code: status.code(),
        })
    }
}

/// Split a command line into program arguments using shell quoting rules
pub fn split_command_line(line: &str) -> Result<Vec<String>, ToolError> {
    shell_words::split(line).map_err(|e| ToolError::InvalidCommandLine {
        command: line.to_string(),
        error: e.to_string(),
    })
}
