//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary source tree and runs the buildchain binary against
/// it with an isolated config directory.
pub struct TestProject {
    /// Temporary directory for the source tree
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the canonical path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp directory")
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Create a managed project producing `assembly` that references `references`
    pub fn create_project(
        &self,
        rel: &str,
        assembly: &str,
        framework: &str,
        references: &[&str],
    ) -> PathBuf {
        self.create_file(rel, &project_xml(assembly, framework, references))
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.path().join(name)).expect("Failed to read file")
    }

    /// Lines of a file, empty when the file is absent
    pub fn read_lines(&self, name: &str) -> Vec<String> {
        if !self.file_exists(name) {
            return Vec::new();
        }
        self.read_file(name).lines().map(str::to_string).collect()
    }

    /// Command for the buildchain binary running in the project directory
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_buildchain"));
        cmd.current_dir(self.path())
            .env("BUILDCHAIN_CONFIG_DIR", self.path().join(".config"))
            .env_remove("BUILDCHAIN_NUGET_PATH")
            .env_remove("BUILDCHAIN_ALT_RESTORE")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run buildchain with arguments
    pub fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .output()
            .expect("Failed to execute buildchain")
    }

    /// Write an executable shell script and return its path
    #[cfg(unix)]
    pub fn create_script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.create_file(name, &format!("#!/bin/sh\n{body}"));
        let mut perms = std::fs::metadata(&path)
            .expect("Failed to stat script")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("Failed to make script executable");
        path
    }

    /// Fake build tool
    ///
    /// Appends its working directory to `tools/build.log`, and fails the way
    /// a real build does (error marker, non-zero exit) when the directory
    /// holds a `FAIL` file.
    #[cfg(unix)]
    pub fn create_build_tool(&self) -> PathBuf {
        let log = self.path().join("tools/build.log");
        self.create_script(
            "tools/fake-build",
            &format!(
                "pwd -P >> '{}'\n\
                 if [ -f FAIL ]; then echo 'error' > build.err; exit 1; fi\n\
                 exit 0\n",
                log.display()
            ),
        )
    }

    /// Directories the fake build tool ran in, in order
    pub fn build_log(&self) -> Vec<PathBuf> {
        self.read_lines("tools/build.log")
            .into_iter()
            .map(PathBuf::from)
            .collect()
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a single-target managed project document
pub fn project_xml(assembly: &str, framework: &str, references: &[&str]) -> String {
    let refs: String = references
        .iter()
        .map(|r| {
            format!(
                "    <Reference Include=\"{r}\"><HintPath>..\\bin\\{r}.dll</HintPath></Reference>\n"
            )
        })
        .collect();
    format!(
        "<Project Sdk=\"Microsoft.NET.Sdk\">
  <PropertyGroup>
    <AssemblyName>{assembly}</AssemblyName>
    <TargetFramework>{framework}</TargetFramework>
  </PropertyGroup>
  <ItemGroup>
{refs}  </ItemGroup>
</Project>
"
    )
}

/// A chain `P5 -> P4 -> P3 -> P2 -> P1`; returns the projects in build order
pub fn create_chain(project: &TestProject) -> Vec<PathBuf> {
    (1..=5)
        .map(|i| {
            let references: Vec<String> = if i > 1 {
                vec![format!("Chain.P{}", i - 1)]
            } else {
                Vec::new()
            };
            let refs: Vec<&str> = references.iter().map(String::as_str).collect();
            project.create_project(
                &format!("src/P{i}/P{i}.csproj"),
                &format!("Chain.P{i}"),
                "net6.0",
                &refs,
            )
        })
        .collect()
}

/// Directory containing `project`
pub fn dir_of(project: &Path) -> PathBuf {
    project
        .parent()
        .expect("project has a parent directory")
        .to_path_buf()
}

/// stdout as trimmed lines
pub fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
