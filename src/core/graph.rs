//! Assembly reference graph
//!
//! Edges come from each project's declared assembly references, resolved
//! to producing projects through the [`AssemblyResolver`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::index::ProjectIndex;
use crate::core::order::{self, BuildOrder, ProjectGraph};
use crate::core::project::{ProjectCache, ProjectFile, ProjectKind};
use crate::core::resolver::AssemblyResolver;
use crate::error::ProjectError;

/// [`ProjectGraph`] over real project files
#[derive(Debug)]
pub struct AssemblyGraph {
    resolver: AssemblyResolver,
    projects: ProjectCache,
    keyword: Option<String>,
    diagnosed: HashSet<PathBuf>,
    warnings: usize,
}

impl AssemblyGraph {
    /// Create a graph over `index`, keeping only references containing `keyword`
    pub fn new(index: ProjectIndex, keyword: Option<String>) -> Self {
        Self {
            resolver: AssemblyResolver::new(index),
            projects: ProjectCache::new(),
            keyword: keyword.filter(|k| !k.is_empty()),
            diagnosed: HashSet::new(),
            warnings: 0,
        }
    }

    /// The resolver, for inspecting cache statistics
    pub fn resolver(&self) -> &AssemblyResolver {
        &self.resolver
    }

    /// Number of per-project warnings emitted so far
    pub fn warnings(&self) -> usize {
        self.warnings
    }

    /// Warn about problems in `file`, once per project however often it is expanded
    fn diagnose(&mut self, file: &ProjectFile) {
        if !self.diagnosed.insert(file.path().to_path_buf()) {
            return;
        }

        if file.malformed_references() > 0 {
            tracing::warn!(
                "{} reference element(s) in {} have neither Include nor HintPath",
                file.malformed_references(),
                file.path().display()
            );
            self.warnings += 1;
        }
        if file.kind() == ProjectKind::LegacyManaged {
            tracing::warn!(
                "{} declares no target framework; treating it as a legacy project \
                 and not following its references",
                file.path().display()
            );
            self.warnings += 1;
        }
    }
}

impl ProjectGraph for AssemblyGraph {
    fn dependencies(&mut self, project: &Path) -> Vec<PathBuf> {
        let Some(file) = self.projects.get(project) else {
            return Vec::new();
        };

        self.diagnose(&file);

        let Some(framework) = file.primary_framework() else {
            return Vec::new();
        };

        let mut dependencies = Vec::new();
        for edge in file.references(self.keyword.as_deref()) {
            let resolution = self.resolver.resolve(
                edge.assembly_name(),
                framework,
                project,
                &mut self.projects,
            );
            if let Some(dependency) = resolution.project() {
                dependencies.push(dependency.to_path_buf());
            }
        }

        tracing::debug!(
            "{} -> {} project dependenc{}",
            project.display(),
            dependencies.len(),
            if dependencies.len() == 1 { "y" } else { "ies" }
        );
        dependencies
    }
}

/// Compute the build order for `root`, searching `roots` for dependencies
///
/// # Errors
///
/// Fails only if the root project itself cannot be read or parsed;
/// problems further down the graph are logged and skipped.
pub fn resolve_build_order<P: AsRef<Path>>(
    root: &Path,
    roots: &[P],
    keyword: Option<&str>,
) -> Result<BuildOrder, ProjectError> {
    let root = root.canonicalize().map_err(|e| ProjectError::Read {
        path: root.to_path_buf(),
        error: e.to_string(),
    })?;
    let root_file = ProjectFile::load(&root)?;
    tracing::info!(
        "Resolving dependencies of {} ({})",
        root.display(),
        root_file.kind()
    );

    let index = ProjectIndex::build(roots);
    let mut graph = AssemblyGraph::new(index, keyword.map(str::to_string));
    let order = order::linearize(&root, &mut graph);
    tracing::debug!(
        "{} assembly name(s) looked up, {} index scan(s)",
        graph.resolver().cache().len(),
        graph.resolver().scans()
    );
    Ok(order)
}
