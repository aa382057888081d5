//! Build order linearization
//!
//! Breadth-first worklist traversal from a root project. Every time a
//! project is rediscovered it is moved to the back of the worklist, and
//! every time it is processed again its earlier position in the output is
//! dropped. Reversing the output then puts each project before everything
//! that (transitively) depends on it.
//!
//! Each worklist entry remembers the chain of projects that led to it. A
//! dependency already on that chain closes a cycle and is not enqueued, which
//! is what guarantees termination on cyclic graphs. On acyclic graphs the
//! chain never matters.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Serialize;

/// Source of project-to-project edges for the traversal
pub trait ProjectGraph {
    /// Projects `project` depends on; empty for leaves and dead ends
    fn dependencies(&mut self, project: &Path) -> Vec<PathBuf>;
}

/// Projects in the order they must be built
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildOrder(Vec<PathBuf>);

impl BuildOrder {
    /// Wrap an explicit sequence
    pub fn new(projects: Vec<PathBuf>) -> Self {
        Self(projects)
    }

    /// Projects in build order
    pub fn projects(&self) -> &[PathBuf] {
        &self.0
    }

    /// Number of projects
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there is nothing to build
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Position of `project`, if present
    pub fn position(&self, project: &Path) -> Option<usize> {
        self.0.iter().position(|p| p == project)
    }

    /// The unbuilt tail starting at `index`
    #[must_use]
    pub fn suffix_from(&self, index: usize) -> Self {
        Self(self.0.get(index..).unwrap_or_default().to_vec())
    }

    /// Iterate over the projects
    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.0.iter()
    }
}

impl From<Vec<PathBuf>> for BuildOrder {
    fn from(projects: Vec<PathBuf>) -> Self {
        Self(projects)
    }
}

impl IntoIterator for BuildOrder {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a BuildOrder {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Persistent list of the projects on a discovery path
#[derive(Debug, Clone, Default)]
struct Ancestry(Option<Rc<AncestryNode>>);

#[derive(Debug)]
struct AncestryNode {
    project: PathBuf,
    parent: Ancestry,
}

impl Ancestry {
    fn with(&self, project: &Path) -> Self {
        Self(Some(Rc::new(AncestryNode {
            project: project.to_path_buf(),
            parent: self.clone(),
        })))
    }

    fn contains(&self, project: &Path) -> bool {
        let mut cursor = self.0.as_deref();
        while let Some(node) = cursor {
            if node.project == project {
                return true;
            }
            cursor = node.parent.0.as_deref();
        }
        false
    }
}

/// FIFO of projects with O(1) membership and removal by value
///
/// Removal only drops the project from `live`; its stale queue slot is
/// skipped when it reaches the front.
#[derive(Debug, Default)]
struct Worklist {
    queue: VecDeque<(u64, PathBuf, Ancestry)>,
    live: HashMap<PathBuf, u64>,
    next_seq: u64,
}

impl Worklist {
    /// Append `project`, removing any pending entry for it first
    fn push_back(&mut self, project: PathBuf, ancestry: Ancestry) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.live.insert(project.clone(), seq);
        self.queue.push_back((seq, project, ancestry));
    }

    fn pop_front(&mut self) -> Option<(PathBuf, Ancestry)> {
        while let Some((seq, project, ancestry)) = self.queue.pop_front() {
            if self.live.get(&project) == Some(&seq) {
                self.live.remove(&project);
                return Some((project, ancestry));
            }
        }
        None
    }

    fn contains(&self, project: &Path) -> bool {
        self.live.contains_key(project)
    }
}

/// Output sequence keeping only the latest occurrence of each project
#[derive(Debug, Default)]
struct Recorded {
    slots: Vec<Option<PathBuf>>,
    positions: HashMap<PathBuf, usize>,
}

impl Recorded {
    fn record(&mut self, project: &Path) {
        if let Some(earlier) = self.positions.remove(project) {
            self.slots[earlier] = None;
        }
        self.positions.insert(project.to_path_buf(), self.slots.len());
        self.slots.push(Some(project.to_path_buf()));
    }

    fn into_build_order(self) -> BuildOrder {
        BuildOrder(self.slots.into_iter().flatten().rev().collect())
    }
}

/// Linearize the dependency graph reachable from `root`
pub fn linearize<G: ProjectGraph>(root: &Path, graph: &mut G) -> BuildOrder {
    let mut worklist = Worklist::default();
    let mut recorded = Recorded::default();
    let mut processed = 0usize;

    worklist.push_back(root.to_path_buf(), Ancestry::default());

    while let Some((project, ancestry)) = worklist.pop_front() {
        processed += 1;
        recorded.record(&project);

        let chain = ancestry.with(&project);
        for dependency in graph.dependencies(&project) {
            if chain.contains(&dependency) {
                tracing::debug!(
                    "Cycle: {} -> {} not followed",
                    project.display(),
                    dependency.display()
                );
                continue;
            }
            if worklist.contains(&dependency) {
                tracing::trace!("Rescheduling {}", dependency.display());
            }
            worklist.push_back(dependency, chain.clone());
        }
    }

    let order = recorded.into_build_order();
    tracing::info!(
        "Linearized {} project(s) after {processed} visit(s)",
        order.len()
    );
    order
}
