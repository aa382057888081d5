//! Project index
//!
//! Enumerates every project file under the search roots once per run. The
//! resulting candidate list is immutable and its order (roots in the order
//! given, each walked depth-first sorted by file name) is the scan order the
//! assembly resolver relies on for first-match-wins.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::project::ProjectFormat;

/// Fixed candidate set of project files
#[derive(Debug, Clone, Default)]
pub struct ProjectIndex {
    candidates: Vec<PathBuf>,
}

impl ProjectIndex {
    /// Scan `roots` for project files
    ///
    /// Unreadable entries and missing roots are logged and skipped; an empty
    /// index is not an error.
    pub fn build<P: AsRef<Path>>(roots: &[P]) -> Self {
        let mut candidates = Vec::new();
        let mut seen = HashSet::new();

        for root in roots {
            let root = root.as_ref();
            let root = match root.canonicalize() {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!("Skipping search root {}: {e}", root.display());
                    continue;
                }
            };

            for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::debug!("Skipping unreadable entry: {e}");
                        continue;
                    }
                };
                if entry.file_type().is_file()
                    && ProjectFormat::from_path(entry.path()).is_some()
                    && seen.insert(entry.path().to_path_buf())
                {
                    candidates.push(entry.into_path());
                }
            }
        }

        tracing::info!("Indexed {} project file(s)", candidates.len());
        Self { candidates }
    }

    /// Candidates in scan order
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<Project />").unwrap();
    }

    #[test]
    fn test_finds_all_project_kinds_in_sorted_order() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "b/B.csproj");
        touch(temp.path(), "a/A.vcxproj");
        touch(temp.path(), "a/deep/C.nativeproj");
        touch(temp.path(), "a/readme.txt");
        touch(temp.path(), "c/Upper.CSPROJ");

        let index = ProjectIndex::build(&[temp.path()]);
        let root = temp.path().canonicalize().unwrap();
        let found: Vec<PathBuf> = index
            .candidates()
            .iter()
            .map(|p| p.strip_prefix(&root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            found,
            vec![
                PathBuf::from("a/A.vcxproj"),
                PathBuf::from("a/deep/C.nativeproj"),
                PathBuf::from("b/B.csproj"),
                PathBuf::from("c/Upper.CSPROJ"),
            ]
        );
        assert!(index.candidates().iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_roots_are_scanned_in_given_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        touch(first.path(), "Z.csproj");
        touch(second.path(), "A.csproj");

        let index = ProjectIndex::build(&[second.path(), first.path()]);
        assert_eq!(index.len(), 2);
        assert!(index.candidates()[0].ends_with("A.csproj"));
        assert!(index.candidates()[1].ends_with("Z.csproj"));
    }

    #[test]
    fn test_missing_root_yields_empty_index() {
        let temp = TempDir::new().unwrap();
        let index = ProjectIndex::build(&[temp.path().join("missing")]);
        assert!(index.is_empty());
    }
}
