//! Assembly resolution
//!
//! Maps an assembly name to the project in the index that produces it,
//! honouring the target-framework requirement of the referencing project.
//! Both hits and misses are memoized, so each name triggers at most one scan
//! of the index and at most one "unresolved" warning per run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::defaults::BINARY_EXTENSIONS;
use crate::core::framework;
use crate::core::index::ProjectIndex;
use crate::core::project::{ProjectCache, ProjectFile, ProjectKind};

/// Outcome of resolving one assembly name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Produced by the project at this path
    Resolved(PathBuf),
    /// No project under the search roots produces it
    Unresolved,
}

impl Resolution {
    /// The producing project, if any
    pub fn project(&self) -> Option<&Path> {
        match self {
            Self::Resolved(path) => Some(path),
            Self::Unresolved => None,
        }
    }
}

/// Memoized resolutions keyed by normalized assembly name
///
/// A name that is absent has never been queried; a miss is stored as
/// [`Resolution::Unresolved`] rather than left absent.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<String, Resolution>,
}

impl ResolutionCache {
    /// Previously recorded outcome for `name`
    pub fn get(&self, name: &str) -> Option<&Resolution> {
        self.entries.get(name)
    }

    fn insert(&mut self, name: String, resolution: Resolution) {
        self.entries.insert(name, resolution);
    }

    /// Number of names recorded
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strip a trailing binary extension (`.dll`, `.exe`, ...) from `name`
pub fn normalize_assembly_name(name: &str) -> &str {
    let name = name.trim();
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && BINARY_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext)) =>
        {
            stem
        }
        _ => name,
    }
}

/// Resolves assembly names against a [`ProjectIndex`]
#[derive(Debug)]
pub struct AssemblyResolver {
    index: ProjectIndex,
    cache: ResolutionCache,
    scans: usize,
}

impl AssemblyResolver {
    /// Create a resolver over `index` with an empty cache
    pub fn new(index: ProjectIndex) -> Self {
        Self {
            index,
            cache: ResolutionCache::default(),
            scans: 0,
        }
    }

    /// The memoized results so far
    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Number of index scans performed (cache misses)
    pub fn scans(&self) -> usize {
        self.scans
    }

    /// Resolve `assembly` for a consumer targeting `framework`
    ///
    /// `referrer` is only used in the warning emitted on a miss. The first
    /// acceptable candidate in index order wins; duplicates producing the
    /// same name are not reported.
    pub fn resolve(
        &mut self,
        assembly: &str,
        framework: &str,
        referrer: &Path,
        projects: &mut ProjectCache,
    ) -> Resolution {
        let name = normalize_assembly_name(assembly);

        if let Some(hit) = self.cache.get(name) {
            tracing::debug!("Resolution cache hit for '{name}'");
            return hit.clone();
        }

        self.scans += 1;
        let resolution = self
            .index
            .candidates()
            .iter()
            .find(|candidate| {
                projects
                    .get(candidate)
                    .is_some_and(|project| accepts(&project, name, framework))
            })
            .map_or(Resolution::Unresolved, |path| {
                Resolution::Resolved(path.clone())
            });

        match &resolution {
            Resolution::Resolved(path) => {
                tracing::debug!("Resolved '{name}' to {}", path.display());
            }
            Resolution::Unresolved => {
                tracing::warn!(
                    "Could not find a project producing '{name}' ({framework}) referenced by {}",
                    referrer.display()
                );
            }
        }

        self.cache.insert(name.to_string(), resolution.clone());
        resolution
    }
}

/// Whether `candidate` produces `name` usable from `framework`
fn accepts(candidate: &ProjectFile, name: &str, framework: &str) -> bool {
    if candidate.assembly_name() != Some(name) {
        return false;
    }

    match candidate.kind() {
        ProjectKind::Native | ProjectKind::LegacyManaged => true,
        ProjectKind::ModernSingleTarget | ProjectKind::ModernMultiTarget => {
            let compatible = framework::is_compatible(candidate.target_frameworks(), framework);
            if !compatible {
                tracing::debug!(
                    "{} produces '{name}' but targets {:?}, not {framework}",
                    candidate.path().display(),
                    candidate.target_frameworks()
                );
            }
            compatible
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{project_xml, write_project};
    use crate::config::defaults::MIN_PROPTEST_ITERATIONS;
    use crate::test_utils::generators::assembly_name;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn resolver_for(root: &Path) -> AssemblyResolver {
        AssemblyResolver::new(ProjectIndex::build(&[root]))
    }

    #[test]
    fn test_normalize_strips_binary_extension() {
        assert_eq!(normalize_assembly_name("Lib.dll"), "Lib");
        assert_eq!(normalize_assembly_name("Tool.EXE"), "Tool");
        assert_eq!(normalize_assembly_name("Contoso.Core.dll"), "Contoso.Core");
        assert_eq!(normalize_assembly_name("Contoso.Core"), "Contoso.Core");
        assert_eq!(normalize_assembly_name(".dll"), ".dll");
    }

    #[test]
    fn test_exact_case_sensitive_match() {
        let temp = TempDir::new().unwrap();
        write_project(temp.path(), "lib/Lib.csproj", &project_xml("lib", Some("net6.0"), &[]));
        let mut resolver = resolver_for(temp.path());
        let mut projects = ProjectCache::new();

        let result = resolver.resolve("Lib.dll", "net6.0", Path::new("R.csproj"), &mut projects);
        assert_eq!(result, Resolution::Unresolved);
    }

    #[test]
    fn test_incompatible_candidate_is_skipped_for_later_compatible_one() {
        let temp = TempDir::new().unwrap();
        write_project(temp.path(), "a/LibFx.csproj", &project_xml("Lib", Some("net48"), &[]));
        let std_lib = write_project(
            temp.path(),
            "b/LibStd.csproj",
            &project_xml("Lib", Some("netstandard2.0"), &[]),
        );
        let mut resolver = resolver_for(temp.path());
        let mut projects = ProjectCache::new();

        let result = resolver.resolve("Lib", "net6.0", Path::new("R.csproj"), &mut projects);
        assert_eq!(result, Resolution::Resolved(std_lib));
    }

    #[test]
    fn test_first_compatible_candidate_wins() {
        let temp = TempDir::new().unwrap();
        let first = write_project(
            temp.path(),
            "a/Lib.csproj",
            &project_xml("Lib", Some("netstandard2.0"), &[]),
        );
        write_project(temp.path(), "b/Lib.csproj", &project_xml("Lib", Some("net6.0"), &[]));
        let mut resolver = resolver_for(temp.path());
        let mut projects = ProjectCache::new();

        let result = resolver.resolve("Lib", "net6.0", Path::new("R.csproj"), &mut projects);
        assert_eq!(result, Resolution::Resolved(first));
    }

    #[test]
    fn test_multi_target_candidate_matches_any_moniker() {
        let temp = TempDir::new().unwrap();
        let lib = write_project(
            temp.path(),
            "Lib.csproj",
            &project_xml("Lib", Some("net48;net6.0"), &[]),
        );
        let mut resolver = resolver_for(temp.path());
        let mut projects = ProjectCache::new();

        let result = resolver.resolve("Lib", "net6.0", Path::new("R.csproj"), &mut projects);
        assert_eq!(result, Resolution::Resolved(lib));
    }

    #[test]
    fn test_legacy_and_native_candidates_are_accepted_unconditionally() {
        let temp = TempDir::new().unwrap();
        let legacy = write_project(temp.path(), "Old.csproj", &project_xml("Old", None, &[]));
        let native = write_project(
            temp.path(),
            "Native.vcxproj",
            "<Project><PropertyGroup><TargetName>Native</TargetName></PropertyGroup></Project>",
        );
        let mut resolver = resolver_for(temp.path());
        let mut projects = ProjectCache::new();

        assert_eq!(
            resolver.resolve("Old.dll", "net6.0", Path::new("R.csproj"), &mut projects),
            Resolution::Resolved(legacy)
        );
        assert_eq!(
            resolver.resolve("Native.dll", "net6.0", Path::new("R.csproj"), &mut projects),
            Resolution::Resolved(native)
        );
    }

    #[test]
    fn test_macro_assembly_name_is_expanded_before_matching() {
        let temp = TempDir::new().unwrap();
        let lib = write_project(
            temp.path(),
            "Lib.csproj",
            r"<Project><PropertyGroup>
  <BaseName>Contoso.Lib</BaseName>
  <AssemblyName>$(BaseName)</AssemblyName>
  <TargetFramework>net6.0</TargetFramework>
</PropertyGroup></Project>",
        );
        let mut resolver = resolver_for(temp.path());
        let mut projects = ProjectCache::new();

        let result =
            resolver.resolve("Contoso.Lib.dll", "net6.0", Path::new("R.csproj"), &mut projects);
        assert_eq!(result, Resolution::Resolved(lib));
    }

    #[test]
    fn test_positive_result_is_cached() {
        let temp = TempDir::new().unwrap();
        let lib = write_project(
            temp.path(),
            "Lib.csproj",
            &project_xml("Lib", Some("net6.0"), &[]),
        );
        let mut resolver = resolver_for(temp.path());
        let mut projects = ProjectCache::new();

        resolver.resolve("Lib.dll", "net6.0", Path::new("R.csproj"), &mut projects);
        std::fs::remove_file(&lib).unwrap();
        let second = resolver.resolve("Lib", "net6.0", Path::new("R.csproj"), &mut projects);

        assert_eq!(second, Resolution::Resolved(lib));
        assert_eq!(resolver.scans(), 1);
        assert_eq!(resolver.cache().len(), 1);
    }

    #[test]
    fn test_negative_result_is_cached() {
        let temp = TempDir::new().unwrap();
        write_project(temp.path(), "Other.csproj", &project_xml("Other", Some("net6.0"), &[]));
        let mut resolver = resolver_for(temp.path());
        let mut projects = ProjectCache::new();

        let first = resolver.resolve("Missing.dll", "net6.0", Path::new("R.csproj"), &mut projects);
        let second = resolver.resolve("Missing", "net48", Path::new("S.csproj"), &mut projects);

        assert_eq!(first, Resolution::Unresolved);
        assert_eq!(second, Resolution::Unresolved);
        assert_eq!(resolver.scans(), 1);
        assert_eq!(resolver.cache().get("Missing"), Some(&Resolution::Unresolved));
    }

    #[test]
    fn test_empty_index_resolves_nothing() {
        let mut resolver = AssemblyResolver::new(ProjectIndex::default());
        let mut projects = ProjectCache::new();
        let result = resolver.resolve("Lib", "net6.0", Path::new("R.csproj"), &mut projects);
        assert_eq!(result.project(), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(MIN_PROPTEST_ITERATIONS))]

        #[test]
        fn prop_normalize_strips_only_binary_suffix(
            name in assembly_name(),
            ext in "(dll|DLL|exe|winmd)",
        ) {
            let with_suffix = format!("{name}.{ext}");
            prop_assert_eq!(normalize_assembly_name(&with_suffix), name.as_str());

            let last = name.rsplit('.').next().unwrap_or_default();
            let binary_tail = BINARY_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(last));
            prop_assume!(!name.contains('.') || !binary_tail);
            prop_assert_eq!(normalize_assembly_name(&name), name.as_str());
        }
    }
}
