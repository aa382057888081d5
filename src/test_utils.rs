//! Test utilities
//!
//! Project file fixtures and proptest generators shared by unit tests.

#[cfg(test)]
pub mod fixtures {
    use std::fmt::Write as _;
    use std::path::{Path, PathBuf};

    /// Render a managed project document
    ///
    /// `frameworks` containing `;` is written as `<TargetFrameworks>`.
    /// References are written as `<HintPath>` children.
    pub fn project_xml(assembly: &str, frameworks: Option<&str>, references: &[&str]) -> String {
        let mut xml = String::from("<Project>\n  <PropertyGroup>\n");
        writeln!(xml, "    <AssemblyName>{assembly}</AssemblyName>").unwrap();
        match frameworks {
            Some(tfm) if tfm.contains(';') => {
                writeln!(xml, "    <TargetFrameworks>{tfm}</TargetFrameworks>").unwrap();
            }
            Some(tfm) => writeln!(xml, "    <TargetFramework>{tfm}</TargetFramework>").unwrap(),
            None => {}
        }
        xml.push_str("  </PropertyGroup>\n  <ItemGroup>\n");
        for reference in references {
            writeln!(
                xml,
                "    <Reference Include=\"{reference}\">\
                 <HintPath>..\\bin\\{reference}.dll</HintPath></Reference>"
            )
            .unwrap();
        }
        xml.push_str("  </ItemGroup>\n</Project>\n");
        xml
    }

    /// Write `content` to `root/rel` and return the canonical path
    pub fn write_project(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path.canonicalize().unwrap()
    }
}

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate an acyclic dependency graph over `n` nodes
    ///
    /// Node `i` may only depend on nodes with a larger index, so node 0 is
    /// a natural root. Returns the adjacency list.
    pub fn dag(max_nodes: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
        (1..=max_nodes).prop_flat_map(|n| {
            proptest::collection::vec(proptest::collection::vec(any::<bool>(), n), n).prop_map(
                move |matrix| {
                    (0..n)
                        .map(|i| ((i + 1)..n).filter(|&j| matrix[i][j]).collect())
                        .collect()
                },
            )
        })
    }

    /// Generate a valid assembly name
    pub fn assembly_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{1,8}(\\.[A-Z][a-z]{1,8}){0,2}"
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_dag_generator_edges_point_forward(graph in dag(12)) {
            for (i, deps) in graph.iter().enumerate() {
                prop_assert!(deps.iter().all(|&j| j > i && j < graph.len()));
            }
        }

        #[test]
        fn test_assembly_name_generator(name in assembly_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(!name.ends_with('.'));
        }
    }
}
