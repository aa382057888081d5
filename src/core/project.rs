//! Project file model and reference extraction
//!
//! A project file is an XML document describing one buildable unit. Only the
//! parts buildchain needs are read: the output assembly name, the declared
//! target frameworks and the outbound assembly references.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::OnceLock;

use regex::Regex;
use roxmltree::{Document, Node};

use crate::config::defaults::{MANAGED_EXTENSIONS, NATIVE_EXTENSIONS};
use crate::error::ProjectError;

/// On-disk project format, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectFormat {
    /// Managed project (`.csproj`)
    Managed,
    /// Native or legacy-native project (`.vcxproj`, `.nativeproj`)
    Native,
}

impl ProjectFormat {
    /// Detect the format of `path` from its extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if MANAGED_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Managed)
        } else if NATIVE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Native)
        } else {
            None
        }
    }
}

/// Project kind, derived from the format and the declared frameworks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    /// Managed project with a single `<TargetFramework>`
    ModernSingleTarget,
    /// Managed project with `<TargetFrameworks>`
    ModernMultiTarget,
    /// Managed project declaring no target framework
    LegacyManaged,
    /// Native project; never declares a framework or references
    Native,
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ModernSingleTarget => "single-target",
            Self::ModernMultiTarget => "multi-target",
            Self::LegacyManaged => "legacy managed",
            Self::Native => "native",
        };
        f.write_str(name)
    }
}

/// Where a reference token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSource {
    /// `Include` attribute of the reference element
    Include,
    /// `HintPath` child element or attribute
    HintPath,
}

/// A raw outbound reference; not guaranteed to name a real file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEdge {
    /// Path-like token as written in the project
    pub value: String,
    /// Which part of the element supplied the token
    pub source: ReferenceSource,
}

impl ReferenceEdge {
    /// Assembly name named by this reference
    ///
    /// The last path component, cut at the first `,` so strong-name
    /// qualifiers (`Foo, Version=1.0.0.0, ...`) are dropped. Binary
    /// extensions are left for the resolver to strip.
    pub fn assembly_name(&self) -> &str {
        let file = self
            .value
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.value.as_str());
        file.split(',').next().unwrap_or(file).trim()
    }
}

/// Parsed project metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    path: PathBuf,
    format: ProjectFormat,
    multi_target: bool,
    assembly_name: Option<String>,
    target_frameworks: Vec<String>,
    references: Vec<ReferenceEdge>,
    malformed_references: usize,
}

impl ProjectFile {
    /// Read and parse the project file at `path`
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let format = ProjectFormat::from_path(path).ok_or_else(|| ProjectError::UnknownFormat {
            path: path.to_path_buf(),
        })?;
        let content = std::fs::read_to_string(path).map_err(|e| ProjectError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::parse(path, format, &content)
    }

    /// Parse project metadata from `content`
    pub fn parse(path: &Path, format: ProjectFormat, content: &str) -> Result<Self, ProjectError> {
        let doc = Document::parse(content.trim_start_matches('\u{feff}')).map_err(|e| {
            ProjectError::Parse {
                path: path.to_path_buf(),
                error: e.to_string(),
            }
        })?;

        let elements: Vec<Node<'_, '_>> = doc.descendants().filter(Node::is_element).collect();

        let mut target_frameworks: Vec<String> = Vec::new();
        let mut multi_target = false;
        for node in &elements {
            let plural = match node.tag_name().name() {
                "TargetFramework" => false,
                "TargetFrameworks" => true,
                _ => continue,
            };
            for moniker in element_text(node).unwrap_or_default().split(';') {
                let moniker = moniker.trim();
                if moniker.is_empty() {
                    continue;
                }
                multi_target |= plural;
                if !target_frameworks.iter().any(|m| m == moniker) {
                    target_frameworks.push(moniker.to_string());
                }
            }
        }

        let declared_name = first_element_text(&elements, "AssemblyName").or_else(|| {
            (format == ProjectFormat::Native)
                .then(|| first_element_text(&elements, "TargetName"))
                .flatten()
        });
        let assembly_name = declared_name.map(|raw| expand_properties(&raw, &elements));

        let mut references = Vec::new();
        let mut malformed_references = 0;
        for node in elements.iter().filter(|n| n.tag_name().name() == "Reference") {
            match reference_token(node) {
                Some(edge) => references.push(edge),
                None => malformed_references += 1,
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            format,
            multi_target,
            assembly_name,
            target_frameworks,
            references,
            malformed_references,
        })
    }

    /// Absolute path of the project file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// On-disk format
    pub fn format(&self) -> ProjectFormat {
        self.format
    }

    /// Project kind
    pub fn kind(&self) -> ProjectKind {
        match self.format {
            ProjectFormat::Native => ProjectKind::Native,
            ProjectFormat::Managed if self.multi_target => ProjectKind::ModernMultiTarget,
            ProjectFormat::Managed if !self.target_frameworks.is_empty() => {
                ProjectKind::ModernSingleTarget
            }
            ProjectFormat::Managed => ProjectKind::LegacyManaged,
        }
    }

    /// Declared output assembly name after one level of `$(...)` expansion
    pub fn assembly_name(&self) -> Option<&str> {
        self.assembly_name.as_deref()
    }

    /// Declared target-framework monikers, in document order
    pub fn target_frameworks(&self) -> &[String] {
        &self.target_frameworks
    }

    /// Moniker used as the requirement when resolving this project's references
    pub fn primary_framework(&self) -> Option<&str> {
        self.target_frameworks.first().map(String::as_str)
    }

    /// Number of `<Reference>` elements with neither Include nor HintPath
    pub fn malformed_references(&self) -> usize {
        self.malformed_references
    }

    /// Extract outbound references, optionally filtered by `keyword`
    ///
    /// Native projects yield nothing. The keyword is matched as a
    /// case-insensitive substring of the reference token. Malformed
    /// reference elements are skipped; see [`Self::malformed_references`].
    pub fn references(&self, keyword: Option<&str>) -> Vec<&ReferenceEdge> {
        if self.format != ProjectFormat::Managed {
            return Vec::new();
        }

        let keyword = keyword
            .filter(|k| !k.is_empty())
            .map(str::to_lowercase);
        self.references
            .iter()
            .filter(|edge| {
                keyword
                    .as_deref()
                    .map_or(true, |k| edge.value.to_lowercase().contains(k))
            })
            .collect()
    }
}

/// Parsed projects keyed by path
///
/// Each file is read at most once per run. Files that cannot be read or
/// parsed are remembered as such and reported only the first time.
#[derive(Debug, Default)]
pub struct ProjectCache {
    entries: HashMap<PathBuf, Option<Rc<ProjectFile>>>,
}

impl ProjectCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path`, or return the earlier result
    pub fn get(&mut self, path: &Path) -> Option<Rc<ProjectFile>> {
        self.entries
            .entry(path.to_path_buf())
            .or_insert_with(|| match ProjectFile::load(path) {
                Ok(project) => Some(Rc::new(project)),
                Err(e) => {
                    tracing::warn!("{e}");
                    None
                }
            })
            .clone()
    }

    /// Number of files loaded so far, including failures
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been loaded yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trimmed, non-empty text content of an element
fn element_text(node: &Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn first_element_text(elements: &[Node<'_, '_>], name: &str) -> Option<String> {
    elements
        .iter()
        .filter(|n| n.tag_name().name() == name)
        .find_map(element_text)
}

/// Pick the single path-like token of a `<Reference>` element
fn reference_token(node: &Node<'_, '_>) -> Option<ReferenceEdge> {
    let hint = node
        .children()
        .filter(|c| c.is_element() && c.tag_name().name() == "HintPath")
        .find_map(|c| element_text(&c))
        .or_else(|| non_empty_attribute(node, "HintPath"));
    if let Some(value) = hint {
        return Some(ReferenceEdge {
            value,
            source: ReferenceSource::HintPath,
        });
    }

    non_empty_attribute(node, "Include").map(|value| ReferenceEdge {
        value,
        source: ReferenceSource::Include,
    })
}

fn non_empty_attribute(node: &Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn property_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\$\(([A-Za-z_][A-Za-z0-9_.\-]*)\)$").expect("property pattern is valid")
    })
}

/// Expand a value of the form `$(Name)` once from the same document
///
/// Only a value that is a single macro is expanded; text around or between
/// macros is kept as written. The expansion is not expanded again, and a
/// macro naming an element that does not exist is kept verbatim.
fn expand_properties(raw: &str, elements: &[Node<'_, '_>]) -> String {
    property_pattern()
        .captures(raw)
        .and_then(|caps| first_element_text(elements, &caps[1]))
        .unwrap_or_else(|| raw.to_string())
}
