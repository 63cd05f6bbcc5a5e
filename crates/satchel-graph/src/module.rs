//! Module records and canonical module paths.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Error returned when a path cannot be expressed relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("path '{}' is not inside project root '{}'", path.display(), root.display())]
pub struct CanonicalPathError {
    pub path: PathBuf,
    pub root: PathBuf,
}

/// Normalized, deduplication-safe identifier of a source file.
///
/// A canonical path is relative to the project root, uses `/` as separator on
/// every platform and never contains `.` or `..` segments. Two imports that
/// reach the same file produce equal canonical paths, which is what the graph
/// builder deduplicates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    /// Build a canonical path from an already-cleaned absolute path under `root`.
    pub fn from_absolute(root: &Path, path: &Path) -> Result<Self, CanonicalPathError> {
        let relative = path.strip_prefix(root).map_err(|_| CanonicalPathError {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_string_lossy()),
                Component::CurDir => {}
                _ => {
                    return Err(CanonicalPathError {
                        path: path.to_path_buf(),
                        root: root.to_path_buf(),
                    });
                }
            }
        }

        if segments.is_empty() {
            return Err(CanonicalPathError {
                path: path.to_path_buf(),
                root: root.to_path_buf(),
            });
        }

        Ok(Self(segments.join("/")))
    }

    /// The canonical path as a string slice (used as the graph key).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Location of the file on disk for the given project root.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |acc, segment| acc.join(segment))
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Raw specifier (as written in source) mapped to the module it resolves to.
///
/// Insertion order follows first appearance in the source file.
pub type DependencyMap = IndexMap<String, CanonicalPath>;

/// One compiled module of the graph.
///
/// Records are created once per canonical path by the graph builder and are
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    path: CanonicalPath,
    code: String,
    dependencies: DependencyMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    helpers: Vec<String>,
}

impl ModuleRecord {
    pub fn new(path: CanonicalPath, code: String, dependencies: DependencyMap) -> Self {
        Self {
            path,
            code,
            dependencies,
            helpers: Vec::new(),
        }
    }

    /// Attach the transform helpers `code` reads from `babelHelpers`.
    pub fn with_helpers(mut self, helpers: Vec<String>) -> Self {
        self.helpers = helpers;
        self
    }

    /// Canonical path of this module (its graph key).
    pub fn path(&self) -> &CanonicalPath {
        &self.path
    }

    /// Browser-runnable code produced by the compiler service.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Specifier to canonical path table for this module's imports.
    pub fn dependencies(&self) -> &DependencyMap {
        &self.dependencies
    }

    /// Transform helpers this module needs, in first-use order.
    pub fn helpers(&self) -> &[String] {
        &self.helpers
    }

    /// Resolve a raw specifier the way the emitted runtime's local require does.
    pub fn resolve_specifier(&self, specifier: &str) -> Option<&CanonicalPath> {
        self.dependencies.get(specifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_path_uses_forward_slashes() {
        let root = Path::new("/project");
        let path = root.join("src").join("lib").join("a.js");
        let canonical = CanonicalPath::from_absolute(root, &path).unwrap();
        assert_eq!(canonical.as_str(), "src/lib/a.js");
        assert_eq!(canonical.to_path(root), path);
    }

    #[test]
    fn canonical_path_rejects_paths_outside_root() {
        let root = Path::new("/project");
        assert!(CanonicalPath::from_absolute(root, Path::new("/elsewhere/a.js")).is_err());
        assert!(CanonicalPath::from_absolute(root, root).is_err());
    }

    #[test]
    fn record_resolves_its_own_specifiers() {
        let mut deps = DependencyMap::new();
        deps.insert("./b.js".to_string(), CanonicalPath("src/b.js".to_string()));
        let record = ModuleRecord::new(
            CanonicalPath("src/a.js".to_string()),
            "require(\"./b.js\");".to_string(),
            deps,
        );

        assert_eq!(record.resolve_specifier("./b.js").map(|p| p.as_str()), Some("src/b.js"));
        assert!(record.resolve_specifier("./c.js").is_none());
    }
}
