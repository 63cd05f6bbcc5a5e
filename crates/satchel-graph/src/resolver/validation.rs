//! Lexical path normalization and root containment.
//!
//! Resolution never follows the file system to decide whether a path is
//! inside the project: the cleaned path must start with the cleaned root.

use std::path::{Path, PathBuf};

use path_clean::PathClean;

/// Error indicating a cleaned path leaves the project root.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("path '{}' escapes project root '{}'", path.display(), root.display())]
pub struct PathTraversalError {
    pub path: PathBuf,
    pub root: PathBuf,
}

/// Join `path` onto `base` (unless it is already absolute), remove `.` and
/// `..` segments and check that the result stays under `root`.
pub fn normalize_within_root(
    path: &Path,
    base: &Path,
    root: &Path,
) -> Result<PathBuf, PathTraversalError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let cleaned = joined.clean();

    if cleaned.starts_with(root) && cleaned != root {
        Ok(cleaned)
    } else {
        Err(PathTraversalError {
            path: cleaned,
            root: root.to_path_buf(),
        })
    }
}
