//! Module resolution: (importer, specifier) to canonical path.
//!
//! Only relative (`./x`, `../x`) and root-absolute (`/x`) specifiers are
//! supported, and they must name the file exactly as written. There is no
//! extension probing, no `index` fallback and no package lookup.

mod validation;

pub use validation::{PathTraversalError, normalize_within_root};

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use tracing::trace;

use crate::module::CanonicalPath;
use crate::runtime::{Runtime, RuntimeError};

/// Failure to map a specifier to a file inside the project root.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("cannot resolve '{specifier}': '{}' does not exist or is not a file", path.display())]
    NotFound { specifier: String, path: PathBuf },

    #[error("cannot resolve bare specifier '{specifier}': only relative and root-absolute imports are bundled")]
    BareSpecifier { specifier: String },

    #[error("cannot resolve '{specifier}': {source}")]
    OutsideRoot {
        specifier: String,
        #[source]
        source: PathTraversalError,
    },

    #[error("cannot resolve '{specifier}': {source}")]
    Runtime {
        specifier: String,
        #[source]
        source: RuntimeError,
    },
}

/// Resolves specifiers against a fixed project root.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    root: PathBuf,
}

impl ModuleResolver {
    /// `root` should be absolute; it is cleaned but not canonicalized.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into().clean(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lexical half of resolution: where `specifier` points, without touching
    /// the file system. The same inputs always produce the same path.
    pub fn resolve_path(
        &self,
        importer: &CanonicalPath,
        specifier: &str,
    ) -> Result<PathBuf, ResolutionError> {
        let (relative, base) = if let Some(rooted) = specifier.strip_prefix('/') {
            (rooted, self.root.clone())
        } else if is_relative(specifier) {
            let importer_path = importer.to_path(&self.root);
            let dir = importer_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.root.clone());
            (specifier, dir)
        } else {
            return Err(ResolutionError::BareSpecifier {
                specifier: specifier.to_string(),
            });
        };

        normalize_within_root(Path::new(relative), &base, &self.root).map_err(|source| {
            ResolutionError::OutsideRoot {
                specifier: specifier.to_string(),
                source,
            }
        })
    }

    /// Resolve `specifier` as imported from `importer`.
    pub async fn resolve(
        &self,
        importer: &CanonicalPath,
        specifier: &str,
        runtime: &dyn Runtime,
    ) -> Result<CanonicalPath, ResolutionError> {
        let path = self.resolve_path(importer, specifier)?;
        let canonical = self.existing_file(specifier, path, runtime).await?;
        trace!(importer = %importer, specifier, resolved = %canonical, "resolved specifier");
        Ok(canonical)
    }

    /// Resolve the entry path given by the user, relative to the root when not
    /// absolute.
    pub async fn resolve_entry(
        &self,
        entry: &Path,
        runtime: &dyn Runtime,
    ) -> Result<CanonicalPath, ResolutionError> {
        let display = entry.display().to_string();
        let path = normalize_within_root(entry, &self.root, &self.root).map_err(|source| {
            ResolutionError::OutsideRoot {
                specifier: display.clone(),
                source,
            }
        })?;
        self.existing_file(&display, path, runtime).await
    }

    async fn existing_file(
        &self,
        specifier: &str,
        path: PathBuf,
        runtime: &dyn Runtime,
    ) -> Result<CanonicalPath, ResolutionError> {
        match runtime.metadata(&path).await {
            Ok(metadata) if metadata.is_file => {}
            Ok(_) | Err(RuntimeError::FileNotFound(_)) => {
                return Err(ResolutionError::NotFound {
                    specifier: specifier.to_string(),
                    path,
                });
            }
            Err(source) => {
                return Err(ResolutionError::Runtime {
                    specifier: specifier.to_string(),
                    source,
                });
            }
        }

        CanonicalPath::from_absolute(&self.root, &path).map_err(|e| ResolutionError::OutsideRoot {
            specifier: specifier.to_string(),
            source: PathTraversalError {
                path: e.path,
                root: e.root,
            },
        })
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}
