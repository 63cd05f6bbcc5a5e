//! Test utilities for satchel-graph.
//!
//! Shared fixtures used by the unit tests in this crate and, through the
//! `test-utils` feature, by the bundler and CLI crates.
//!
//! - `TestRuntime`: a filesystem runtime rooted at a scratch directory
//! - `CountingCompiler`: wraps a compiler service and records every call
//! - `create_test_project`: lays out a project from `(path, content)` pairs

// Test utilities are allowed to use std::fs since they only run on native platforms
#![allow(clippy::disallowed_methods)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};
use crate::compiler::{CompileError, CompiledModule, CompilerService};

/// Simple test runtime that wraps std::fs with a fixed working directory.
///
/// ## Usage Example
///
/// ```rust,ignore
/// use tempfile::TempDir;
/// use satchel_graph::test_utils::TestRuntime;
///
/// let temp = TempDir::new().unwrap();
/// let runtime = TestRuntime::new(temp.path().to_path_buf());
/// ```
#[derive(Debug)]
pub struct TestRuntime {
    cwd: PathBuf,
}

impl TestRuntime {
    /// Create a new test runtime with the specified working directory.
    pub fn new(cwd: PathBuf) -> Self {
        Self { cwd }
    }
}

#[async_trait]
impl Runtime for TestRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RuntimeError::FileNotFound(path.to_path_buf())
            } else {
                RuntimeError::Io(e.to_string())
            }
        })
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        fs::write(path, content).map_err(|e| RuntimeError::Io(e.to_string()))
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let metadata = fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RuntimeError::FileNotFound(path.to_path_buf())
            } else {
                RuntimeError::Io(e.to_string())
            }
        })?;
        Ok(FileMetadata {
            size: metadata.len(),
            is_file: metadata.is_file(),
            is_dir: metadata.is_dir(),
        })
    }

    async fn create_dir(&self, path: &Path, recursive: bool) -> RuntimeResult<()> {
        let result = if recursive {
            fs::create_dir_all(path)
        } else {
            fs::create_dir(path)
        };
        result.map_err(|e| RuntimeError::Io(e.to_string()))
    }

    async fn rename(&self, from: &Path, to: &Path) -> RuntimeResult<()> {
        fs::rename(from, to).map_err(|e| RuntimeError::Io(e.to_string()))
    }

    async fn remove_file(&self, path: &Path) -> RuntimeResult<()> {
        fs::remove_file(path).map_err(|e| RuntimeError::Io(e.to_string()))
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        Ok(self.cwd.clone())
    }
}

/// Compiler wrapper that counts `analyze` calls per file.
///
/// Deduplication is observable through this wrapper: a module reachable
/// along several import paths must still be compiled exactly once.
#[derive(Debug)]
pub struct CountingCompiler {
    inner: Arc<dyn CompilerService>,
    calls: Mutex<FxHashMap<PathBuf, usize>>,
}

impl CountingCompiler {
    /// Wrap an existing compiler service.
    pub fn new(inner: Arc<dyn CompilerService>) -> Self {
        Self {
            inner,
            calls: Mutex::new(FxHashMap::default()),
        }
    }

    /// Number of times `path` was compiled.
    pub fn calls_for(&self, path: &Path) -> usize {
        self.calls.lock().get(path).copied().unwrap_or(0)
    }

    /// Total number of compiler invocations.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

impl CompilerService for CountingCompiler {
    fn analyze(&self, path: &Path, source: &str) -> Result<CompiledModule, CompileError> {
        *self.calls.lock().entry(path.to_path_buf()).or_insert(0) += 1;
        self.inner.analyze(path, source)
    }
}

/// Create a test project with the given files.
///
/// # Arguments
/// * `root` - Directory to populate
/// * `files` - Array of (path, content) tuples
///
/// # Returns
/// The root path of the created project
pub fn create_test_project(root: &Path, files: &[(&str, &str)]) -> PathBuf {
    for (path, content) in files {
        let file_path = root.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("Failed to create parent directory for {}: {}", path, e));
        }
        fs::write(&file_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file {}: {}", path, e));
    }

    root.to_path_buf()
}
