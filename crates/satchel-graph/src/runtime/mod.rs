//! Platform runtime abstraction for the Satchel bundler
//!
//! This module defines the `Runtime` trait that abstracts the file-system
//! operations the graph builder and the bundle writer need. Everything that
//! touches the disk goes through this seam so resolution and graph
//! construction can be tested against a scratch directory.

pub mod native;

// Test utilities (available in test builds)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Other runtime error
    #[error("Runtime error: {0}")]
    Other(String),
}

/// File metadata
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// File size in bytes
    pub size: u64,
    /// Whether this is a directory
    pub is_dir: bool,
    /// Whether this is a file
    pub is_file: bool,
}

/// Platform runtime trait
///
/// Implementations provide file I/O for the bundler. The graph builder awaits
/// each call in order, so an implementation is free to block internally
/// (e.g. via `spawn_blocking`) without changing build semantics.
///
/// # Example
///
/// ```rust,ignore
/// use satchel_graph::runtime::{Runtime, RuntimeResult};
/// use async_trait::async_trait;
///
/// struct MyRuntime;
///
/// #[async_trait]
/// impl Runtime for MyRuntime {
///     async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
///         std::fs::read(path).map_err(|e| RuntimeError::Io(e.to_string()))
///     }
///
///     // ... implement other methods
/// }
/// ```
#[async_trait]
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// Read a file from the filesystem
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    /// Write a file to the filesystem
    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()>;

    /// Get file metadata
    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata>;

    /// Create a directory (and its parents when `recursive` is set)
    async fn create_dir(&self, path: &Path, recursive: bool) -> RuntimeResult<()>;

    /// Atomically move `from` over `to`
    async fn rename(&self, from: &Path, to: &Path) -> RuntimeResult<()>;

    /// Remove a file
    async fn remove_file(&self, path: &Path) -> RuntimeResult<()>;

    /// Get the current working directory
    ///
    /// Used as the project root when the caller does not configure one.
    fn get_cwd(&self) -> RuntimeResult<PathBuf>;
}
