//! Configuration for graph construction.

use std::path::PathBuf;

/// Default maximum number of modules to process (DoS protection).
///
/// This prevents processing extremely large codebases that could cause
/// memory exhaustion or excessive processing time.
pub const DEFAULT_MAX_MODULES: usize = 100_000;

/// Maximum file size in bytes (10 MB).
///
/// Files larger than this will be rejected to prevent memory exhaustion.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Options for [`GraphBuilder`](crate::GraphBuilder).
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Project root. Canonical paths are relative to it and no module may
    /// resolve outside of it. Defaults to the runtime's working directory.
    pub root: Option<PathBuf>,

    /// Maximum number of modules in one graph.
    ///
    /// Default: `DEFAULT_MAX_MODULES` (100,000)
    pub max_modules: Option<usize>,

    /// Maximum size of a single source file in bytes.
    ///
    /// Default: `MAX_FILE_SIZE` (10 MB)
    pub max_file_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            root: None,
            max_modules: Some(DEFAULT_MAX_MODULES),
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl GraphConfig {
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_max_modules(mut self, max_modules: Option<usize>) -> Self {
        self.max_modules = max_modules;
        self
    }
}
