//! Graph builder: from one entry file to a closed, deduplicated module graph.
//!
//! The builder owns no I/O of its own. Files are read through the
//! [`Runtime`] and compiled through the [`CompilerService`], both injected at
//! construction, and every step is awaited in order, so a build behaves like
//! a single-threaded walk of the work list.

mod reader;
mod traversal;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::compiler::{CompileError, CompilerService};
use crate::config::GraphConfig;
use crate::graph::{GraphIntegrityError, ModuleGraph};
use crate::module::CanonicalPath;
use crate::resolver::{ModuleResolver, ResolutionError};
use crate::runtime::{Runtime, RuntimeError};

/// Error that aborts a graph build. No partial graph is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum GraphBuildError {
    #[error("failed to determine project root: {0}")]
    Root(#[source] RuntimeError),

    #[error("invalid entry '{}': {source}", entry.display())]
    Entry {
        entry: PathBuf,
        #[source]
        source: ResolutionError,
    },

    #[error("failed to resolve '{specifier}' imported by '{importer}': {source}")]
    Resolution {
        importer: CanonicalPath,
        specifier: String,
        #[source]
        source: ResolutionError,
    },

    #[error("failed to compile '{path}': {source}")]
    Compile {
        path: CanonicalPath,
        #[source]
        source: CompileError,
    },

    #[error("failed to read file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("file '{}' is not valid UTF-8: {reason}", path.display())]
    InvalidUtf8 { path: PathBuf, reason: String },

    #[error("file too large: '{}' is {size} bytes (max: {max} bytes)", path.display())]
    FileTooLarge {
        path: PathBuf,
        size: usize,
        max: usize,
    },

    #[error("too many modules: {count} modules (max: {max} allowed)")]
    TooManyModules { count: usize, max: usize },

    #[error("built graph is not closed: {0}")]
    Integrity(#[from] GraphIntegrityError),
}

impl GraphBuildError {
    /// The module or file the error is about, when there is one.
    pub fn module_path(&self) -> Option<String> {
        match self {
            Self::Entry { entry, .. } => Some(entry.display().to_string()),
            Self::Resolution { importer, .. } => Some(importer.to_string()),
            Self::Compile { path, .. } => Some(path.to_string()),
            Self::Read { path, .. }
            | Self::InvalidUtf8 { path, .. }
            | Self::FileTooLarge { path, .. } => Some(path.display().to_string()),
            Self::Root(_) | Self::TooManyModules { .. } | Self::Integrity(_) => None,
        }
    }
}

/// Builds a [`ModuleGraph`] from an entry file.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use satchel_graph::{GraphBuilder, GraphConfig, OxcCompiler, NativeRuntime};
///
/// let builder = GraphBuilder::new(
///     GraphConfig::default().with_root("/project"),
///     Arc::new(OxcCompiler::new()),
///     Arc::new(NativeRuntime::new()),
/// );
/// let graph = builder.build("src/main.js".as_ref()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    config: GraphConfig,
    compiler: Arc<dyn CompilerService>,
    runtime: Arc<dyn Runtime>,
}

impl GraphBuilder {
    pub fn new(
        config: GraphConfig,
        compiler: Arc<dyn CompilerService>,
        runtime: Arc<dyn Runtime>,
    ) -> Self {
        Self {
            config,
            compiler,
            runtime,
        }
    }

    /// Project root used for resolution: the configured root, or the
    /// runtime's working directory.
    pub fn root(&self) -> Result<PathBuf, GraphBuildError> {
        match &self.config.root {
            Some(root) if root.is_absolute() => Ok(root.clone()),
            Some(root) => Ok(self
                .runtime
                .get_cwd()
                .map_err(GraphBuildError::Root)?
                .join(root)),
            None => self.runtime.get_cwd().map_err(GraphBuildError::Root),
        }
    }

    /// Discover, compile and link every module reachable from `entry`.
    ///
    /// A relative `entry` is taken relative to the project root.
    pub async fn build(&self, entry: &Path) -> Result<ModuleGraph, GraphBuildError> {
        let started = Instant::now();
        let resolver = ModuleResolver::new(self.root()?);

        let entry_path = resolver
            .resolve_entry(entry, self.runtime.as_ref())
            .await
            .map_err(|source| GraphBuildError::Entry {
                entry: entry.to_path_buf(),
                source,
            })?;

        let traversal = traversal::Traversal {
            resolver: &resolver,
            compiler: self.compiler.as_ref(),
            runtime: self.runtime.as_ref(),
            max_modules: self.config.max_modules,
            max_file_size: self.config.max_file_size,
        };
        let graph = traversal.run(entry_path).await?;
        graph.verify()?;

        info!(
            entry = %graph.entry(),
            modules = graph.len(),
            edges = graph.edge_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "module graph built"
        );
        Ok(graph)
    }
}
