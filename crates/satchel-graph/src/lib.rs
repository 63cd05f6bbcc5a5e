//! # satchel-graph
//!
//! Dependency graph construction for the Satchel bundler.
//!
//! ## Overview
//!
//! Starting from a single entry file, the [`GraphBuilder`] discovers every
//! module reachable through static `import` declarations, compiles each one
//! exactly once and records how its raw specifiers map to canonical paths:
//!
//! ```text
//! entry path
//!     │
//!     ▼
//! GraphBuilder ──read──────▶ Runtime
//!     │        ──analyze───▶ CompilerService
//!     │        ──resolve───▶ ModuleResolver
//!     ▼
//! ModuleGraph  (canonical path → ModuleRecord, discovery order)
//! ```
//!
//! The resulting [`ModuleGraph`] is closed (every dependency is itself a
//! record) and deduplicated (one record per canonical path). Turning it into
//! a runnable bundle is the job of `satchel-bundler`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use satchel_graph::{GraphBuilder, GraphConfig, NativeRuntime, OxcCompiler};
//!
//! # async fn run() -> Result<(), satchel_graph::GraphBuildError> {
//! let builder = GraphBuilder::new(
//!     GraphConfig::default().with_root("/path/to/project"),
//!     Arc::new(OxcCompiler::new()),
//!     Arc::new(NativeRuntime::new()),
//! );
//!
//! let graph = builder.build("src/main.js".as_ref()).await?;
//! for module in graph.modules() {
//!     println!("{} -> {:?}", module.path(), module.dependencies());
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod compiler;
pub mod config;
pub mod graph;
pub mod module;
pub mod resolver;
pub mod runtime;

#[cfg(test)]
mod tests;

pub use builder::{GraphBuildError, GraphBuilder};
pub use compiler::{
    CompileError, CompiledModule, CompilerService, DEFAULT_TARGET, HELPERS_OBJECT, OxcCompiler,
};
pub use config::{DEFAULT_MAX_MODULES, GraphConfig, MAX_FILE_SIZE};
pub use graph::{GraphIntegrityError, ModuleGraph};
pub use module::{CanonicalPath, CanonicalPathError, DependencyMap, ModuleRecord};
pub use resolver::{ModuleResolver, PathTraversalError, ResolutionError};

// Re-export runtime types
pub use runtime::native::NativeRuntime;
pub use runtime::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

// Test utilities (available in test builds)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    pub use super::runtime::test_utils::*;
}

pub mod oxc {
    //! oxc types re-exported so downstream crates parse with the same version.

    pub use oxc_allocator::Allocator;
    pub use oxc_parser::{Parser, ParserReturn};
    pub use oxc_span::SourceType;
}
