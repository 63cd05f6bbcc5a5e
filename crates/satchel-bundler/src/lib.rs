//! # satchel-bundler
//!
//! Turns a module graph into one self-contained script.
//!
//! The emitted bundle carries its own tiny module loader: a memoizing
//! `require` keyed by canonical path, and a per-module `require` that maps
//! the specifiers a module was written with onto those paths. No native
//! module system and no string evaluation is needed to run it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use satchel_bundler::BuildOptions;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let result = BuildOptions::new("src/main.js")
//!     .root("/path/to/project")
//!     .build()
//!     .await?;
//!
//! println!("{} modules, {} bytes", result.stats.module_count, result.stats.bundle_size);
//! result.write_to("dist/bundle.js").await?;
//! # Ok(()) }
//! ```
//!
//! ### Emitting a graph you built yourself
//!
//! ```ignore
//! let graph = satchel_graph::GraphBuilder::new(config, compiler, runtime)
//!     .build("src/main.js".as_ref())
//!     .await?;
//! let script = satchel_bundler::emit(&graph, graph.entry())?;
//! ```

// Re-export everything from foundation crate
pub use satchel_graph::*;

pub mod builders;
pub mod emit;
pub mod output;

pub use builders::{BuildOptions, BuildResult, BuildStats, build};
pub use emit::{EmitError, emit};

/// Error types for satchel-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Graph construction failed.
    #[error(transparent)]
    Graph(#[from] GraphBuildError),

    /// The graph could not be serialized.
    #[error(transparent)]
    Emit(#[from] EmitError),

    /// The compiler could not be configured.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid output path.
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),
}

/// Result type for satchel-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;
