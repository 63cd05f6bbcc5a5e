//! Compiler service: source text in, import specifiers and runnable code out.
//!
//! The graph builder only depends on the [`CompilerService`] trait. The
//! production implementation, [`OxcCompiler`], runs three stages:
//!
//! ```text
//! source ──▶ parse + lower (oxc_transformer) ──▶ codegen ──▶ module format pass
//!                                                              │
//!                         import specifiers + require/exports code ◀┘
//! ```
//!
//! The module format pass keeps every specifier exactly as the author wrote
//! it. Translating specifiers to graph keys happens at run time, inside the
//! bundle's module-local `require`.

mod lower;
mod module_format;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::trace;

/// Default ECMAScript target for lowered output.
pub const DEFAULT_TARGET: &str = "es2015";

/// Output of a single [`CompilerService::analyze`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledModule {
    /// Static import and re-export specifiers, in first-appearance order,
    /// without duplicates.
    pub import_specifiers: Vec<String>,

    /// Code meant to run as the body of `function (require, exports) { ... }`.
    pub code: String,

    /// Names of the transform helpers the code reads from the shared
    /// `babelHelpers` object, in first-use order.
    pub helpers: Vec<String>,
}

/// Name of the object lowered code reads transform helpers from.
pub const HELPERS_OBJECT: &str = "babelHelpers";

/// Failure to compile a single file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("failed to parse '{}': {}", path.display(), messages.join("; "))]
    Parse { path: PathBuf, messages: Vec<String> },

    #[error("failed to transform '{}': {}", path.display(), messages.join("; "))]
    Transform { path: PathBuf, messages: Vec<String> },

    #[error("failed to rewrite module syntax in '{}': {}", path.display(), messages.join("; "))]
    ModuleFormat { path: PathBuf, messages: Vec<String> },

    #[error("invalid compilation target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },
}

impl CompileError {
    /// Path of the file that failed, when the error is tied to one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Parse { path, .. }
            | Self::Transform { path, .. }
            | Self::ModuleFormat { path, .. } => Some(path),
            Self::InvalidTarget { .. } => None,
        }
    }
}

/// Contract consumed by the graph builder.
///
/// `path` identifies the file for diagnostics and source-type detection; the
/// service never touches the file system itself.
pub trait CompilerService: Send + Sync + fmt::Debug {
    fn analyze(&self, path: &Path, source: &str) -> Result<CompiledModule, CompileError>;
}

/// Compiler service backed by the oxc parser, transformer and code generator.
#[derive(Debug, Clone)]
pub struct OxcCompiler {
    target: String,
}

impl OxcCompiler {
    /// Create a compiler that lowers to [`DEFAULT_TARGET`].
    pub fn new() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
        }
    }

    /// Create a compiler for an explicit target such as `"es2015"` or
    /// `"chrome80"`.
    ///
    /// The target is validated eagerly so a typo fails before any file is read.
    pub fn with_target(target: impl Into<String>) -> Result<Self, CompileError> {
        let target = target.into();
        lower::transform_options(&target)?;
        Ok(Self { target })
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Default for OxcCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerService for OxcCompiler {
    fn analyze(&self, path: &Path, source: &str) -> Result<CompiledModule, CompileError> {
        let options = lower::transform_options(&self.target)?;
        let lowered = lower::lower(path, source, &options)?;
        let compiled = module_format::to_require_exports(path, &lowered)?;
        trace!(
            path = %path.display(),
            imports = compiled.import_specifiers.len(),
            helpers = compiled.helpers.len(),
            "compiled module"
        );
        Ok(compiled)
    }
}
