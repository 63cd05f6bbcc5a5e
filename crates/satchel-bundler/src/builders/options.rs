use std::path::{Path, PathBuf};
use std::sync::Arc;

use satchel_graph::{CompilerService, DEFAULT_MAX_MODULES, OxcCompiler, Runtime};

use crate::{Error, Result};

/// Configuration options for a build operation.
///
/// Use the builder methods for ergonomic configuration:
///
/// ```no_run
/// use satchel_bundler::BuildOptions;
///
/// # async fn example() -> satchel_bundler::Result<()> {
/// let result = BuildOptions::new("src/main.js")
///     .root("/path/to/project")
///     .target("es2017")
///     .build()
///     .await?;
///
/// result.write_to("dist/bundle.js").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Entry module, relative to `root` unless absolute.
    pub entry: PathBuf,

    /// Project root; defaults to the runtime's working directory.
    pub root: Option<PathBuf>,

    /// ECMAScript target for the default compiler (e.g. `"es2015"`).
    ///
    /// Ignored when a custom `compiler` is set.
    pub target: Option<String>,

    /// Maximum number of modules in the graph (`None` disables the limit).
    pub max_modules: Option<usize>,

    /// Runtime for filesystem operations (default: `NativeRuntime`).
    pub runtime: Option<Arc<dyn Runtime>>,

    /// Compiler service (default: `OxcCompiler` for `target`).
    pub compiler: Option<Arc<dyn CompilerService>>,
}

impl BuildOptions {
    /// Create build options for a single entry file.
    pub fn new(entry: impl AsRef<Path>) -> Self {
        Self {
            entry: entry.as_ref().to_path_buf(),
            root: None,
            target: None,
            max_modules: Some(DEFAULT_MAX_MODULES),
            runtime: None,
            compiler: None,
        }
    }

    /// Set the project root used for resolution.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set the compilation target.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn max_modules(mut self, max_modules: Option<usize>) -> Self {
        self.max_modules = max_modules;
        self
    }

    /// Set the runtime for filesystem operations.
    pub fn runtime(mut self, runtime: Arc<dyn Runtime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Replace the compiler service.
    pub fn compiler(mut self, compiler: Arc<dyn CompilerService>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Validate the build options for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is empty, the module limit is zero or
    /// the target is not understood by the default compiler.
    pub fn validate(&self) -> Result<()> {
        if self.entry.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("an entry module is required".into()));
        }

        if self.max_modules == Some(0) {
            return Err(Error::InvalidConfig(
                "max_modules must be at least 1".into(),
            ));
        }

        if self.compiler.is_none() {
            if let Some(target) = &self.target {
                OxcCompiler::with_target(target.as_str())?;
            }
        }

        Ok(())
    }

    /// Compiler to use: the configured one, or oxc for `target`.
    pub(crate) fn resolve_compiler(&self) -> Result<Arc<dyn CompilerService>> {
        if let Some(compiler) = &self.compiler {
            return Ok(Arc::clone(compiler));
        }
        let compiler = match &self.target {
            Some(target) => OxcCompiler::with_target(target.as_str())?,
            None => OxcCompiler::new(),
        };
        Ok(Arc::new(compiler))
    }

    /// Execute the build with these options.
    ///
    /// This is a convenience method that calls `build(self)`.
    pub async fn build(self) -> Result<super::output::BuildResult> {
        super::build(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = BuildOptions::new("src/main.js");
        assert_eq!(options.entry, PathBuf::from("src/main.js"));
        assert_eq!(options.max_modules, Some(DEFAULT_MAX_MODULES));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn rejects_empty_entry() {
        assert!(matches!(
            BuildOptions::new("").validate(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_zero_module_limit() {
        assert!(BuildOptions::new("a.js").max_modules(Some(0)).validate().is_err());
    }

    #[test]
    fn rejects_unknown_target() {
        let err = BuildOptions::new("a.js").target("es1999").validate().unwrap_err();
        assert!(matches!(err, Error::Compile(_)));
    }
}
