//! Layered configuration for `satchel build`.
//!
//! Merges settings from CLI args, environment variables, and a config file.
//! Priority: CLI > Environment > File > Defaults
//!
//! The file mirrors the shape bundler configs have always had:
//!
//! ```json
//! {
//!   "entry": "src/main.js",
//!   "output": { "path": "dist", "filename": "bundle.js" }
//! }
//! ```

mod loading;
mod validation;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use loading::{CONFIG_FILE_NAMES, ENV_PREFIX};

/// Satchel configuration, loaded from `satchel.config.json` or CLI args.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleConfig {
    /// Entry module, relative to `root`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,

    /// Where the bundle is written
    #[serde(default)]
    pub output: OutputConfig,

    /// Project root (default: the current directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// ECMAScript target for compiled modules
    #[serde(default = "default_target")]
    pub target: String,

    /// Maximum number of modules in the graph
    #[serde(default = "default_max_modules")]
    pub max_modules: usize,
}

/// Output location: a directory plus a file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output directory, relative to the current directory
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Bundle file name
    #[serde(default = "default_output_filename")]
    pub filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            filename: default_output_filename(),
        }
    }
}

impl OutputConfig {
    /// `path/filename`
    pub fn file(&self) -> PathBuf {
        self.path.join(&self.filename)
    }
}

impl BundleConfig {
    /// Project root as an absolute path, resolved against `cwd`.
    pub fn resolved_root(&self, cwd: &Path) -> PathBuf {
        match &self.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => cwd.join(root),
            None => cwd.to_path_buf(),
        }
    }
}

pub fn default_target() -> String {
    satchel_bundler::DEFAULT_TARGET.to_string()
}

pub fn default_max_modules() -> usize {
    satchel_bundler::DEFAULT_MAX_MODULES
}

pub fn default_output_path() -> PathBuf {
    PathBuf::from("dist")
}

pub fn default_output_filename() -> String {
    "bundle.js".to_string()
}
