use crate::cli::BuildArgs;
use crate::config::{BundleConfig, OutputConfig};
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config files looked up in the current directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["satchel.config.json", "satchel.config.toml"];

/// Prefix for environment overrides. Nested keys use `__`, so
/// `SATCHEL_OUTPUT__FILENAME` sets `output.filename`.
pub const ENV_PREFIX: &str = "SATCHEL_";

/// Only the values actually passed on the command line.
#[derive(Debug, Default, Serialize)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    entry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<OutputOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_modules: Option<usize>,
}

#[derive(Debug, Default, Serialize)]
struct OutputOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<String>,
}

impl BundleConfig {
    /// Load configuration from multiple sources.
    /// Priority: CLI args > environment variables > config file > defaults
    ///
    /// # Errors
    ///
    /// `ConfigError::NotFound` when `--config` names a missing file, and
    /// `ConfigError::InvalidValue` when any layer fails to parse or has the
    /// wrong shape.
    pub fn load(args: &BuildArgs) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default_config()));

        if let Some(path) = config_file(args.config.as_deref())? {
            debug!(config = %path.display(), "loading config file");
            figment = if has_extension(&path, "toml") {
                figment.merge(Toml::file(path))
            } else {
                figment.merge(Json::file(path))
            };
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        figment = figment.merge(Serialized::defaults(CliOverrides::from_args(args)));

        figment.extract().map_err(|e| {
            ConfigError::InvalidValue {
                field: "configuration".to_string(),
                value: e.to_string(),
                hint: "Check satchel.config.json syntax and field types".to_string(),
            }
            .into()
        })
    }

    /// Built-in defaults, the lowest layer.
    pub(crate) fn default_config() -> Self {
        Self {
            entry: None,
            output: OutputConfig::default(),
            root: None,
            target: super::default_target(),
            max_modules: super::default_max_modules(),
        }
    }
}

impl CliOverrides {
    fn from_args(args: &BuildArgs) -> Self {
        Self {
            entry: args.entry.clone(),
            output: args.output.as_deref().map(OutputOverrides::from_file),
            root: args.root.clone(),
            target: args.target.clone(),
            max_modules: args.max_modules,
        }
    }
}

impl OutputOverrides {
    /// `-o dir/name.js` sets both the directory and the file name.
    fn from_file(file: &Path) -> Self {
        let path = match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self {
            path: Some(path),
            filename: file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
        }
    }
}

/// The explicit `--config` file, or the first default file that exists.
fn config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        return Ok(Some(path.to_path_buf()));
    }

    Ok(CONFIG_FILE_NAMES
        .iter()
        .map(Path::new)
        .find(|path| path.is_file())
        .map(Path::to_path_buf))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
