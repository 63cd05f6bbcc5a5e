//! Error types for the Satchel CLI.
//!
//! `CliError` is what commands return. `ConfigError` and `BuildError` carry
//! the domain detail and end their messages with a `Hint:` line telling the
//! user what to change.

mod miette;

pub use self::miette::cli_error_to_miette;

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The build or the output write failed
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors outside the bundler runtime
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist
    #[error("Config file not found: {}\n\nHint: Create satchel.config.json or pass an existing file to --config", .0.display())]
    NotFound(PathBuf),

    /// Missing required configuration field
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing field
        field: String,
        /// How to provide it
        hint: String,
    },

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with the invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Accepted values
        hint: String,
    },
}

/// Build process errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Entry module does not exist under the project root
    #[error("Entry point not found: {}\n\nHint: Check the 'entry' field in your config or the ENTRY argument", .0.display())]
    EntryNotFound(PathBuf),

    /// An import could not be resolved
    #[error("Failed to resolve module: {module}\n\nImported from: {importer}\n\nHint: {hint}")]
    ResolutionFailed {
        /// The specifier as written
        module: String,
        /// Canonical path of the importing module
        importer: String,
        /// How to fix it
        hint: String,
    },

    /// A module failed to parse or compile
    #[error("Transform error in {file}: {error}\n\nHint: Fix the syntax error or lower the --target requirements")]
    TransformError {
        /// Canonical path of the module
        file: String,
        /// The compiler's message
        error: String,
    },

    /// The bundle could not be written
    #[error("Failed to write bundle: {0}\n\nHint: Check output directory permissions")]
    WriteFailed(String),

    /// Any other bundler failure
    #[error("{0}")]
    Bundler(#[from] satchel_bundler::Error),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;
