//! Miette diagnostic conversion for CLI errors.

use crate::error::{BuildError, CliError};
use miette::Report;

/// Convert a `CliError` into a miette report for display.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert a `BuildError` into a miette report for display.
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::ResolutionFailed {
            module,
            importer,
            hint,
        } => miette::miette!(
            "Failed to resolve module: {}\nImported from: {}\n\nHint: {}",
            module,
            importer,
            hint
        ),
        BuildError::Bundler(e) => miette::miette!("Build failed: {}", e),
        _ => miette::miette!("{}", err),
    }
}
