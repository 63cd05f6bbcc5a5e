//! Build command implementation.
//!
//! `satchel build` loads the layered configuration, runs the bundler, and
//! writes the bundle. Nothing is written when any step before the write
//! fails.

use crate::cli::BuildArgs;
use crate::config::BundleConfig;
use crate::error::{BuildError, CliError, Result};
use crate::ui;
use satchel_bundler::{BuildOptions, BuildResult, GraphBuildError, ResolutionError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Execute the build command.
///
/// # Build Process
///
/// 1. Load and validate configuration (CLI > Env > File > Defaults)
/// 2. Build the module graph and emit the bundle
/// 3. Write the bundle to `output.path/output.filename`
/// 4. Print a summary
///
/// # Errors
///
/// Returns errors for invalid configuration, a missing entry, unresolvable
/// imports, compile failures and write failures.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let config = BundleConfig::load(&args)?;
    let entry = config.validate()?;

    let cwd = std::env::current_dir()?;
    let root = config.resolved_root(&cwd);
    let output = config.output.file();
    debug!(root = %root.display(), entry, output = %output.display(), "resolved build configuration");

    ui::info(&format!("Bundling {entry}"));
    let result = build(&config, entry, &root).await?;
    let written = write(&result, &output).await?;

    ui::success("Build completed");
    ui::print_build_summary(&display_path(&written, &cwd), &result.stats);
    Ok(())
}

/// Build the bundle in memory.
pub async fn build(config: &BundleConfig, entry: &str, root: &Path) -> Result<BuildResult> {
    BuildOptions::new(entry)
        .root(root)
        .target(config.target.as_str())
        .max_modules(Some(config.max_modules))
        .build()
        .await
        .map_err(|err| CliError::Build(classify(err)))
}

async fn write(result: &BuildResult, output: &Path) -> Result<PathBuf> {
    result.write_to(output).await.map_err(|err| match err {
        satchel_bundler::Error::InvalidOutputPath(msg) => CliError::InvalidArgument(msg),
        satchel_bundler::Error::WriteFailure(msg) => BuildError::WriteFailed(msg).into(),
        other => BuildError::Bundler(other).into(),
    })
}

/// Map bundler failures onto the CLI's hinted build errors.
fn classify(err: satchel_bundler::Error) -> BuildError {
    match err {
        satchel_bundler::Error::Graph(GraphBuildError::Entry {
            source: ResolutionError::NotFound { path, .. },
            ..
        }) => BuildError::EntryNotFound(path),
        satchel_bundler::Error::Graph(GraphBuildError::Resolution {
            importer,
            specifier,
            source,
        }) => {
            let hint = resolution_hint(&source).to_string();
            BuildError::ResolutionFailed {
                module: specifier,
                importer: importer.to_string(),
                hint,
            }
        }
        satchel_bundler::Error::Graph(GraphBuildError::Compile { path, source }) => {
            BuildError::TransformError {
                file: path.to_string(),
                error: source.to_string(),
            }
        }
        other => BuildError::Bundler(other),
    }
}

fn resolution_hint(err: &ResolutionError) -> &'static str {
    match err {
        ResolutionError::NotFound { .. } => {
            "Import paths must name an existing file, including its extension"
        }
        ResolutionError::BareSpecifier { .. } => {
            "Only relative ('./x.js') and root-absolute ('/x.js') imports can be bundled"
        }
        ResolutionError::OutsideRoot { .. } => {
            "Imports may not leave the project root; pass a wider --root"
        }
        ResolutionError::Runtime { .. } => "Check file permissions under the project root",
    }
}

/// `path` relative to `cwd` when it lies inside it.
fn display_path(path: &Path, cwd: &Path) -> PathBuf {
    path.strip_prefix(cwd)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
