//! Atomic bundle writing.
//!
//! The bundle is written next to its destination under a `.tmp` name and
//! then renamed over the target, so a reader never observes a half-written
//! file and a failed build leaves any previous bundle untouched.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use satchel_graph::Runtime;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Write `contents` to `path` through `runtime`, creating parent directories.
///
/// A relative `path` is taken relative to the runtime's working directory.
pub async fn write_bundle(runtime: &dyn Runtime, path: &Path, contents: &str) -> Result<PathBuf> {
    let target = validate_output_path(runtime, path)?;

    if let Some(parent) = target.parent() {
        runtime.create_dir(parent, true).await.map_err(|e| {
            Error::WriteFailure(format!(
                "Failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp = temp_path_for(&target);
    if let Err(e) = runtime.write_file(&temp, contents.as_bytes()).await {
        cleanup_temp_file(runtime, &temp).await;
        return Err(Error::WriteFailure(format!(
            "Failed to write temporary file '{}': {}",
            temp.display(),
            e
        )));
    }

    if let Err(e) = runtime.rename(&temp, &target).await {
        cleanup_temp_file(runtime, &temp).await;
        return Err(Error::WriteFailure(format!(
            "Failed to rename '{}' to '{}': {}",
            temp.display(),
            target.display(),
            e
        )));
    }

    debug!(path = %target.display(), bytes = contents.len(), "wrote bundle");
    Ok(target)
}

fn validate_output_path(runtime: &dyn Runtime, path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidOutputPath("output path is empty".to_string()));
    }
    if path.to_string_lossy().contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        runtime
            .get_cwd()
            .map_err(|e| {
                Error::InvalidOutputPath(format!("Failed to get current directory: {}", e))
            })?
            .join(path)
    };

    let cleaned = absolute.clean();
    if cleaned.file_name().is_none() {
        return Err(Error::InvalidOutputPath(format!(
            "'{}' does not name a file",
            path.display()
        )));
    }
    Ok(cleaned)
}

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    target.with_file_name(name)
}

/// Best-effort cleanup; we are already returning an error.
async fn cleanup_temp_file(runtime: &dyn Runtime, temp: &Path) {
    if let Err(e) = runtime.remove_file(temp).await {
        warn!(path = %temp.display(), error = %e, "failed to clean up temporary file");
    }
}
