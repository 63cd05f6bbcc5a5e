//! Source reading with size validation.

use std::path::Path;

use crate::runtime::Runtime;

use super::GraphBuildError;

/// Read a source file as UTF-8, rejecting anything larger than `max_size`.
pub(super) async fn read_source(
    path: &Path,
    max_size: usize,
    runtime: &dyn Runtime,
) -> Result<String, GraphBuildError> {
    // Check file size before reading
    if let Ok(metadata) = runtime.metadata(path).await {
        if metadata.size > max_size as u64 {
            return Err(GraphBuildError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.size as usize,
                max: max_size,
            });
        }
    }

    let bytes = runtime
        .read_file(path)
        .await
        .map_err(|source| GraphBuildError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    // The file may have grown between the two calls
    if bytes.len() > max_size {
        return Err(GraphBuildError::FileTooLarge {
            path: path.to_path_buf(),
            size: bytes.len(),
            max: max_size,
        });
    }

    String::from_utf8(bytes).map_err(|e| GraphBuildError::InvalidUtf8 {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
