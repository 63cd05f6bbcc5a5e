use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use satchel_graph::{CanonicalPath, ModuleGraph, Runtime};
use serde::Serialize;

use crate::Result;

/// Result of a build operation.
///
/// Contains the module graph, the emitted bundle text and build metadata.
/// Nothing has been written to disk yet; call [`BuildResult::write_to`].
#[derive(Debug)]
pub struct BuildResult {
    /// Module graph the bundle was emitted from.
    pub graph: ModuleGraph,

    /// The bundle script.
    pub bundle: String,

    /// Build statistics.
    pub stats: BuildStats,

    pub(crate) runtime: Arc<dyn Runtime>,
}

/// Summary numbers for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub module_count: usize,
    pub edge_count: usize,
    pub bundle_size: usize,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl BuildResult {
    /// Canonical path of the entry module.
    pub fn entry(&self) -> &CanonicalPath {
        self.graph.entry()
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Atomically write the bundle to `path`, creating parent directories.
    ///
    /// Returns the absolute path that was written.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        crate::output::write_bundle(self.runtime.as_ref(), path.as_ref(), &self.bundle).await
    }
}
