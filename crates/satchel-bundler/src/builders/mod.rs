//! Build pipeline: options in, graph and bundle out.

mod options;
mod output;

pub use options::BuildOptions;
pub use output::{BuildResult, BuildStats};

use std::sync::Arc;
use std::time::Instant;

use satchel_graph::{GraphBuilder, GraphConfig, NativeRuntime, Runtime};
use tracing::info;

use crate::Result;
use crate::emit::emit;

/// Build the graph for `options.entry` and emit the bundle.
///
/// Either the whole graph is built and emitted, or an error is returned.
/// Nothing is written to disk here.
pub async fn build(options: BuildOptions) -> Result<BuildResult> {
    options.validate()?;
    let started = Instant::now();

    let runtime: Arc<dyn Runtime> = options
        .runtime
        .clone()
        .unwrap_or_else(|| Arc::new(NativeRuntime::new()));
    let compiler = options.resolve_compiler()?;

    let mut config = GraphConfig::default().with_max_modules(options.max_modules);
    config.root = options.root.clone();

    let builder = GraphBuilder::new(config, compiler, Arc::clone(&runtime));
    let graph = builder.build(&options.entry).await?;
    let bundle = emit(&graph, graph.entry())?;

    let stats = BuildStats {
        module_count: graph.len(),
        edge_count: graph.edge_count(),
        bundle_size: bundle.len(),
        duration: started.elapsed(),
    };
    info!(
        entry = %graph.entry(),
        modules = stats.module_count,
        bytes = stats.bundle_size,
        "build finished"
    );

    Ok(BuildResult {
        graph,
        bundle,
        stats,
        runtime,
    })
}
