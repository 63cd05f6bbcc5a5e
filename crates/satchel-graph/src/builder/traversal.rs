//! Breadth-first discovery of the module graph.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::compiler::CompilerService;
use crate::graph::ModuleGraph;
use crate::module::{CanonicalPath, DependencyMap, ModuleRecord};
use crate::resolver::ModuleResolver;
use crate::runtime::Runtime;

use super::GraphBuildError;
use super::reader::read_source;

pub(super) struct Traversal<'a> {
    pub resolver: &'a ModuleResolver,
    pub compiler: &'a dyn CompilerService,
    pub runtime: &'a dyn Runtime,
    pub max_modules: Option<usize>,
    pub max_file_size: usize,
}

impl Traversal<'_> {
    /// Process the work list until it is empty.
    ///
    /// A path is enqueued only when it is neither in the graph nor already
    /// queued, so every canonical path is read and compiled at most once and
    /// import cycles terminate.
    pub async fn run(&self, entry: CanonicalPath) -> Result<ModuleGraph, GraphBuildError> {
        let mut graph = ModuleGraph::new(entry.clone());
        let mut enqueued = FxHashSet::default();
        let mut queue = VecDeque::new();

        enqueued.insert(entry.clone());
        queue.push_back(entry);

        while let Some(current) = queue.pop_front() {
            if graph.contains(&current) {
                continue;
            }

            if let Some(max) = self.max_modules {
                if graph.len() >= max {
                    return Err(GraphBuildError::TooManyModules {
                        count: graph.len() + 1,
                        max,
                    });
                }
            }

            let path = current.to_path(self.resolver.root());
            let source = read_source(&path, self.max_file_size, self.runtime).await?;
            let compiled = self
                .compiler
                .analyze(&path, &source)
                .map_err(|source| GraphBuildError::Compile {
                    path: current.clone(),
                    source,
                })?;

            let mut dependencies = DependencyMap::with_capacity(compiled.import_specifiers.len());
            for specifier in compiled.import_specifiers {
                let target = self
                    .resolver
                    .resolve(&current, &specifier, self.runtime)
                    .await
                    .map_err(|source| GraphBuildError::Resolution {
                        importer: current.clone(),
                        specifier: specifier.clone(),
                        source,
                    })?;

                if !graph.contains(&target) && enqueued.insert(target.clone()) {
                    queue.push_back(target.clone());
                }
                dependencies.insert(specifier, target);
            }

            debug!(
                module = %current,
                dependencies = dependencies.len(),
                "added module to graph"
            );
            graph.insert(
                ModuleRecord::new(current, compiled.code, dependencies)
                    .with_helpers(compiled.helpers),
            );
        }

        Ok(graph)
    }
}
