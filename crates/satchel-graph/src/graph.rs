//! The module graph: canonical path to module record, rooted at an entry.

use indexmap::IndexMap;
use serde::Serialize;

use crate::module::{CanonicalPath, ModuleRecord};

/// Violation of the graph's closure invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphIntegrityError {
    #[error("entry module '{0}' is not part of the graph")]
    MissingEntry(CanonicalPath),

    #[error("module '{from}' imports '{specifier}' as '{target}', which is not part of the graph")]
    DanglingEdge {
        from: CanonicalPath,
        specifier: String,
        target: CanonicalPath,
    },
}

/// Complete, deduplicated mapping of canonical paths to module records.
///
/// Modules iterate in discovery order (breadth-first from the entry), so two
/// builds of the same file set produce identical graphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleGraph {
    entry: CanonicalPath,
    modules: IndexMap<CanonicalPath, ModuleRecord>,
}

impl ModuleGraph {
    pub(crate) fn new(entry: CanonicalPath) -> Self {
        Self {
            entry,
            modules: IndexMap::new(),
        }
    }

    /// Assemble a graph from existing records without checking closure.
    ///
    /// Graphs produced by [`GraphBuilder`](crate::GraphBuilder) are always
    /// closed; hand-assembled ones can be checked with [`ModuleGraph::verify`].
    /// A later record with the same path replaces the earlier one.
    pub fn from_records(
        entry: CanonicalPath,
        records: impl IntoIterator<Item = ModuleRecord>,
    ) -> Self {
        let modules = records
            .into_iter()
            .map(|record| (record.path().clone(), record))
            .collect();
        Self { entry, modules }
    }

    pub(crate) fn insert(&mut self, record: ModuleRecord) {
        debug_assert!(!self.modules.contains_key(record.path()));
        self.modules.insert(record.path().clone(), record);
    }

    /// Canonical path of the root module.
    pub fn entry(&self) -> &CanonicalPath {
        &self.entry
    }

    pub fn get(&self, path: &CanonicalPath) -> Option<&ModuleRecord> {
        self.modules.get(path)
    }

    pub fn contains(&self, path: &CanonicalPath) -> bool {
        self.modules.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Records in discovery order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.values()
    }

    /// Canonical paths in discovery order.
    pub fn paths(&self) -> impl Iterator<Item = &CanonicalPath> {
        self.modules.keys()
    }

    /// Total number of specifier edges across all modules.
    pub fn edge_count(&self) -> usize {
        self.modules.values().map(|m| m.dependencies().len()).sum()
    }

    /// Check the entry and closure invariants.
    pub fn verify(&self) -> Result<(), GraphIntegrityError> {
        if !self.contains(&self.entry) {
            return Err(GraphIntegrityError::MissingEntry(self.entry.clone()));
        }

        for record in self.modules.values() {
            for (specifier, target) in record.dependencies() {
                if !self.contains(target) {
                    return Err(GraphIntegrityError::DanglingEdge {
                        from: record.path().clone(),
                        specifier: specifier.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
