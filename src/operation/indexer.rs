//! Indexer — adds or replaces a package.

use tracing::{debug, error};

use crate::error::Result;
use crate::graph::GraphStore;

/// Adds a package to the index once every dependency is present.
#[derive(Debug, Default, Clone, Copy)]
pub struct Indexer;

impl Indexer {
    pub fn new() -> Self {
        Self
    }

    /// Index `name` with `dependencies`.
    ///
    /// Returns `Ok(false)` when any dependency is not indexed yet. An
    /// already indexed package is replaced: its old dependency links are
    /// cleared before the new set is installed.
    pub fn index<S: GraphStore + ?Sized>(
        &self,
        store: &mut S,
        name: &str,
        dependencies: &[String],
    ) -> Result<bool> {
        for dependency in dependencies {
            let present = store.has_entity(dependency).map_err(|e| {
                error!(name, dependency = %dependency, error = %e, "dependency lookup failed");
                e
            })?;
            if !present {
                debug!(name, dependency = %dependency, "missing dependency, not indexed");
                return Ok(false);
            }
        }

        let exists = store.has_entity(name).map_err(|e| {
            error!(name, error = %e, "package lookup failed");
            e
        })?;
        if exists {
            debug!(name, "replacing dependencies of indexed package");
        }

        store.add_entity(name, dependencies)
    }
}
