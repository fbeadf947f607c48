//! Graph store — the name-keyed map of indexed packages.
//!
//! `GraphStore` is the seam between the operation rules and the storage
//! choice. Every edge is recorded on both ends (`dependencies` on the
//! dependent, `parents` on the dependency) and every lookup re-resolves
//! through the map, so deleting a record can never leave a dangling
//! reference behind.

use std::collections::{HashMap, HashSet};
use tracing::trace;

use super::types::{Entity, IndexStats};
use crate::error::{IndexError, Result};

/// Low-level storage operations for the index.
///
/// The store enforces its own invariant: it refuses to record an edge to a
/// package that is not indexed, and refuses to delete a package that still
/// has dependents. Business outcomes (FAIL) are decided one layer up, in
/// `crate::operation`; reaching these errors means the caller skipped a check.
pub trait GraphStore {
    /// Create or overwrite `name` with exactly `dependencies`.
    ///
    /// Overwriting detaches the old dependency set first and keeps the
    /// package's own parents.
    fn add_entity(&mut self, name: &str, dependencies: &[String]) -> Result<bool>;

    /// Delete `name` and unregister it from each dependency's parents.
    fn remove_entity(&mut self, name: &str) -> Result<bool>;

    fn has_entity(&self, name: &str) -> Result<bool>;

    /// Whether any indexed package depends on `name`.
    ///
    /// Asking about a package that was never indexed is an error.
    fn has_parents(&self, name: &str) -> Result<bool>;
}

/// `GraphStore` backed by a single `HashMap`.
#[derive(Debug, Default)]
pub struct MapIndexStore {
    entities: HashMap<String, Entity>,
}

impl MapIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            package_count: self.entities.len(),
            edge_count: self.entities.values().map(|e| e.dependencies().len()).sum(),
        }
    }

    /// Drop `name`'s outgoing edges, leaving the record and its parents.
    fn detach_dependencies(&mut self, name: &str) {
        let old = match self.entities.get_mut(name) {
            Some(entity) => entity.take_dependencies(),
            None => return,
        };
        for dependency in &old {
            if let Some(dep) = self.entities.get_mut(dependency) {
                dep.remove_parent(name);
            }
        }
    }
}

impl GraphStore for MapIndexStore {
    fn add_entity(&mut self, name: &str, dependencies: &[String]) -> Result<bool> {
        if let Some(missing) = dependencies
            .iter()
            .find(|dep| !self.entities.contains_key(dep.as_str()))
        {
            return Err(IndexError::UnknownDependency {
                name: name.to_string(),
                dependency: missing.clone(),
            });
        }

        self.detach_dependencies(name);

        let dependencies: HashSet<String> = dependencies.iter().cloned().collect();
        for dependency in &dependencies {
            // A self-edge is kept on the dependency side only; it never
            // blocks the package's own removal.
            if dependency == name {
                continue;
            }
            if let Some(dep) = self.entities.get_mut(dependency) {
                dep.add_parent(name);
            }
        }

        match self.entities.get_mut(name) {
            Some(entity) => entity.set_dependencies(dependencies),
            None => {
                self.entities
                    .insert(name.to_string(), Entity::new(dependencies));
            }
        }

        trace!(name, packages = self.entities.len(), "package stored");
        Ok(true)
    }

    fn remove_entity(&mut self, name: &str) -> Result<bool> {
        let entity = self
            .entities
            .get(name)
            .ok_or_else(|| IndexError::NotIndexed(name.to_string()))?;
        if entity.has_parents() {
            return Err(IndexError::HasDependents {
                name: name.to_string(),
                count: entity.parents().len(),
            });
        }

        self.detach_dependencies(name);
        self.entities.remove(name);

        trace!(name, packages = self.entities.len(), "package deleted");
        Ok(true)
    }

    fn has_entity(&self, name: &str) -> Result<bool> {
        Ok(self.entities.contains_key(name))
    }

    fn has_parents(&self, name: &str) -> Result<bool> {
        self.entities
            .get(name)
            .map(Entity::has_parents)
            .ok_or_else(|| IndexError::NotIndexed(name.to_string()))
    }
}
