//! Graph types — the per-package record kept by the store.

use std::collections::HashSet;

/// A package that has been indexed.
///
/// Both directions of every edge are kept as name sets so that neither
/// removal nor the dependents check needs to scan the whole index:
/// - `dependencies` lets a removal unregister the package from each
///   dependency's parents.
/// - `parents` answers "can this be removed?" in O(1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entity {
    dependencies: HashSet<String>,
    parents: HashSet<String>,
}

impl Entity {
    pub fn new(dependencies: HashSet<String>) -> Self {
        Self {
            dependencies,
            parents: HashSet::new(),
        }
    }

    /// Names this package declares it needs.
    pub fn dependencies(&self) -> &HashSet<String> {
        &self.dependencies
    }

    /// Names of indexed packages that currently depend on this one.
    pub fn parents(&self) -> &HashSet<String> {
        &self.parents
    }

    pub fn has_parents(&self) -> bool {
        !self.parents.is_empty()
    }

    pub(crate) fn add_parent(&mut self, name: &str) {
        self.parents.insert(name.to_string());
    }

    pub(crate) fn remove_parent(&mut self, name: &str) {
        self.parents.remove(name);
    }

    pub(crate) fn take_dependencies(&mut self) -> HashSet<String> {
        std::mem::take(&mut self.dependencies)
    }

    pub(crate) fn set_dependencies(&mut self, dependencies: HashSet<String>) {
        self.dependencies = dependencies;
    }
}

/// Size of the index at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub package_count: usize,
    pub edge_count: usize,
}

impl std::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} packages, {} dependency edges",
            self.package_count, self.edge_count
        )
    }
}
