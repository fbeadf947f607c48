//! Remover — deletes a package nothing depends on.

use tracing::debug;

use crate::error::Result;
use crate::graph::GraphStore;

#[derive(Debug, Default, Clone, Copy)]
pub struct Remover;

impl Remover {
    pub fn new() -> Self {
        Self
    }

    /// Remove `name` from the index.
    ///
    /// Removing a package that is not indexed succeeds. Removal is refused
    /// (`Ok(false)`) while any indexed package depends on `name`.
    pub fn remove<S: GraphStore + ?Sized>(&self, store: &mut S, name: &str) -> Result<bool> {
        if !store.has_entity(name)? {
            debug!(name, "remove of non-indexed package");
            return Ok(true);
        }

        if store.has_parents(name)? {
            debug!(name, "package has dependents, not removed");
            return Ok(false);
        }

        store.remove_entity(name)
    }
}
