//! Querier — reports whether a package is indexed.

use crate::error::Result;
use crate::graph::GraphStore;

#[derive(Debug, Default, Clone, Copy)]
pub struct Querier;

impl Querier {
    pub fn new() -> Self {
        Self
    }

    pub fn query<S: GraphStore + ?Sized>(&self, store: &S, name: &str) -> Result<bool> {
        store.has_entity(name)
    }
}
