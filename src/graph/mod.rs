//! Graph module — the dependency graph store.
//!
//! Packages are keyed by name; dependency and dependent (parent) relations
//! are name sets on each record rather than live references.

pub mod store;
pub mod types;

pub use store::{GraphStore, MapIndexStore};
pub use types::{Entity, IndexStats};
