//! Index lock — the single critical section around the graph store.
//!
//! Store operations are multi-step (a removal touches every former
//! dependency's parents; an index may replace an existing record), so
//! every request runs entirely inside one `with` call. At most one
//! operation, read or write, is ever in flight.

use std::sync::Mutex;

use crate::error::{IndexError, Result};

pub struct IndexLock<S> {
    inner: Mutex<S>,
}

impl<S> IndexLock<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Mutex::new(store),
        }
    }

    /// Run `f` with exclusive access to the store.
    pub fn with<T>(&self, f: impl FnOnce(&mut S) -> T) -> Result<T> {
        let mut guard = self.inner.lock().map_err(|_| IndexError::LockPoisoned)?;
        Ok(f(&mut guard))
    }

    pub fn into_inner(self) -> Result<S> {
        self.inner.into_inner().map_err(|_| IndexError::LockPoisoned)
    }
}
