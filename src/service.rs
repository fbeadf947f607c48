//! Index service — dispatches validated requests to the operation rules.
//!
//! The service owns the store behind an `IndexLock`; each request is
//! handled from lookup to outcome while holding it, so the stream of
//! requests from all connections is applied in one total order.

use tracing::{debug, error, trace};

use crate::daemon::protocol::{Request, Response};
use crate::error::Result;
use crate::graph::{GraphStore, MapIndexStore};
use crate::lock::IndexLock;
use crate::operation::{Indexer, Querier, Remover};

pub struct IndexService<S = MapIndexStore> {
    lock: IndexLock<S>,
    indexer: Indexer,
    remover: Remover,
    querier: Querier,
}

impl IndexService<MapIndexStore> {
    pub fn new() -> Self {
        Self::with_store(MapIndexStore::new())
    }
}

impl Default for IndexService<MapIndexStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GraphStore> IndexService<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            lock: IndexLock::new(store),
            indexer: Indexer::new(),
            remover: Remover::new(),
            querier: Querier::new(),
        }
    }

    /// Apply one request and return its boolean outcome.
    pub fn dispatch(&self, request: &Request) -> Result<bool> {
        self.lock.with(|store| match request {
            Request::Index { name, dependencies } => {
                self.indexer.index(store, name, dependencies)
            }
            Request::Remove { name } => self.remover.remove(store, name),
            Request::Query { name } => self.querier.query(&*store, name),
        })?
    }

    /// Apply one request and map its outcome to a wire response.
    pub fn process(&self, request: &Request) -> Response {
        trace!(?request, "dispatching");
        let outcome = self.dispatch(request);
        let response = Response::from_outcome(&outcome);
        match &outcome {
            Ok(_) => debug!(
                verb = request.verb(),
                name = request.name(),
                response = %response,
                "request handled"
            ),
            Err(e) if e.is_store_inconsistency() => error!(
                verb = request.verb(),
                name = request.name(),
                error = %e,
                "store inconsistency"
            ),
            Err(e) => error!(verb = request.verb(), error = %e, "request failed"),
        }
        response
    }

    /// Read the store under the same lock requests use.
    pub fn inspect<T>(&self, f: impl FnOnce(&S) -> T) -> Result<T> {
        self.lock.with(|store| f(store))
    }
}
