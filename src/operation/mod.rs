//! Operation rules — the business policy layered over `GraphStore`.
//!
//! Each operation turns a request into a boolean outcome:
//! - `Ok(true)`: the request was applied (OK).
//! - `Ok(false)`: the request is legal but disallowed right now (FAIL).
//! - `Err(_)`: the store could not answer (ERROR).
//!
//! Operations hold no state of their own. They borrow the store for the
//! duration of one call, which the caller makes while holding the index lock.

pub mod indexer;
pub mod querier;
pub mod remover;

pub use indexer::Indexer;
pub use querier::Querier;
pub use remover::Remover;
