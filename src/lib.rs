//! # pkgindex
//!
//! An in-memory index of packages and their dependencies, served over a
//! line-oriented TCP protocol.
//!
//! ## Protocol
//!
//! - `INDEX|name|dep1,dep2` — add or replace `name`; `FAIL` until every
//!   dependency is indexed.
//! - `REMOVE|name|` — remove `name`; `FAIL` while anything depends on it,
//!   `OK` if it was never indexed.
//! - `QUERY|name|` — `OK` if `name` is indexed, `FAIL` otherwise.
//!
//! Malformed lines are answered with `ERROR`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pkgindex::{Config, IndexServer, IndexService};
//! use std::sync::Arc;
//!
//! # async fn run() -> pkgindex::Result<()> {
//! let service = Arc::new(IndexService::new());
//! let server = IndexServer::bind(&Config::default(), service).await?;
//! server.serve().await
//! # }
//! ```

pub mod config;
pub mod daemon;
pub mod error;
pub mod graph;
pub mod lock;
pub mod logging;
pub mod operation;
pub mod service;

// Re-exports for convenience
pub use config::Config;
pub use daemon::{parse_request, IndexClient, IndexServer, Request, Response};
pub use error::{IndexError, Result};
pub use graph::{Entity, GraphStore, IndexStats, MapIndexStore};
pub use logging::LogLevel;
pub use service::IndexService;
