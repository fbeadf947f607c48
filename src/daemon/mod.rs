//! Daemon module — the network face of the index.
//!
//! ```text
//! ┌──────────────┐  VERB|NAME|DEPS\n   ┌────────────────────────┐
//! │ client conn  │ ──────────────────▶ │ handle_client (1/conn) │
//! │   (n tasks)  │ ◀────────────────── │  throttle → validate   │
//! └──────────────┘   OK / FAIL / ERROR └───────────┬────────────┘
//!                                                  │ mpsc + oneshot
//!                                                  ▼
//!                                      ┌────────────────────────┐
//!                                      │ dispatcher (1 task)    │
//!                                      │  IndexService::process │
//!                                      └────────────────────────┘
//! ```

pub mod client;
pub mod protocol;
pub mod server;
pub mod throttle;

pub use client::IndexClient;
pub use protocol::{parse_request, Request, Response, ValidationError};
pub use server::IndexServer;
pub use throttle::Throttler;
