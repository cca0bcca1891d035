//! Read-only JSON API over the explorer operations.
//!
//! Routes are nested under `/api/`. `explorer_router()` returns a `Router`
//! that can be mounted on any axum server; `server` owns the listener.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::explorer_router;
pub use server::{serve, start_explorer_server_on, ExplorerServer};
pub use types::ApiContext;
