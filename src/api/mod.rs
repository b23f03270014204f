//! HTTP API.
//!
//! Exposes the diagnosis, expert and reservation stores as JSON
//! endpoints. `api_router()` returns a composable `Router`; `server`
//! owns bind and shutdown.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{serve, start_api_server_on, ApiServer, ServerError, ServerSession};
pub use types::ApiContext;
