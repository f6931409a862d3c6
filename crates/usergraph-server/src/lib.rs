//! HTTP server for usergraph.
//!
//! Maps REST routes onto the [`usergraph_core::UserGraph`] operations and
//! reports each [`usergraph_core::GraphError`] kind as its own status code.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{AppState, HealthResponse, UserInput};
pub use server::UserGraphServer;
