//! Graph mutation layer for usergraph.
//!
//! Users and their connections are stored as independently versioned objects
//! in an external store (see `usergraph-store`). This crate implements the
//! operations on top of that store:
//!
//! - [`occ`] — fetch, transform, write-with-version, surface conflict
//! - [`users`] — create, read, and rename single user nodes
//! - [`connection`] — the two-sided connection protocol
//! - [`api`] — the [`UserGraph`] facade handed to the routing layer
//!
//! No node state lives in-process between calls, so nothing here takes a
//! lock. Correctness rests on the store's per-object version check, and
//! retries are always the caller's decision.

pub mod api;
pub mod connection;
pub mod error;
pub mod occ;
pub mod users;

#[cfg(test)]
mod testing;

pub use api::UserGraph;
pub use connection::{ConnectReport, ConnectionCoordinator, Link, LinkOutcome};
pub use error::{GraphError, GraphResult};
pub use occ::Mutation;
pub use users::UserService;
