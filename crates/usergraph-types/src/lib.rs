//! Graph node model for usergraph.
//!
//! Every user in the social graph is stored as one versioned object in an
//! external object store. This crate describes the in-memory shape of those
//! objects and the pure (no I/O) operations on their edge lists. Every other
//! usergraph crate depends on `usergraph-types`.
//!
//! # Key Types
//!
//! - [`NodeId`] — Store-assigned identity of a node
//! - [`User`] — The user record embedded in a node
//! - [`GraphNode`] — A stored object: identity, version, user, and edges
//! - [`NewNode`] — Creation payload submitted before the store assigns an id
//!
//! # Invariants
//!
//! - A node's `id` never changes after creation.
//! - `edges` never contains the node's own id and never contains a neighbor
//!   twice. [`GraphNode::with_edge_added`] is the only way edges grow.
//! - The `version` read from the store is echoed back unchanged on writes.

pub mod error;
pub mod id;
pub mod node;
pub mod user;

pub use error::TypeError;
pub use id::NodeId;
pub use node::{GraphNode, GraphPayload, NewNode};
pub use user::{validate_name, User};
