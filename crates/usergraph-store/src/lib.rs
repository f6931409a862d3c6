//! Versioned object store client for usergraph.
//!
//! Graph nodes live in a separate networked object store keyed by id. Every
//! object carries a version number; the store rejects writes that submit a
//! stale version. This crate translates "fetch by id", "write with version",
//! and "create" into calls against that store and maps its status codes into
//! typed outcomes.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`HttpObjectStore`] -- `reqwest` client for the remote store
//! - [`InMemoryObjectStore`] -- versioned `HashMap` store for tests and demos
//!
//! # Design Rules
//!
//! 1. The client never retries. Retry policy belongs to the caller.
//! 2. "Not found" on read is `Ok(None)`, distinct from every failure.
//! 3. A stale write is [`StoreError::VersionConflict`], distinct from every
//!    other failure so callers can decide whether to retry.
//! 4. No node state is kept between calls.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use http::HttpObjectStore;
pub use memory::InMemoryObjectStore;
pub use traits::ObjectStore;
