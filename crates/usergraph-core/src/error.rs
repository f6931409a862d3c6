//! Error taxonomy for graph operations.

use thiserror::Error;
use usergraph_store::StoreError;
use usergraph_types::{NodeId, TypeError};

use crate::connection::Link;

/// Errors returned by user operations and the connection coordinator.
///
/// Every failure is distinguishable by kind so the boundary layer can pick
/// an external status. Nothing here is ever retried automatically.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The requested id does not exist in the store.
    #[error("user not found: {id}")]
    NotFound { id: NodeId },

    /// A write carried a stale version.
    #[error("version conflict on {id}: version {version} is stale")]
    VersionConflict { id: NodeId, version: u64 },

    /// The request can never succeed as stated.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// One direction of a connection was confirmed and the other was not.
    #[error("partial failure: {completed} complete, {pending} pending: {cause}")]
    PartialFailure {
        completed: Link,
        pending: Link,
        cause: Box<GraphError>,
    },

    /// The object store failed or answered unexpectedly.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl GraphError {
    /// Returns `true` if re-issuing the same operation may succeed.
    ///
    /// Re-issuing `connect` after a partial failure is always safe because
    /// edge insertion is idempotent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::VersionConflict { .. } | Self::PartialFailure { .. } => true,
            Self::Store(e) => e.is_retryable(),
            Self::NotFound { .. } | Self::InvalidRequest(_) => false,
        }
    }
}

impl From<StoreError> for GraphError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => Self::NotFound { id },
            StoreError::VersionConflict { id, version } => Self::VersionConflict { id, version },
            other => Self::Store(other),
        }
    }
}

impl From<TypeError> for GraphError {
    fn from(e: TypeError) -> Self {
        Self::InvalidRequest(e.to_string())
    }
}

/// Result alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
