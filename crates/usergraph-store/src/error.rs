use usergraph_types::NodeId;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write targeted an id the store does not know.
    #[error("object not found: {0}")]
    NotFound(NodeId),

    /// The submitted version is stale; someone else wrote the object first.
    #[error("version conflict on {id}: version {version} is stale")]
    VersionConflict { id: NodeId, version: u64 },

    /// The store answered with a status this client does not expect.
    #[error("object store returned: {status} Response body:\n{body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Network failure, including the per-request timeout.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store's response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot address objects.
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Failure inside a local backend.
    #[error("internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Returns `true` if re-issuing the operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionConflict { .. } | Self::Transport(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
