use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use usergraph_core::GraphError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("store error: {0}")]
    Store(#[from] usergraph_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// HTTP status reported to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Graph(e) => match e {
                GraphError::NotFound { .. } => StatusCode::NOT_FOUND,
                GraphError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                GraphError::VersionConflict { .. } | GraphError::PartialFailure { .. } => {
                    StatusCode::CONFLICT
                }
                GraphError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, [(CONTENT_TYPE, "text/plain")], self.to_string()).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
