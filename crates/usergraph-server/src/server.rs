use std::sync::Arc;

use tokio::net::TcpListener;
use usergraph_core::UserGraph;
use usergraph_store::{HttpObjectStore, ObjectStore};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// usergraph HTTP server.
pub struct UserGraphServer {
    config: ServerConfig,
    graph: AppState,
}

impl UserGraphServer {
    /// Serve against the remote object store named in `config`.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = HttpObjectStore::new(&config.store)?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Serve against any store backend.
    pub fn with_store(config: ServerConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            config,
            graph: UserGraph::new(store),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Location of the store this server reads and writes.
    pub fn store_location(&self) -> String {
        self.graph.users().store().location()
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.graph.clone())
    }

    /// Start serving requests until ctrl-c.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            "usergraph server listening on {} (store: {})",
            self.config.bind_addr,
            self.store_location()
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use usergraph_store::{InMemoryObjectStore, StoreConfig, StoreError};

    #[test]
    fn server_construction() {
        let server = UserGraphServer::new(ServerConfig::default()).unwrap();
        assert_eq!(server.config().bind_addr, "127.0.0.1:8080".parse().unwrap());
    }

    #[test]
    fn invalid_store_url_is_rejected() {
        let config = ServerConfig {
            store: StoreConfig::new("not a url"),
            ..ServerConfig::default()
        };
        let err = UserGraphServer::new(config).err().unwrap();
        assert!(matches!(err, ServerError::Store(StoreError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn router_builds() {
        let server =
            UserGraphServer::with_store(ServerConfig::default(), Arc::new(InMemoryObjectStore::new()));
        let _router = server.router();
    }

    #[test]
    fn store_location_reflects_backend() {
        let in_memory =
            UserGraphServer::with_store(ServerConfig::default(), Arc::new(InMemoryObjectStore::new()));
        assert_eq!(in_memory.store_location(), "in-memory");

        let remote = UserGraphServer::new(ServerConfig::default()).unwrap();
        assert_eq!(remote.store_location(), "http://127.0.0.1:8085/objects");
    }
}
