//! Create, read, and update of single user nodes.
//!
//! These operations never touch edges except to read them.

use std::sync::Arc;

use tracing::{debug, info};
use usergraph_store::ObjectStore;
use usergraph_types::{validate_name, GraphNode, NewNode, NodeId, User};

use crate::error::GraphResult;
use crate::occ::{self, Mutation};

/// User operations over a shared store client.
pub struct UserService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for UserService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ObjectStore + ?Sized> UserService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a user node with no edges. The store assigns id and version.
    pub async fn create(&self, name: &str) -> GraphResult<GraphNode> {
        validate_name(name)?;
        let node = self.store.create(&NewNode::for_user(User::new(name))).await?;
        info!(id = %node.id, "user created");
        Ok(node)
    }

    /// Fetch a user node by id.
    pub async fn fetch(&self, id: &NodeId) -> GraphResult<GraphNode> {
        occ::fetch_existing(&*self.store, id).await
    }

    /// Rename a user, writing back with the version observed at fetch time.
    ///
    /// The whole node observed at fetch time is the baseline, so a concurrent
    /// edge change on the same node yields `VersionConflict`. Re-fetch and
    /// retry to resolve it.
    pub async fn update(&self, id: &NodeId, name: &str) -> GraphResult<GraphNode> {
        validate_name(name)?;
        let name = name.to_string();
        let mutation = occ::read_modify_write(&*self.store, id, |node| Ok(node.with_name(name))).await?;
        if let Mutation::Written(node) = &mutation {
            info!(id = %node.id, version = node.version, "user renamed");
        }
        Ok(mutation.into_node())
    }

    /// Users one edge hop away from `id`, in edge order.
    ///
    /// A neighbor that no longer exists fails the whole call with `NotFound`
    /// naming that neighbor.
    pub async fn connected_users(&self, id: &NodeId) -> GraphResult<Vec<User>> {
        let node = self.fetch(id).await?;
        let mut users = Vec::with_capacity(node.edges().len());
        for neighbor in node.edges() {
            debug!(%id, %neighbor, "resolving neighbor");
            users.push(self.fetch(neighbor).await?.user());
        }
        Ok(users)
    }
}
