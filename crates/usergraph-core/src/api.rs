//! Transport-agnostic API surface handed to the routing layer.

use std::sync::Arc;

use usergraph_store::ObjectStore;
use usergraph_types::{NodeId, User};

use crate::connection::{ConnectReport, ConnectionCoordinator, LinkOutcome};
use crate::error::GraphResult;
use crate::users::UserService;

/// The user graph as seen by callers: users in, users out.
///
/// Node versions and edge lists stay behind this type; callers only ever see
/// [`User`] records with their ids filled in.
pub struct UserGraph<S: ?Sized> {
    users: UserService<S>,
    connections: ConnectionCoordinator<S>,
}

impl<S: ?Sized> Clone for UserGraph<S> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            connections: self.connections.clone(),
        }
    }
}

impl<S: ObjectStore + ?Sized> UserGraph<S> {
    pub fn new(store: Arc<S>) -> Self {
        let users = UserService::new(store);
        let connections = ConnectionCoordinator::with_users(users.clone());
        Self { users, connections }
    }

    pub fn users(&self) -> &UserService<S> {
        &self.users
    }

    pub fn connections(&self) -> &ConnectionCoordinator<S> {
        &self.connections
    }

    pub async fn find_user(&self, id: &NodeId) -> GraphResult<User> {
        Ok(self.users.fetch(id).await?.user())
    }

    pub async fn create_user(&self, name: &str) -> GraphResult<User> {
        Ok(self.users.create(name).await?.user())
    }

    pub async fn update_user(&self, id: &NodeId, name: &str) -> GraphResult<User> {
        Ok(self.users.update(id, name).await?.user())
    }

    pub async fn list_connected_users(&self, id: &NodeId) -> GraphResult<Vec<User>> {
        self.users.connected_users(id).await
    }

    pub async fn connect(&self, a: &NodeId, b: &NodeId) -> GraphResult<ConnectReport> {
        self.connections.connect(a, b).await
    }

    pub async fn link(&self, from: &NodeId, to: &NodeId) -> GraphResult<LinkOutcome> {
        self.connections.link(from, to).await
    }
}
