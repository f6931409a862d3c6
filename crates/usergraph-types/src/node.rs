//! Stored graph nodes and their edge lists.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TypeError;
use crate::id::NodeId;
use crate::user::User;

/// Payload of a stored node: the user record plus its neighbor ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphPayload {
    pub user: User,
    /// Neighbor ids in insertion order. Logically a set.
    #[serde(default, deserialize_with = "nullable_edges")]
    pub edges: Vec<NodeId>,
}

/// The unit of storage: one user with its edges and the store's version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub data: GraphPayload,
    /// Assigned and enforced by the store. Echo it back unchanged on writes.
    pub version: u64,
}

/// Creation request body. The store assigns `id` and `version`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNode {
    pub data: GraphPayload,
}

impl NewNode {
    /// A fresh node for `user` with no edges.
    pub fn for_user(user: User) -> Self {
        Self {
            data: GraphPayload {
                user,
                edges: Vec::new(),
            },
        }
    }
}

impl GraphNode {
    /// Neighbor ids in insertion order.
    pub fn edges(&self) -> &[NodeId] {
        &self.data.edges
    }

    /// Returns `true` if `candidate` is already a neighbor.
    pub fn has_edge_to(&self, candidate: &NodeId) -> bool {
        self.data.edges.iter().any(|e| e == candidate)
    }

    /// Return this node with `candidate` present in its edges exactly once.
    ///
    /// Adding an existing neighbor returns the node unchanged, which is what
    /// makes repeated connection attempts safe. The node's own id is
    /// rejected.
    pub fn with_edge_added(mut self, candidate: NodeId) -> Result<Self, TypeError> {
        if candidate == self.id {
            return Err(TypeError::SelfLoop(candidate));
        }
        if !self.has_edge_to(&candidate) {
            self.data.edges.push(candidate);
        }
        Ok(self)
    }

    /// Replace the user's name. Identity, version, and edges are kept.
    ///
    /// Renaming to the current name returns the node untouched, even when
    /// the embedded user id was never filled in.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if self.data.user.name != name {
            self.data.user.name = name;
            self.data.user.id = self.id.clone();
        }
        self
    }

    /// The embedded user with its id taken from this node.
    pub fn user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.data.user.name.clone(),
        }
    }
}

// The store hands back `"edges": null` for nodes that never had a neighbor.
fn nullable_edges<'de, D>(deserializer: D) -> Result<Vec<NodeId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<NodeId>>::deserialize(deserializer)?.unwrap_or_default())
}
