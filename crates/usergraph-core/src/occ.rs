//! Optimistic read-modify-write against the versioned store.
//!
//! The pattern is always: fetch a snapshot, transform it, write it back
//! carrying the snapshot's version, and surface a conflict if someone else
//! wrote first. There is no retry loop here; callers decide whether to
//! re-fetch and try again.

use tracing::{debug, warn};
use usergraph_store::ObjectStore;
use usergraph_types::{GraphNode, NodeId};

use crate::error::{GraphError, GraphResult};

/// Result of applying a transform to a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// The transform produced an identical node; no write was issued.
    Unchanged(GraphNode),
    /// The store accepted the write. Holds the node as echoed by the store.
    Written(GraphNode),
}

impl Mutation {
    pub fn node(&self) -> &GraphNode {
        match self {
            Self::Unchanged(node) | Self::Written(node) => node,
        }
    }

    pub fn into_node(self) -> GraphNode {
        match self {
            Self::Unchanged(node) | Self::Written(node) => node,
        }
    }

    pub fn was_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

/// Fetch a node, turning "absent" into [`GraphError::NotFound`].
pub async fn fetch_existing<S>(store: &S, id: &NodeId) -> GraphResult<GraphNode>
where
    S: ObjectStore + ?Sized,
{
    store
        .fetch(id)
        .await?
        .ok_or_else(|| GraphError::NotFound { id: id.clone() })
}

/// Transform `snapshot` and write the result back with the snapshot's version.
///
/// If the transform returns a node equal to the snapshot nothing is written.
/// The transform must not change the node's id or version.
pub async fn apply<S, F>(store: &S, snapshot: GraphNode, transform: F) -> GraphResult<Mutation>
where
    S: ObjectStore + ?Sized,
    F: FnOnce(GraphNode) -> GraphResult<GraphNode>,
{
    let next = transform(snapshot.clone())?;
    if next.id != snapshot.id || next.version != snapshot.version {
        return Err(GraphError::InvalidRequest(format!(
            "transform of {} altered identity or version",
            snapshot.id
        )));
    }
    if next == snapshot {
        debug!(id = %snapshot.id, version = snapshot.version, "no change, skipping write");
        return Ok(Mutation::Unchanged(snapshot));
    }

    match store.write(&next).await {
        Ok(written) => {
            debug!(id = %written.id, version = written.version, "write accepted");
            Ok(Mutation::Written(written))
        }
        Err(e) => {
            let e = GraphError::from(e);
            if let GraphError::VersionConflict { id, version } = &e {
                warn!(%id, version, "write rejected: stale version");
            }
            Err(e)
        }
    }
}

/// [`fetch_existing`] followed by [`apply`].
pub async fn read_modify_write<S, F>(store: &S, id: &NodeId, transform: F) -> GraphResult<Mutation>
where
    S: ObjectStore + ?Sized,
    F: FnOnce(GraphNode) -> GraphResult<GraphNode>,
{
    let snapshot = fetch_existing(store, id).await?;
    apply(store, snapshot, transform).await
}
