use async_trait::async_trait;
use usergraph_types::{GraphNode, NewNode, NodeId};

use crate::error::StoreResult;

/// Id-keyed, versioned object store.
///
/// All implementations must satisfy these invariants:
/// - A write carrying a version other than the store's current version for
///   that id fails with `VersionConflict` and changes nothing.
/// - An accepted write assigns a new version and returns the node as stored.
/// - Ids are assigned by the store on `create` and never change.
/// - No operation retries on its own.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read a node by id.
    ///
    /// Returns `Ok(None)` if the store has no object with this id.
    async fn fetch(&self, id: &NodeId) -> StoreResult<Option<GraphNode>>;

    /// Write a node back, submitting `node.version` for the version check.
    ///
    /// Returns the node as echoed by the store, usually with a new version.
    async fn write(&self, node: &GraphNode) -> StoreResult<GraphNode>;

    /// Create a new object and return it with its store-assigned id and version.
    async fn create(&self, node: &NewNode) -> StoreResult<GraphNode>;

    /// Where the objects live, for logs and banners.
    fn location(&self) -> String;
}
