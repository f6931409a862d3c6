use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use usergraph_types::{GraphNode, NewNode, NodeId};

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// In-memory, versioned object store.
///
/// Follows the same contract as the remote store: ids are assigned
/// sequentially (`"1"`, `"2"`, ...), versions start at 1 and advance on
/// every accepted write, and a stale write is rejected with
/// [`StoreError::VersionConflict`]. Intended for tests and demos.
#[derive(Debug)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<NodeId, GraphNode>>,
    next_id: AtomicU64,
    writes: AtomicUsize,
}

impl InMemoryObjectStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of accepted `write` calls so far. Creations are not counted.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Internal(format!("lock poisoned: {e}"))
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn fetch(&self, id: &NodeId) -> StoreResult<Option<GraphNode>> {
        let map = self.objects.read().map_err(poisoned)?;
        Ok(map.get(id).cloned())
    }

    async fn write(&self, node: &GraphNode) -> StoreResult<GraphNode> {
        let mut map = self.objects.write().map_err(poisoned)?;
        let current = map
            .get_mut(&node.id)
            .ok_or_else(|| StoreError::NotFound(node.id.clone()))?;
        if current.version != node.version {
            return Err(StoreError::VersionConflict {
                id: node.id.clone(),
                version: node.version,
            });
        }
        let mut stored = node.clone();
        stored.version = current.version + 1;
        *current = stored.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(stored)
    }

    async fn create(&self, node: &NewNode) -> StoreResult<GraphNode> {
        let id = NodeId::new(self.next_id.fetch_add(1, Ordering::SeqCst).to_string());
        let stored = GraphNode {
            id: id.clone(),
            data: node.data.clone(),
            version: 1,
        };
        let mut map = self.objects.write().map_err(poisoned)?;
        map.insert(id, stored.clone());
        Ok(stored)
    }

    fn location(&self) -> String {
        "in-memory".into()
    }
}
