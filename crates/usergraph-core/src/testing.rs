//! Store wrapper that injects concurrent writers and failures into tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use usergraph_store::{InMemoryObjectStore, ObjectStore, StoreError, StoreResult};
use usergraph_types::{GraphNode, NewNode, NodeId};

type Edit = Box<dyn FnOnce(GraphNode) -> GraphNode + Send>;

enum Script {
    /// Before the first write to the target, apply this edit as another client would.
    Interfere(Edit),
    /// Every write to the target fails with this status.
    Fail(u16),
}

/// Delegates to an [`InMemoryObjectStore`], counting calls and running a
/// script against writes to one target id.
pub(crate) struct ScriptedStore {
    inner: Arc<InMemoryObjectStore>,
    target: Option<NodeId>,
    script: Mutex<Option<Script>>,
    fetches: AtomicUsize,
    write_attempts: AtomicUsize,
}

impl ScriptedStore {
    pub(crate) fn passthrough(inner: Arc<InMemoryObjectStore>) -> Self {
        Self::with_script(inner, None, None)
    }

    pub(crate) fn interfering(
        inner: Arc<InMemoryObjectStore>,
        target: NodeId,
        edit: impl FnOnce(GraphNode) -> GraphNode + Send + 'static,
    ) -> Self {
        Self::with_script(inner, Some(target), Some(Script::Interfere(Box::new(edit))))
    }

    pub(crate) fn failing(inner: Arc<InMemoryObjectStore>, target: NodeId, status: u16) -> Self {
        Self::with_script(inner, Some(target), Some(Script::Fail(status)))
    }

    fn with_script(
        inner: Arc<InMemoryObjectStore>,
        target: Option<NodeId>,
        script: Option<Script>,
    ) -> Self {
        Self {
            inner,
            target,
            script: Mutex::new(script),
            fetches: AtomicUsize::new(0),
            write_attempts: AtomicUsize::new(0),
        }
    }

    /// Fetches plus write attempts, accepted or not.
    pub(crate) fn calls(&self) -> usize {
        self.fetches.load(Ordering::SeqCst) + self.write_attempts()
    }

    pub(crate) fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    fn take_script(&self) -> Option<Script> {
        let mut guard = self.script.lock().ok()?;
        if let Some(Script::Fail(status)) = guard.as_ref() {
            return Some(Script::Fail(*status));
        }
        guard.take()
    }
}

#[async_trait]
impl ObjectStore for ScriptedStore {
    async fn fetch(&self, id: &NodeId) -> StoreResult<Option<GraphNode>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(id).await
    }

    async fn write(&self, node: &GraphNode) -> StoreResult<GraphNode> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.target.as_ref() == Some(&node.id) {
            match self.take_script() {
                Some(Script::Fail(status)) => {
                    return Err(StoreError::UnexpectedStatus {
                        status,
                        body: "injected failure".into(),
                    });
                }
                Some(Script::Interfere(edit)) => {
                    let current = self
                        .inner
                        .fetch(&node.id)
                        .await?
                        .ok_or_else(|| StoreError::NotFound(node.id.clone()))?;
                    self.inner.write(&edit(current)).await?;
                }
                None => {}
            }
        }
        self.inner.write(node).await
    }

    async fn create(&self, node: &NewNode) -> StoreResult<GraphNode> {
        self.inner.create(node).await
    }

    fn location(&self) -> String {
        format!("scripted({})", self.inner.location())
    }
}
