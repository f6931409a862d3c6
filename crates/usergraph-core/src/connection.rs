//! The two-sided connection protocol.
//!
//! A connection between users A and B is two directed edges, A->B and B->A,
//! stored on two independently versioned objects. The store only offers
//! per-object optimistic writes, so the coordinator performs two separate
//! read-modify-write steps and relies on idempotent edge insertion to make
//! re-issuing `connect` safe:
//!
//! 1. `a == b` is rejected before touching the store.
//! 2. Both nodes are fetched before anything is written. A missing node fails
//!    the call naming that id.
//! 3. A->B: skipped if present, otherwise written with A's observed version.
//! 4. B->A: same, with B's observed version.
//! 5. If A->B is confirmed and B->A is not, the caller gets
//!    [`GraphError::PartialFailure`] naming both directions. Nothing is rolled
//!    back; re-issuing `connect` or calling [`ConnectionCoordinator::link`]
//!    for the pending direction completes it.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};
use usergraph_store::ObjectStore;
use usergraph_types::{GraphNode, NodeId};

use crate::error::{GraphError, GraphResult};
use crate::occ;
use crate::users::UserService;

/// One directed edge, `from` -> `to`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
}

impl Link {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }

    /// The opposite direction.
    pub fn reversed(&self) -> Self {
        Self::new(self.to.clone(), self.from.clone())
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// How a single direction was confirmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The edge was added and written.
    Linked,
    /// The edge was already present; no write was issued.
    AlreadyLinked,
}

/// Both directions of a successful `connect`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectReport {
    pub forward: LinkOutcome,
    pub backward: LinkOutcome,
}

impl ConnectReport {
    /// Returns `true` if neither direction needed a write.
    pub fn was_already_connected(&self) -> bool {
        self.forward == LinkOutcome::AlreadyLinked && self.backward == LinkOutcome::AlreadyLinked
    }
}

/// Establishes symmetric connections between users.
pub struct ConnectionCoordinator<S: ?Sized> {
    users: UserService<S>,
}

impl<S: ?Sized> Clone for ConnectionCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
        }
    }
}

impl<S: ObjectStore + ?Sized> ConnectionCoordinator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            users: UserService::new(store),
        }
    }

    /// Build on an existing user service, sharing its store client.
    pub fn with_users(users: UserService<S>) -> Self {
        Self { users }
    }

    /// Connect `a` and `b` in both directions.
    pub async fn connect(&self, a: &NodeId, b: &NodeId) -> GraphResult<ConnectReport> {
        reject_self_link(a, b)?;
        let node_a = self.users.fetch(a).await?;
        let node_b = self.users.fetch(b).await?;

        let forward = Link::new(a.clone(), b.clone());
        let forward_outcome = self.insert_edge(node_a, b).await?;

        let backward_outcome = match self.insert_edge(node_b, a).await {
            Ok(outcome) => outcome,
            Err(cause) => {
                let pending = forward.reversed();
                warn!(completed = %forward, pending = %pending, error = %cause, "connection half complete");
                return Err(GraphError::PartialFailure {
                    completed: forward,
                    pending,
                    cause: Box::new(cause),
                });
            }
        };

        let report = ConnectReport {
            forward: forward_outcome,
            backward: backward_outcome,
        };
        info!(%a, %b, already = report.was_already_connected(), "users connected");
        Ok(report)
    }

    /// Confirm the single direction `from` -> `to`.
    ///
    /// Finishes the pending side of a partial failure without re-deriving
    /// state. `to` must exist; it is fetched before anything is written.
    pub async fn link(&self, from: &NodeId, to: &NodeId) -> GraphResult<LinkOutcome> {
        reject_self_link(from, to)?;
        let node = self.users.fetch(from).await?;
        self.users.fetch(to).await?;
        self.insert_edge(node, to).await
    }

    async fn insert_edge(&self, snapshot: GraphNode, to: &NodeId) -> GraphResult<LinkOutcome> {
        let to = to.clone();
        let mutation = occ::apply(self.users.store(), snapshot, |node| {
            Ok(node.with_edge_added(to)?)
        })
        .await?;
        Ok(if mutation.was_written() {
            LinkOutcome::Linked
        } else {
            LinkOutcome::AlreadyLinked
        })
    }
}

fn reject_self_link(a: &NodeId, b: &NodeId) -> GraphResult<()> {
    if a == b {
        return Err(GraphError::InvalidRequest(
            "source and destination id are identical".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedStore;
    use usergraph_store::InMemoryObjectStore;
    use usergraph_types::{NewNode, User};

    async fn seed(store: &InMemoryObjectStore, names: &[&str]) -> Vec<NodeId> {
        let mut ids = Vec::new();
        for name in names {
            ids.push(store.create(&NewNode::for_user(User::new(*name))).await.unwrap().id);
        }
        ids
    }

    async fn edges(store: &InMemoryObjectStore, id: &NodeId) -> Vec<NodeId> {
        store.fetch(id).await.unwrap().unwrap().edges().to_vec()
    }

    #[tokio::test]
    async fn connect_links_both_sides() {
        let store = Arc::new(InMemoryObjectStore::new());
        let ids = seed(&store, &["alice", "bob"]).await;
        let coordinator = ConnectionCoordinator::new(store.clone());

        let report = coordinator.connect(&ids[0], &ids[1]).await.unwrap();
        assert_eq!(report.forward, LinkOutcome::Linked);
        assert_eq!(report.backward, LinkOutcome::Linked);
        assert_eq!(edges(&store, &ids[0]).await, vec![ids[1].clone()]);
        assert_eq!(edges(&store, &ids[1]).await, vec![ids[0].clone()]);
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn connect_twice_is_idempotent() {
        let store = Arc::new(InMemoryObjectStore::new());
        let ids = seed(&store, &["alice", "bob"]).await;
        let coordinator = ConnectionCoordinator::new(store.clone());

        coordinator.connect(&ids[0], &ids[1]).await.unwrap();
        let first_a = edges(&store, &ids[0]).await;
        let first_b = edges(&store, &ids[1]).await;

        let again = coordinator.connect(&ids[0], &ids[1]).await.unwrap();
        assert!(again.was_already_connected());
        assert_eq!(edges(&store, &ids[0]).await, first_a);
        assert_eq!(edges(&store, &ids[1]).await, first_b);
        assert_eq!(store.write_count(), 2);

        // The reverse call is a no-op as well.
        let reverse = coordinator.connect(&ids[1], &ids[0]).await.unwrap();
        assert!(reverse.was_already_connected());
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn connect_to_self_touches_nothing() {
        let inner = Arc::new(InMemoryObjectStore::new());
        let ids = seed(&inner, &["alice"]).await;
        let store = Arc::new(ScriptedStore::passthrough(inner));
        let coordinator = ConnectionCoordinator::new(store.clone());

        let err = coordinator.connect(&ids[0], &ids[0]).await.unwrap_err();
        assert!(matches!(err, GraphError::InvalidRequest(_)));
        assert_eq!(store.calls(), 0);

        let err = coordinator.connect(&"x".into(), &"x".into()).await.unwrap_err();
        assert!(matches!(err, GraphError::InvalidRequest(_)));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn missing_source_names_source_and_writes_nothing() {
        let inner = Arc::new(InMemoryObjectStore::new());
        let ids = seed(&inner, &["bob"]).await;
        let store = Arc::new(ScriptedStore::passthrough(inner));
        let coordinator = ConnectionCoordinator::new(store.clone());

        let err = coordinator.connect(&"404".into(), &ids[0]).await.unwrap_err();
        assert!(matches!(err, GraphError::NotFound { ref id } if id.as_str() == "404"));
        assert_eq!(store.write_attempts(), 0);
    }

    #[tokio::test]
    async fn missing_destination_names_destination_and_writes_nothing() {
        let inner = Arc::new(InMemoryObjectStore::new());
        let ids = seed(&inner, &["alice"]).await;
        let store = Arc::new(ScriptedStore::passthrough(inner.clone()));
        let coordinator = ConnectionCoordinator::new(store.clone());

        let err = coordinator.connect(&ids[0], &"404".into()).await.unwrap_err();
        assert!(matches!(err, GraphError::NotFound { ref id } if id.as_str() == "404"));
        assert_eq!(store.write_attempts(), 0);
        assert!(edges(&inner, &ids[0]).await.is_empty());
    }

    #[tokio::test]
    async fn conflict_on_first_direction_writes_nothing() {
        let inner = Arc::new(InMemoryObjectStore::new());
        let ids = seed(&inner, &["alice", "bob"]).await;
        let store = Arc::new(ScriptedStore::interfering(inner.clone(), ids[0].clone(), |n| {
            n.with_name("alice (edited)")
        }));
        let coordinator = ConnectionCoordinator::new(store);

        let err = coordinator.connect(&ids[0], &ids[1]).await.unwrap_err();
        assert!(matches!(err, GraphError::VersionConflict { ref id, .. } if id == &ids[0]));
        assert!(edges(&inner, &ids[0]).await.is_empty());
        assert!(edges(&inner, &ids[1]).await.is_empty());
    }

    #[tokio::test]
    async fn conflict_on_second_direction_is_partial_failure() {
        let inner = Arc::new(InMemoryObjectStore::new());
        let ids = seed(&inner, &["alice", "bob"]).await;
        let (a, b) = (ids[0].clone(), ids[1].clone());
        let store = Arc::new(ScriptedStore::interfering(inner.clone(), b.clone(), |n| {
            n.with_name("bob (edited)")
        }));
        let coordinator = ConnectionCoordinator::new(store);

        let err = coordinator.connect(&a, &b).await.unwrap_err();
        match &err {
            GraphError::PartialFailure { completed, pending, cause } => {
                assert_eq!(completed, &Link::new(a.clone(), b.clone()));
                assert_eq!(pending, &Link::new(b.clone(), a.clone()));
                assert!(matches!(**cause, GraphError::VersionConflict { .. }));
            }
            other => panic!("expected PartialFailure, got {other}"),
        }
        assert!(err.is_retryable());
        assert_eq!(edges(&inner, &a).await, vec![b.clone()]);
        assert!(edges(&inner, &b).await.is_empty());

        // Re-issuing the whole connect finishes B->A without duplicating A->B.
        let report = coordinator.connect(&a, &b).await.unwrap();
        assert_eq!(report.forward, LinkOutcome::AlreadyLinked);
        assert_eq!(report.backward, LinkOutcome::Linked);
        assert_eq!(edges(&inner, &a).await, vec![b.clone()]);
        assert_eq!(edges(&inner, &b).await, vec![a.clone()]);

        let bob = inner.fetch(&b).await.unwrap().unwrap();
        assert_eq!(bob.user().name, "bob (edited)");
    }

    #[tokio::test]
    async fn targeted_link_completes_pending_direction() {
        let inner = Arc::new(InMemoryObjectStore::new());
        let ids = seed(&inner, &["alice", "bob"]).await;
        let (a, b) = (ids[0].clone(), ids[1].clone());
        let store = Arc::new(ScriptedStore::interfering(inner.clone(), b.clone(), |n| {
            n.with_name("bob (edited)")
        }));
        let coordinator = ConnectionCoordinator::new(store);

        let pending = match coordinator.connect(&a, &b).await.unwrap_err() {
            GraphError::PartialFailure { pending, .. } => pending,
            other => panic!("expected PartialFailure, got {other}"),
        };

        let outcome = coordinator.link(&pending.from, &pending.to).await.unwrap();
        assert_eq!(outcome, LinkOutcome::Linked);
        assert_eq!(edges(&inner, &a).await, vec![b.clone()]);
        assert_eq!(edges(&inner, &b).await, vec![a.clone()]);
    }

    #[tokio::test]
    async fn store_failure_on_second_direction_is_partial_failure() {
        let inner = Arc::new(InMemoryObjectStore::new());
        let ids = seed(&inner, &["alice", "bob"]).await;
        let store = Arc::new(ScriptedStore::failing(inner.clone(), ids[1].clone(), 503));
        let coordinator = ConnectionCoordinator::new(store);

        let err = coordinator.connect(&ids[0], &ids[1]).await.unwrap_err();
        match err {
            GraphError::PartialFailure { cause, .. } => {
                assert!(matches!(*cause, GraphError::Store(_)));
            }
            other => panic!("expected PartialFailure, got {other}"),
        }
        assert_eq!(edges(&inner, &ids[0]).await, vec![ids[1].clone()]);
    }

    #[tokio::test]
    async fn existing_forward_edge_still_reports_pending_backward() {
        let inner = Arc::new(InMemoryObjectStore::new());
        let ids = seed(&inner, &["alice", "bob"]).await;
        let alice = inner.fetch(&ids[0]).await.unwrap().unwrap();
        inner
            .write(&alice.with_edge_added(ids[1].clone()).unwrap())
            .await
            .unwrap();

        let store = Arc::new(ScriptedStore::failing(inner.clone(), ids[1].clone(), 500));
        let coordinator = ConnectionCoordinator::new(store.clone());

        let err = coordinator.connect(&ids[0], &ids[1]).await.unwrap_err();
        assert!(matches!(err, GraphError::PartialFailure { .. }));
        // Only the B->A write was attempted.
        assert_eq!(store.write_attempts(), 1);
    }

    #[tokio::test]
    async fn link_rejects_missing_target() {
        let store = Arc::new(InMemoryObjectStore::new());
        let ids = seed(&store, &["alice"]).await;
        let coordinator = ConnectionCoordinator::new(store.clone());

        let err = coordinator.link(&ids[0], &"404".into()).await.unwrap_err();
        assert!(matches!(err, GraphError::NotFound { ref id } if id.as_str() == "404"));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn link_display_and_reverse() {
        let link = Link::new("1".into(), "2".into());
        assert_eq!(link.to_string(), "1->2");
        assert_eq!(link.reversed(), Link::new("2".into(), "1".into()));
    }
}
