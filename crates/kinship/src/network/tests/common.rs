use async_trait::async_trait;

use crate::health::UserId;
use crate::network::domain::{ConnectionEdge, NetworkContact, NetworkSnapshot, NodeId};
use crate::network::service::NetworkStore;
use crate::store::StoreError;

pub(super) fn node(id: &str) -> NodeId {
    NodeId::from(id)
}

pub(super) fn edges(pairs: &[(&str, &str)]) -> Vec<ConnectionEdge> {
    pairs
        .iter()
        .map(|(source, target)| ConnectionEdge::new(*source, *target))
        .collect()
}

pub(super) fn path(ids: &[&str]) -> Vec<NodeId> {
    ids.iter().copied().map(NodeId::from).collect()
}

/// A-B-C-D-E-F-G, six edges.
pub(super) fn chain() -> Vec<ConnectionEdge> {
    edges(&[
        ("A", "B"),
        ("B", "C"),
        ("C", "D"),
        ("D", "E"),
        ("E", "F"),
        ("F", "G"),
    ])
}

pub(super) fn user() -> UserId {
    UserId("me".to_string())
}

/// `me` knows Ada and Grace; Grace knows Linus; Linus knows Margaret.
pub(super) fn snapshot() -> NetworkSnapshot {
    NetworkSnapshot {
        contacts: vec![
            NetworkContact::new("ada", "Ada Lovelace"),
            NetworkContact::new("grace", "Grace Hopper"),
            NetworkContact::new("linus", "Linus Torvalds"),
            NetworkContact::new("margaret", "Margaret Hamilton"),
            NetworkContact::new("alan", "Alan Turing"),
        ],
        edges: edges(&[
            ("me", "ada"),
            ("me", "grace"),
            ("grace", "linus"),
            ("linus", "margaret"),
        ]),
    }
}

pub(super) struct MemoryNetworkStore {
    pub(super) snapshot: NetworkSnapshot,
}

#[async_trait]
impl NetworkStore for MemoryNetworkStore {
    async fn fetch_snapshot(&self, _user_id: &UserId) -> Result<NetworkSnapshot, StoreError> {
        Ok(self.snapshot.clone())
    }
}

pub(super) struct PendingNetworkStore;

#[async_trait]
impl NetworkStore for PendingNetworkStore {
    async fn fetch_snapshot(&self, _user_id: &UserId) -> Result<NetworkSnapshot, StoreError> {
        Err(StoreError::SchemaNotReady {
            relation: "connections".to_string(),
        })
    }
}

pub(super) struct OfflineNetworkStore;

#[async_trait]
impl NetworkStore for OfflineNetworkStore {
    async fn fetch_snapshot(&self, _user_id: &UserId) -> Result<NetworkSnapshot, StoreError> {
        Err(StoreError::Unavailable("dns failure".to_string()))
    }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
