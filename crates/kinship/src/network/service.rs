use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{NetworkSnapshot, NodeId, TargetDescriptor};
use super::graph::build_graph;
use super::search::{find_path_to_target, PathLookup};
use super::stats::{calculate_network_stats, NetworkStats};
use crate::config::NetworkConfig;
use crate::error::InvalidInput;
use crate::health::UserId;
use crate::store::StoreError;

/// Source of connection snapshots for one owner.
#[async_trait]
pub trait NetworkStore: Send + Sync {
    async fn fetch_snapshot(&self, user_id: &UserId) -> Result<NetworkSnapshot, StoreError>;
}

/// Paths between two nodes. `paths` is empty when the nodes are not connected within bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathReport {
    pub from: NodeId,
    pub to: NodeId,
    pub max_depth: usize,
    pub paths: Vec<Vec<NodeId>>,
}

/// Service answering graph queries against freshly fetched snapshots. Nothing is cached.
pub struct NetworkService<S> {
    store: Arc<S>,
    config: NetworkConfig,
}

impl<S> NetworkService<S>
where
    S: NetworkStore + 'static,
{
    pub fn new(store: Arc<S>, config: NetworkConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> NetworkConfig {
        self.config
    }

    pub async fn stats(&self, user_id: &UserId) -> Result<NetworkStats, NetworkServiceError> {
        let snapshot = self.snapshot(user_id).await?;
        Ok(calculate_network_stats(&build_graph(&snapshot.edges)))
    }

    /// Shortest path, or up to `max_paths` paths when `all` is set.
    pub async fn paths(
        &self,
        user_id: &UserId,
        from: &NodeId,
        to: &NodeId,
        all: bool,
    ) -> Result<PathReport, NetworkServiceError> {
        if from.is_blank() {
            return Err(InvalidInput::MissingIdentifier { field: "from" }.into());
        }
        if to.is_blank() {
            return Err(InvalidInput::MissingIdentifier { field: "to" }.into());
        }

        let snapshot = self.snapshot(user_id).await?;
        let graph = build_graph(&snapshot.edges);
        let NetworkConfig {
            max_depth,
            max_paths,
        } = self.config;

        let paths = if all {
            graph.find_all_paths(from, to, max_paths, max_depth)
        } else {
            graph.find_path(from, to, max_depth).into_iter().collect()
        };
        debug!(user = %user_id, %from, %to, found = paths.len(), "path query answered");

        Ok(PathReport {
            from: from.clone(),
            to: to.clone(),
            max_depth,
            paths,
        })
    }

    /// Route from the owner to a described person in their own network.
    pub async fn path_to_target(
        &self,
        user_id: &UserId,
        target: &TargetDescriptor,
    ) -> Result<PathLookup, NetworkServiceError> {
        let snapshot = self.snapshot(user_id).await?;
        let owner = NodeId(user_id.as_str().to_string());
        let lookup = find_path_to_target(&owner, target, &snapshot, self.config.max_depth)?;
        debug!(user = %user_id, degrees = ?lookup.degrees(), "introduction lookup answered");
        Ok(lookup)
    }

    async fn snapshot(&self, user_id: &UserId) -> Result<NetworkSnapshot, NetworkServiceError> {
        match self.store.fetch_snapshot(user_id).await {
            Ok(snapshot) => Ok(snapshot),
            Err(StoreError::SchemaNotReady { relation }) => {
                warn!(%relation, "network schema not ready; using an empty graph");
                Ok(NetworkSnapshot::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Error raised by the network service.
#[derive(Debug, thiserror::Error)]
pub enum NetworkServiceError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Store(#[from] StoreError),
}
