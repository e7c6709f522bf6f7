//! Connection graph queries.
//!
//! Graphs are rebuilt from an edge snapshot on every query and never cached.

pub mod domain;
pub mod graph;
pub mod import;
pub mod router;
pub mod search;
pub mod service;
pub mod stats;

#[cfg(test)]
mod tests;

pub use domain::{
    ConnectionEdge, ConnectionType, NetworkContact, NetworkSnapshot, NodeId, TargetDescriptor,
};
pub use graph::{build_graph, ConnectionGraph, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PATHS};
pub use import::{ContactImporter, EdgeImporter};
pub use router::{network_router, PathRequest};
pub use search::{find_path_to_target, PathLookup};
pub use service::{NetworkService, NetworkServiceError, NetworkStore, PathReport};
pub use stats::{calculate_network_stats, NetworkStats};
