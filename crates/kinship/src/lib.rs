//! Relationship health scoring and connection-graph path finding.
//!
//! `health` turns "days since last contact" into bounded scores per relationship tier and
//! persists recomputed batches through a [`health::HealthRecordStore`]. `network` builds an
//! undirected graph from connection edges and answers shortest-path, all-paths, and
//! introduction lookups.

pub mod config;
pub mod error;
pub mod health;
pub mod import;
pub mod network;
pub mod store;
pub mod telemetry;
