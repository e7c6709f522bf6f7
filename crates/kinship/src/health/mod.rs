//! Relationship health scoring.
//!
//! Scores decay linearly from 100 to 0 over twice a tier's contact cadence and are bucketed
//! into a [`HealthStatus`]. The pure rules live in [`scoring`]; [`HealthScoringService`]
//! wires them to a [`HealthRecordStore`] and an [`AlertPublisher`].

pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{CircleMembership, ContactHealthRecord, ContactId, HealthStatus, Tier, UserId};
pub use import::MembershipImporter;
pub use repository::{
    AlertError, AlertPublisher, CoolingAlertRetraction, HealthRecordStore, RetractionReason,
    StoreError,
};
pub use router::{health_router, ScoreOverrideRequest};
pub use scoring::{
    calculate_health_score, days_since, refresh_health_scores, status_from_score,
    tier_target_days, StatusBreakdown,
};
pub use service::{HealthScoringService, HealthServiceError, RefreshSummary};
