use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CircleMembership, ContactHealthRecord, ContactId, UserId};
pub use crate::store::StoreError;

/// Storage abstraction over the remote health and circle tables.
#[async_trait]
pub trait HealthRecordStore: Send + Sync {
    /// Existing records for `user_id`, restricted to `contact_ids`.
    async fn fetch_records(
        &self,
        user_id: &UserId,
        contact_ids: &[ContactId],
    ) -> Result<Vec<ContactHealthRecord>, StoreError>;

    /// Insert or replace records keyed on `(user_id, contact_id)`. Returns affected rows.
    async fn upsert_records(&self, records: &[ContactHealthRecord]) -> Result<usize, StoreError>;

    /// Tier placements for every contact of `user_id`.
    async fn fetch_memberships(&self, user_id: &UserId)
        -> Result<Vec<CircleMembership>, StoreError>;

    /// Delete raised cooling alerts for one contact. Returns deleted rows.
    async fn clear_alert_history(
        &self,
        user_id: &UserId,
        contact_id: &ContactId,
    ) -> Result<usize, StoreError>;
}

/// Outbound hook so notification adapters can pull back "relationship cooling" pushes.
#[async_trait]
pub trait AlertPublisher: Send + Sync {
    async fn retract(&self, retraction: CoolingAlertRetraction) -> Result<(), AlertError>;
}

/// Payload describing which contact's cooling alerts are no longer relevant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoolingAlertRetraction {
    pub user_id: UserId,
    pub contact_id: ContactId,
    pub reason: RetractionReason,
    pub retracted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetractionReason {
    InteractionLogged,
    ManualOverride,
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}
