use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::HealthConfig;
use crate::health::domain::{CircleMembership, ContactHealthRecord, ContactId, Tier, UserId};
use crate::health::repository::{
    AlertError, AlertPublisher, CoolingAlertRetraction, HealthRecordStore, StoreError,
};
use crate::health::HealthScoringService;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub(super) fn user() -> UserId {
    UserId("user-1".to_string())
}

pub(super) fn contact(id: &str) -> ContactId {
    ContactId(id.to_string())
}

pub(super) fn membership(id: &str, tier: u8) -> CircleMembership {
    CircleMembership::new(contact(id), Tier(tier))
}

pub(super) fn stored_record(id: &str, tier: u8, last_contact_days_ago: i64) -> ContactHealthRecord {
    ContactHealthRecord::scored(
        user(),
        contact(id),
        Tier(tier),
        Some(days_ago(last_contact_days_ago)),
        50,
        last_contact_days_ago as u32,
        days_ago(1),
    )
}

#[derive(Default)]
pub(super) struct MemoryStore {
    records: Mutex<HashMap<(UserId, ContactId), ContactHealthRecord>>,
    memberships: Mutex<HashMap<UserId, Vec<CircleMembership>>>,
    alert_history: Mutex<HashMap<(UserId, ContactId), usize>>,
}

impl MemoryStore {
    pub(super) fn with_memberships(memberships: Vec<CircleMembership>) -> Self {
        let store = Self::default();
        store
            .memberships
            .lock()
            .expect("membership mutex poisoned")
            .insert(user(), memberships);
        store
    }

    pub(super) fn seed(&self, record: ContactHealthRecord) {
        self.records
            .lock()
            .expect("record mutex poisoned")
            .insert((record.user_id.clone(), record.contact_id.clone()), record);
    }

    pub(super) fn raise_alerts(&self, id: &str, count: usize) {
        self.alert_history
            .lock()
            .expect("alert mutex poisoned")
            .insert((user(), contact(id)), count);
    }

    pub(super) fn alerts_for(&self, id: &str) -> usize {
        self.alert_history
            .lock()
            .expect("alert mutex poisoned")
            .get(&(user(), contact(id)))
            .copied()
            .unwrap_or(0)
    }

    pub(super) fn record(&self, id: &str) -> Option<ContactHealthRecord> {
        self.records
            .lock()
            .expect("record mutex poisoned")
            .get(&(user(), contact(id)))
            .cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("record mutex poisoned").len()
    }
}

#[async_trait]
impl HealthRecordStore for MemoryStore {
    async fn fetch_records(
        &self,
        user_id: &UserId,
        contact_ids: &[ContactId],
    ) -> Result<Vec<ContactHealthRecord>, StoreError> {
        let guard = self.records.lock().expect("record mutex poisoned");
        Ok(contact_ids
            .iter()
            .filter_map(|id| guard.get(&(user_id.clone(), id.clone())).cloned())
            .collect())
    }

    async fn upsert_records(&self, records: &[ContactHealthRecord]) -> Result<usize, StoreError> {
        let mut guard = self.records.lock().expect("record mutex poisoned");
        for record in records {
            guard.insert(
                (record.user_id.clone(), record.contact_id.clone()),
                record.clone(),
            );
        }
        Ok(records.len())
    }

    async fn fetch_memberships(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CircleMembership>, StoreError> {
        let guard = self.memberships.lock().expect("membership mutex poisoned");
        Ok(guard.get(user_id).cloned().unwrap_or_default())
    }

    async fn clear_alert_history(
        &self,
        user_id: &UserId,
        contact_id: &ContactId,
    ) -> Result<usize, StoreError> {
        let mut guard = self.alert_history.lock().expect("alert mutex poisoned");
        Ok(guard
            .remove(&(user_id.clone(), contact_id.clone()))
            .unwrap_or(0))
    }
}

/// Every call reports the backing relation as not migrated.
pub(super) struct SchemaPendingStore;

#[async_trait]
impl HealthRecordStore for SchemaPendingStore {
    async fn fetch_records(
        &self,
        _user_id: &UserId,
        _contact_ids: &[ContactId],
    ) -> Result<Vec<ContactHealthRecord>, StoreError> {
        Err(pending())
    }

    async fn upsert_records(&self, _records: &[ContactHealthRecord]) -> Result<usize, StoreError> {
        Err(pending())
    }

    async fn fetch_memberships(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<CircleMembership>, StoreError> {
        Err(pending())
    }

    async fn clear_alert_history(
        &self,
        _user_id: &UserId,
        _contact_id: &ContactId,
    ) -> Result<usize, StoreError> {
        Err(pending())
    }
}

fn pending() -> StoreError {
    StoreError::SchemaNotReady {
        relation: "contact_health".to_string(),
    }
}

/// Memberships resolve but every record read or write fails.
pub(super) struct UnavailableStore;

#[async_trait]
impl HealthRecordStore for UnavailableStore {
    async fn fetch_records(
        &self,
        _user_id: &UserId,
        _contact_ids: &[ContactId],
    ) -> Result<Vec<ContactHealthRecord>, StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    async fn upsert_records(&self, _records: &[ContactHealthRecord]) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    async fn fetch_memberships(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<CircleMembership>, StoreError> {
        Ok(vec![membership("ada", 1)])
    }

    async fn clear_alert_history(
        &self,
        _user_id: &UserId,
        _contact_id: &ContactId,
    ) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAlerts {
    events: Arc<Mutex<Vec<CoolingAlertRetraction>>>,
}

impl MemoryAlerts {
    pub(super) fn events(&self) -> Vec<CoolingAlertRetraction> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

#[async_trait]
impl AlertPublisher for MemoryAlerts {
    async fn retract(&self, retraction: CoolingAlertRetraction) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(retraction);
        Ok(())
    }
}

pub(super) struct OfflineAlerts;

#[async_trait]
impl AlertPublisher for OfflineAlerts {
    async fn retract(&self, _retraction: CoolingAlertRetraction) -> Result<(), AlertError> {
        Err(AlertError::Transport("push gateway offline".to_string()))
    }
}

pub(super) fn service_with<S, A>(store: Arc<S>, alerts: Arc<A>) -> HealthScoringService<S, A>
where
    S: HealthRecordStore + 'static,
    A: AlertPublisher + 'static,
{
    HealthScoringService::new(store, alerts, HealthConfig::default())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
