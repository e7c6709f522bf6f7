use async_trait::async_trait;
use kinship::health::{
    AlertError, AlertPublisher, CircleMembership, ContactHealthRecord, ContactId,
    CoolingAlertRetraction, HealthRecordStore, HealthStatus, StoreError, UserId,
};
use kinship::network::{ConnectionEdge, NetworkContact, NetworkSnapshot, NetworkStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable(format!("{name} lock poisoned")))
}

type RecordKey = (UserId, ContactId);

/// Process-local stand-in for the hosted health tables.
///
/// Cooling alerts are raised here when a record first drops out of the healthy band, which is
/// what the hosted alert job writes to its history table.
#[derive(Default, Clone)]
pub(crate) struct InMemoryHealthStore {
    records: Arc<Mutex<HashMap<RecordKey, ContactHealthRecord>>>,
    memberships: Arc<Mutex<HashMap<UserId, Vec<CircleMembership>>>>,
    raised_alerts: Arc<Mutex<HashMap<RecordKey, usize>>>,
}

impl InMemoryHealthStore {
    pub(crate) fn with_memberships(placements: Vec<(UserId, CircleMembership)>) -> Self {
        let mut memberships: HashMap<UserId, Vec<CircleMembership>> = HashMap::new();
        for (user_id, membership) in placements {
            memberships.entry(user_id).or_default().push(membership);
        }
        Self {
            memberships: Arc::new(Mutex::new(memberships)),
            ..Self::default()
        }
    }
}

fn owned_key(record: &ContactHealthRecord) -> RecordKey {
    let (user_id, contact_id) = record.key();
    (user_id.clone(), contact_id.clone())
}

#[async_trait]
impl HealthRecordStore for InMemoryHealthStore {
    async fn fetch_records(
        &self,
        user_id: &UserId,
        contact_ids: &[ContactId],
    ) -> Result<Vec<ContactHealthRecord>, StoreError> {
        let guard = lock(&self.records, "health records")?;
        Ok(contact_ids
            .iter()
            .filter_map(|contact_id| guard.get(&(user_id.clone(), contact_id.clone())))
            .cloned()
            .collect())
    }

    async fn upsert_records(&self, records: &[ContactHealthRecord]) -> Result<usize, StoreError> {
        let mut guard = lock(&self.records, "health records")?;
        let mut alerts = lock(&self.raised_alerts, "alert history")?;
        for record in records {
            let key = owned_key(record);
            let was_healthy = guard
                .get(&key)
                .map_or(true, |previous| previous.status == HealthStatus::Healthy);
            if was_healthy && record.status != HealthStatus::Healthy {
                *alerts.entry(key.clone()).or_default() += 1;
            }
            guard.insert(key, record.clone());
        }
        Ok(records.len())
    }

    async fn fetch_memberships(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CircleMembership>, StoreError> {
        let guard = lock(&self.memberships, "circle memberships")?;
        Ok(guard.get(user_id).cloned().unwrap_or_default())
    }

    async fn clear_alert_history(
        &self,
        user_id: &UserId,
        contact_id: &ContactId,
    ) -> Result<usize, StoreError> {
        let mut guard = lock(&self.raised_alerts, "alert history")?;
        Ok(guard
            .remove(&(user_id.clone(), contact_id.clone()))
            .unwrap_or(0))
    }
}

/// Logs retractions and keeps them for inspection.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAlertPublisher {
    events: Arc<Mutex<Vec<CoolingAlertRetraction>>>,
}

#[async_trait]
impl AlertPublisher for InMemoryAlertPublisher {
    async fn retract(&self, retraction: CoolingAlertRetraction) -> Result<(), AlertError> {
        info!(
            user = %retraction.user_id,
            contact = %retraction.contact_id,
            reason = ?retraction.reason,
            "cooling alert retracted"
        );
        let mut guard = self
            .events
            .lock()
            .map_err(|_| AlertError::Transport("alert log lock poisoned".to_string()))?;
        guard.push(retraction);
        Ok(())
    }
}

#[cfg(test)]
impl InMemoryAlertPublisher {
    pub(crate) fn events(&self) -> Vec<CoolingAlertRetraction> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

/// Serves one shared edge set with each user's own contact list.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNetworkStore {
    edges: Arc<Vec<ConnectionEdge>>,
    contacts: Arc<HashMap<UserId, Vec<NetworkContact>>>,
}

impl InMemoryNetworkStore {
    pub(crate) fn new(
        edges: Vec<ConnectionEdge>,
        entries: Vec<(UserId, NetworkContact)>,
    ) -> Self {
        let mut contacts: HashMap<UserId, Vec<NetworkContact>> = HashMap::new();
        for (user_id, contact) in entries {
            contacts.entry(user_id).or_default().push(contact);
        }
        Self {
            edges: Arc::new(edges),
            contacts: Arc::new(contacts),
        }
    }
}

#[async_trait]
impl NetworkStore for InMemoryNetworkStore {
    async fn fetch_snapshot(&self, user_id: &UserId) -> Result<NetworkSnapshot, StoreError> {
        Ok(NetworkSnapshot {
            contacts: self.contacts.get(user_id).cloned().unwrap_or_default(),
            edges: self.edges.as_ref().clone(),
        })
    }
}
