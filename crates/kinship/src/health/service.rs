use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{ContactHealthRecord, ContactId, Tier, UserId};
use super::repository::{
    AlertError, AlertPublisher, CoolingAlertRetraction, HealthRecordStore, RetractionReason,
    StoreError,
};
use super::scoring::{
    clamp_score, interaction_record, override_record, refresh_health_scores, resolve_tiers,
    StatusBreakdown, NEVER_CONTACTED_DAYS,
};
use crate::config::HealthConfig;
use crate::error::InvalidInput;

/// Scores at or above this value retire outstanding cooling alerts after an override.
const ALERT_CLEAR_THRESHOLD: u8 = 80;

/// Service composing the pure scoring rules with the record store and alert hooks.
pub struct HealthScoringService<S, A> {
    store: Arc<S>,
    alerts: Arc<A>,
    config: HealthConfig,
}

impl<S, A> HealthScoringService<S, A>
where
    S: HealthRecordStore + 'static,
    A: AlertPublisher + 'static,
{
    pub fn new(store: Arc<S>, alerts: Arc<A>, config: HealthConfig) -> Self {
        Self {
            store,
            alerts,
            config,
        }
    }

    /// Recompute and persist every tiered contact of `user_id`.
    pub async fn refresh(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<RefreshSummary, HealthServiceError> {
        let Some(memberships) = schema_tolerant(self.store.fetch_memberships(user_id).await)?
        else {
            return Ok(RefreshSummary::empty(user_id.clone()));
        };
        if memberships.is_empty() {
            debug!(user = %user_id, "no tiered contacts to refresh");
            return Ok(RefreshSummary::empty(user_id.clone()));
        }

        let contact_ids: Vec<ContactId> = resolve_tiers(&memberships).into_keys().collect();
        let Some(existing) =
            schema_tolerant(self.store.fetch_records(user_id, &contact_ids).await)?
        else {
            return Ok(RefreshSummary::empty(user_id.clone()));
        };

        let records = refresh_health_scores(user_id, &memberships, &existing, now);
        let processed = schema_tolerant(self.store.upsert_records(&records).await)?.unwrap_or(0);
        let breakdown = StatusBreakdown::from_records(&records);

        info!(
            user = %user_id,
            processed,
            healthy = breakdown.healthy,
            cooling = breakdown.cooling,
            at_risk = breakdown.at_risk,
            cold = breakdown.cold,
            "health scores refreshed"
        );

        Ok(RefreshSummary {
            user_id: user_id.clone(),
            processed,
            breakdown,
            records,
        })
    }

    /// Reset a contact to full health and retire its cooling alerts.
    pub async fn log_interaction(
        &self,
        user_id: &UserId,
        contact_id: &ContactId,
        now: DateTime<Utc>,
    ) -> Result<ContactHealthRecord, HealthServiceError> {
        let existing = self.existing_record(user_id, contact_id).await?;
        let tier = match existing {
            Some(record) => record.tier,
            None => self.membership_tier(user_id, contact_id).await?,
        };

        let record = interaction_record(user_id.clone(), contact_id.clone(), tier, now);
        self.persist(&record).await?;
        self.clear_alerts(user_id, contact_id, RetractionReason::InteractionLogged, now)
            .await;

        info!(user = %user_id, contact = %contact_id, "interaction logged");
        Ok(record)
    }

    /// Manually set a contact's score. Alerts are cleared only when the result is healthy.
    pub async fn update_health_score(
        &self,
        user_id: &UserId,
        contact_id: &ContactId,
        new_score: f64,
        now: DateTime<Utc>,
    ) -> Result<ContactHealthRecord, HealthServiceError> {
        clamp_score(new_score)?;

        let base = match self.existing_record(user_id, contact_id).await? {
            Some(record) => record,
            None => {
                let tier = self.membership_tier(user_id, contact_id).await?;
                ContactHealthRecord::scored(
                    user_id.clone(),
                    contact_id.clone(),
                    tier,
                    None,
                    0,
                    NEVER_CONTACTED_DAYS,
                    now,
                )
            }
        };

        let record = override_record(base, new_score, self.config.override_reference_days, now)?;
        self.persist(&record).await?;

        if record.health_score >= ALERT_CLEAR_THRESHOLD {
            self.clear_alerts(user_id, contact_id, RetractionReason::ManualOverride, now)
                .await;
        }

        info!(
            user = %user_id,
            contact = %contact_id,
            score = record.health_score,
            status = %record.status,
            "health score overridden"
        );
        Ok(record)
    }

    async fn existing_record(
        &self,
        user_id: &UserId,
        contact_id: &ContactId,
    ) -> Result<Option<ContactHealthRecord>, HealthServiceError> {
        let records = schema_tolerant(
            self.store
                .fetch_records(user_id, std::slice::from_ref(contact_id))
                .await,
        )?
        .unwrap_or_default();
        Ok(records
            .into_iter()
            .find(|record| &record.contact_id == contact_id))
    }

    async fn membership_tier(
        &self,
        user_id: &UserId,
        contact_id: &ContactId,
    ) -> Result<Tier, HealthServiceError> {
        let memberships =
            schema_tolerant(self.store.fetch_memberships(user_id).await)?.unwrap_or_default();
        Ok(resolve_tiers(&memberships)
            .remove(contact_id)
            .unwrap_or(Tier::UNASSIGNED))
    }

    async fn persist(&self, record: &ContactHealthRecord) -> Result<usize, HealthServiceError> {
        let written =
            schema_tolerant(self.store.upsert_records(std::slice::from_ref(record)).await)?;
        Ok(written.unwrap_or(0))
    }

    /// Best effort; failures are logged and never returned.
    async fn clear_alerts(
        &self,
        user_id: &UserId,
        contact_id: &ContactId,
        reason: RetractionReason,
        now: DateTime<Utc>,
    ) {
        match self.store.clear_alert_history(user_id, contact_id).await {
            Ok(cleared) => {
                debug!(user = %user_id, contact = %contact_id, cleared, "alert history cleared")
            }
            Err(StoreError::SchemaNotReady { relation }) => {
                debug!(%relation, "alert history relation missing; nothing to clear")
            }
            Err(err) => warn!(
                user = %user_id,
                contact = %contact_id,
                error = %err,
                "failed to clear alert history"
            ),
        }

        let retraction = CoolingAlertRetraction {
            user_id: user_id.clone(),
            contact_id: contact_id.clone(),
            reason,
            retracted_at: now,
        };
        if let Err(AlertError::Transport(reason)) = self.alerts.retract(retraction).await {
            warn!(
                user = %user_id,
                contact = %contact_id,
                %reason,
                "failed to retract cooling alerts"
            );
        }
    }
}

/// Treat a missing backing relation as "nothing to do" rather than a failure.
fn schema_tolerant<T>(result: Result<T, StoreError>) -> Result<Option<T>, StoreError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StoreError::SchemaNotReady { relation }) => {
            warn!(%relation, "health schema not ready; treating as zero records");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Outcome of a batch refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub user_id: UserId,
    pub processed: usize,
    pub breakdown: StatusBreakdown,
    pub records: Vec<ContactHealthRecord>,
}

impl RefreshSummary {
    fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            processed: 0,
            breakdown: StatusBreakdown::default(),
            records: Vec::new(),
        }
    }
}

/// Error raised by the health scoring service.
#[derive(Debug, thiserror::Error)]
pub enum HealthServiceError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Store(#[from] StoreError),
}
