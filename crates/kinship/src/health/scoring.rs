use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CircleMembership, ContactHealthRecord, ContactId, HealthStatus, Tier, UserId};
use crate::error::InvalidInput;

pub const MAX_HEALTH_SCORE: u8 = 100;

/// Days reported for a contact that has never been reached.
pub const NEVER_CONTACTED_DAYS: u32 = 999;

/// Cadence applied to contacts outside the known tiers.
pub const DEFAULT_TARGET_DAYS: u32 = 30;

/// Cadence used when back-computing days from a manually entered score. The decay curve
/// reaches zero at twice this value regardless of the contact's tier.
pub const OVERRIDE_REFERENCE_DAYS: u32 = 30;

const HEALTHY_FLOOR: u8 = 80;
const COOLING_FLOOR: u8 = 60;
const AT_RISK_FLOOR: u8 = 40;

/// Whole days elapsed between `timestamp` and `now`, floored. Missing timestamps report
/// [`NEVER_CONTACTED_DAYS`]; timestamps in the future report zero.
pub fn days_since(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    match timestamp {
        None => NEVER_CONTACTED_DAYS,
        Some(at) => {
            let days = now.signed_duration_since(at).num_days().max(0);
            u32::try_from(days).unwrap_or(u32::MAX)
        }
    }
}

pub fn tier_target_days(tier: Option<Tier>) -> u32 {
    tier.map_or(DEFAULT_TARGET_DAYS, Tier::target_days)
}

/// Linear decay from 100 to 0 over twice the target cadence.
pub fn calculate_health_score(days_since_contact: i64, target_days: u32) -> u8 {
    if days_since_contact <= 0 {
        return MAX_HEALTH_SCORE;
    }

    let target = if target_days == 0 {
        DEFAULT_TARGET_DAYS
    } else {
        target_days
    };
    let decay_per_day = 100.0 / (f64::from(target) * 2.0);
    let raw = 100.0 - days_since_contact as f64 * decay_per_day;

    raw.round().clamp(0.0, f64::from(MAX_HEALTH_SCORE)) as u8
}

pub const fn status_from_score(score: u8) -> HealthStatus {
    if score >= HEALTHY_FLOOR {
        HealthStatus::Healthy
    } else if score >= COOLING_FLOOR {
        HealthStatus::Cooling
    } else if score >= AT_RISK_FLOOR {
        HealthStatus::AtRisk
    } else {
        HealthStatus::Cold
    }
}

/// Collapse circle memberships into one tier per contact; the closest (lowest) tier wins.
pub fn resolve_tiers(memberships: &[CircleMembership]) -> BTreeMap<ContactId, Tier> {
    let mut tiers: BTreeMap<ContactId, Tier> = BTreeMap::new();
    for membership in memberships {
        tiers
            .entry(membership.contact_id.clone())
            .and_modify(|tier| *tier = (*tier).min(membership.tier))
            .or_insert(membership.tier);
    }
    tiers
}

/// Score a single contact from its last contact timestamp.
pub fn score_contact(
    user_id: UserId,
    contact_id: ContactId,
    tier: Tier,
    last_contact_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ContactHealthRecord {
    let days = days_since(last_contact_at, now);
    let score = calculate_health_score(i64::from(days), tier_target_days(Some(tier)));
    ContactHealthRecord::scored(user_id, contact_id, tier, last_contact_at, score, days, now)
}

/// Recompute every tiered contact of `user_id`.
///
/// Contacts without a stored record are baselined at `now`, so they start out healthy. A
/// stored record with no `last_contact_at` keeps decaying as never contacted.
pub fn refresh_health_scores(
    user_id: &UserId,
    memberships: &[CircleMembership],
    existing: &[ContactHealthRecord],
    now: DateTime<Utc>,
) -> Vec<ContactHealthRecord> {
    let baselines: HashMap<&ContactId, Option<DateTime<Utc>>> = existing
        .iter()
        .filter(|record| &record.user_id == user_id)
        .map(|record| (&record.contact_id, record.last_contact_at))
        .collect();

    resolve_tiers(memberships)
        .into_iter()
        .map(|(contact_id, tier)| {
            let last_contact_at = match baselines.get(&contact_id) {
                Some(stored) => *stored,
                None => Some(now),
            };
            score_contact(user_id.clone(), contact_id, tier, last_contact_at, now)
        })
        .collect()
}

/// Record state right after an interaction is logged.
pub fn interaction_record(
    user_id: UserId,
    contact_id: ContactId,
    tier: Tier,
    now: DateTime<Utc>,
) -> ContactHealthRecord {
    ContactHealthRecord::scored(
        user_id,
        contact_id,
        tier,
        Some(now),
        MAX_HEALTH_SCORE,
        0,
        now,
    )
}

/// Inverse of the decay curve for a fixed reference cadence. Not tier aware.
pub fn approximate_days_for_score(score: u8, reference_days: u32) -> u32 {
    let score = score.min(MAX_HEALTH_SCORE);
    let span = f64::from(reference_days.max(1)) * 2.0;
    (f64::from(MAX_HEALTH_SCORE - score) * span / 100.0).round() as u32
}

/// Clamp a user supplied score into range. Non-finite values are rejected.
pub fn clamp_score(raw: f64) -> Result<u8, InvalidInput> {
    if !raw.is_finite() {
        return Err(InvalidInput::MalformedScore);
    }
    Ok(raw.round().clamp(0.0, f64::from(MAX_HEALTH_SCORE)) as u8)
}

/// Apply a manual override on top of `record`, keeping its `last_contact_at`.
pub fn override_record(
    record: ContactHealthRecord,
    new_score: f64,
    reference_days: u32,
    now: DateTime<Utc>,
) -> Result<ContactHealthRecord, InvalidInput> {
    let score = clamp_score(new_score)?;
    let mut record = record.with_score(score);
    record.days_since_contact = approximate_days_for_score(score, reference_days);
    record.last_calculated_at = now;
    Ok(record)
}

/// Count of records per status bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub healthy: usize,
    pub cooling: usize,
    pub at_risk: usize,
    pub cold: usize,
}

impl StatusBreakdown {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ContactHealthRecord>,
    {
        let mut breakdown = Self::default();
        for record in records {
            breakdown.record(record.status);
        }
        breakdown
    }

    pub fn record(&mut self, status: HealthStatus) {
        match status {
            HealthStatus::Healthy => self.healthy += 1,
            HealthStatus::Cooling => self.cooling += 1,
            HealthStatus::AtRisk => self.at_risk += 1,
            HealthStatus::Cold => self.cold += 1,
        }
    }

    pub fn count(&self, status: HealthStatus) -> usize {
        match status {
            HealthStatus::Healthy => self.healthy,
            HealthStatus::Cooling => self.cooling,
            HealthStatus::AtRisk => self.at_risk,
            HealthStatus::Cold => self.cold,
        }
    }

    pub fn total(&self) -> usize {
        self.healthy + self.cooling + self.at_risk + self.cold
    }
}
