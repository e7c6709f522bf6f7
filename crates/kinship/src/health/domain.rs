use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scoring::{status_from_score, MAX_HEALTH_SCORE};
use crate::error::InvalidInput;

/// Identifier wrapper for the owner of a contact list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn parse(raw: &str) -> Result<Self, InvalidInput> {
        non_blank(raw, "user_id").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for a contact; stable across recomputations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContactId(pub String);

impl ContactId {
    pub fn parse(raw: &str) -> Result<Self, InvalidInput> {
        non_blank(raw, "contact_id").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn non_blank(raw: &str, field: &'static str) -> Result<String, InvalidInput> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(InvalidInput::MissingIdentifier { field })
    } else {
        Ok(trimmed.to_string())
    }
}

/// Relationship closeness; lower numbers expect more frequent contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tier(pub u8);

impl Tier {
    /// Placeholder for contacts that do not sit in any tiered circle.
    pub const UNASSIGNED: Tier = Tier(0);

    /// Expected contact cadence in days. Unknown tiers fall back to a monthly cadence.
    pub const fn target_days(self) -> u32 {
        match self.0 {
            1 => 7,
            2 => 14,
            3 => 21,
            4 => 30,
            5 => 45,
            _ => 30,
        }
    }
}

/// Coarse freshness bucket derived from a health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Cooling,
    AtRisk,
    Cold,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 4] = [
        HealthStatus::Healthy,
        HealthStatus::Cooling,
        HealthStatus::AtRisk,
        HealthStatus::Cold,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Cooling => "cooling",
            HealthStatus::AtRisk => "at_risk",
            HealthStatus::Cold => "cold",
        }
    }

    /// Display colour used by clients rendering the status badge.
    pub const fn color(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "#22C55E",
            HealthStatus::Cooling => "#EAB308",
            HealthStatus::AtRisk => "#F97316",
            HealthStatus::Cold => "#EF4444",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Freshness of the relationship between one user and one contact.
///
/// `status` always mirrors `health_score`; build records through [`ContactHealthRecord::scored`]
/// or [`ContactHealthRecord::with_score`] so the two never drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactHealthRecord {
    pub user_id: UserId,
    pub contact_id: ContactId,
    pub tier: Tier,
    pub last_contact_at: Option<DateTime<Utc>>,
    pub health_score: u8,
    pub status: HealthStatus,
    pub days_since_contact: u32,
    pub last_calculated_at: DateTime<Utc>,
}

impl ContactHealthRecord {
    pub fn scored(
        user_id: UserId,
        contact_id: ContactId,
        tier: Tier,
        last_contact_at: Option<DateTime<Utc>>,
        health_score: u8,
        days_since_contact: u32,
        calculated_at: DateTime<Utc>,
    ) -> Self {
        let health_score = health_score.min(MAX_HEALTH_SCORE);
        Self {
            user_id,
            contact_id,
            tier,
            last_contact_at,
            health_score,
            status: status_from_score(health_score),
            days_since_contact,
            last_calculated_at: calculated_at,
        }
    }

    /// Replace the score, keeping `status` consistent.
    pub fn with_score(mut self, health_score: u8) -> Self {
        self.health_score = health_score.min(MAX_HEALTH_SCORE);
        self.status = status_from_score(self.health_score);
        self
    }

    pub fn key(&self) -> (&UserId, &ContactId) {
        (&self.user_id, &self.contact_id)
    }
}

/// One contact's placement in a tiered circle. A contact may sit in several circles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleMembership {
    pub contact_id: ContactId,
    pub tier: Tier,
}

impl CircleMembership {
    pub fn new(contact_id: ContactId, tier: Tier) -> Self {
        Self { contact_id, tier }
    }
}
