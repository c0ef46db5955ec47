//! Hygiene distribution domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use amal_core::DistributionId;

/// A hygiene package distribution record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Distribution {
    pub id: DistributionId,
    pub location: String,
    pub beneficiary_count: i32,
    pub package_type: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for recording a distribution.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDistribution {
    pub location: String,
    pub beneficiary_count: i32,
    pub package_type: Option<String>,
    pub notes: Option<String>,
}

/// Sparse update payload for a distribution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DistributionPatch {
    pub location: Option<String>,
    pub beneficiary_count: Option<i32>,
    #[serde(default)]
    pub package_type: Option<Option<String>>,
    #[serde(default)]
    pub notes: Option<Option<String>>,
}
