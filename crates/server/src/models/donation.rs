//! Donation domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use amal_core::DonationId;

/// A recorded donation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Donation {
    pub id: DonationId,
    pub donor_name: String,
    pub amount: Decimal,
    pub category: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for recording a donation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDonation {
    pub donor_name: String,
    pub amount: Decimal,
    pub category: String,
    pub note: Option<String>,
}

/// Sparse update payload for a donation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonationPatch {
    pub donor_name: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    #[serde(default)]
    pub note: Option<Option<String>>,
}

/// Aggregate view over all donations.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DonationSummary {
    pub total_amount: Decimal,
    pub count: i64,
}
