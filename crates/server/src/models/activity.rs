//! Activity domain types.
//!
//! Activities power the public program listing. The `parent_category`
//! field keeps its camelCase wire name (`parentCategory`) for the site
//! frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use amal_core::ActivityId;

/// A program activity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Activity {
    pub id: ActivityId,
    pub slug: Option<String>,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    #[serde(rename = "parentCategory")]
    pub parent_category: Option<String>,
    pub meta: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an activity.
///
/// An optional `date` is folded into the `meta` JSON object, and a missing
/// `category` falls back to `parentCategory`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    pub date: Option<String>,
    #[serde(rename = "parentCategory")]
    pub parent_category: Option<String>,
    pub category: Option<String>,
}

/// Sparse update payload for an activity.
///
/// `Option<Option<_>>` fields distinguish "absent" (skip) from an explicit
/// `null` (clear the column).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<Option<String>>,
    #[serde(default, rename = "parentCategory")]
    pub parent_category: Option<Option<String>>,
    #[serde(default)]
    pub meta: Option<Option<JsonValue>>,
}
