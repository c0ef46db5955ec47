//! Resource domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use amal_core::ResourceId;

/// An external resource link shown on the public site.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for adding a resource.
#[derive(Debug, Clone, Deserialize)]
pub struct NewResource {
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
}

/// Sparse update payload for a resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourcePatch {
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub url: Option<Option<String>>,
    #[serde(default)]
    pub category: Option<Option<String>>,
}
