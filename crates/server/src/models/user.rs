//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use amal_core::{Email, Role, UserId};

/// A registered identity (domain type).
///
/// The password digest is deliberately absent: it never leaves the
/// repository layer.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address (unique, case-insensitive).
    pub email: Email,
    /// Assigned role.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// The identity attached to an authenticated request.
///
/// Produced by token verification; consumed by the access policy. Carries
/// only what the token asserts, no database state.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    /// Subject ID from the token.
    pub id: UserId,
    /// Role from the token.
    pub role: Role,
}

/// Sparse profile-update payload. At least one field must be present.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilePatch {
    /// New display name.
    pub name: Option<String>,
    /// New email address (duplicate check excludes the caller's own row).
    pub email: Option<String>,
}
