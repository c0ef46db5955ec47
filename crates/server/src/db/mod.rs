//! Database operations for the Amal Aid `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` - Site authentication (unique case-insensitive email)
//! - `activities` - Program activities shown on the public site
//! - `donations` - Donation records
//! - `hygiene_distributions` - Hygiene package distribution records
//! - `resources` - External resource links
//!
//! Statements are runtime-checked (`sqlx::query_as::<_, Row>`): partial
//! updates are assembled dynamically by [`update::UpdateBuilder`], and the
//! build must not depend on a live database.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p amal-cli -- migrate
//! ```

pub mod activities;
pub mod distributions;
pub mod donations;
pub mod resources;
pub mod update;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use activities::ActivityRepository;
pub use distributions::DistributionRepository;
pub use donations::DonationRepository;
pub use resources::ResourceRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A partial update carried no whitelisted fields.
    #[error("empty update")]
    EmptyUpdate,
}

impl From<update::EmptyUpdate> for RepositoryError {
    fn from(_: update::EmptyUpdate) -> Self {
        Self::EmptyUpdate
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error to `Conflict` when it is a unique-constraint violation.
///
/// Duplicate emails are detected this way rather than by a pre-check, so
/// two concurrent registrations cannot both pass.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(err)
}
