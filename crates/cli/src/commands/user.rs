//! User account management commands.
//!
//! # Usage
//!
//! ```bash
//! amal-cli user create -e admin@amalaid.org -n "Admin Name" -r admin -p <password>
//! ```
//!
//! Used to bootstrap the first admin account; registration through the API
//! only ever grants the role the caller asks for, and deployments start with
//! an empty users table.

use secrecy::SecretString;

use amal_core::{Email, Role};
use amal_server::db::{self, UserRepository};
use amal_server::services::auth::hash_password;

/// Errors that can occur while creating a user.
#[derive(Debug, thiserror::Error)]
pub enum UserCommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] amal_core::EmailError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] amal_core::RoleParseError),

    #[error("Password hashing failed")]
    Hash,

    #[error("Database error: {0}")]
    Repository(#[from] amal_server::db::RepositoryError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create a user account with the given role.
///
/// # Errors
///
/// Returns `UserCommandError` if inputs are invalid, the email is already
/// taken, or the database is unreachable.
pub async fn create(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<(), UserCommandError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;
    let role: Role = role.parse()?;

    let database_url = std::env::var("AMAL_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| UserCommandError::MissingEnvVar("AMAL_DATABASE_URL"))?;

    let pool = db::create_pool(&SecretString::from(database_url)).await?;

    let password_hash = hash_password(password)
        .await
        .map_err(|_| UserCommandError::Hash)?;

    let user = UserRepository::new(&pool)
        .create(name, &email, &password_hash, role)
        .await?;

    tracing::info!("Created user {} ({}) with role {}", user.id, user.email, user.role);
    Ok(())
}
