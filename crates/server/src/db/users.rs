//! User repository for database operations.
//!
//! All lookups by email go through `LOWER(email)`, matching the unique
//! case-insensitive index on the `users` table. The password digest stays
//! inside this module except for the verification paths that need it.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use amal_core::{Email, Role, UserId};

use super::update::{SqlValue, UpdateBuilder};
use super::{RepositoryError, conflict_on_unique};
use crate::models::user::User;

const USER_COLUMNS: &str = "id, name, email, role, created_at";

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    role: Role,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            email,
            role: row.role,
            created_at: row.created_at,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with a pre-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists
    /// (case-insensitively, via the unique index - not a pre-check).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, email, role, created_at",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email already in use"))?;

        row.try_into()
    }

    /// Get a user and their password digest by email, case-insensitively.
    ///
    /// Returns `None` if no user matches.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct UserWithHashRow {
            id: i32,
            name: String,
            email: String,
            role: Role,
            created_at: DateTime<Utc>,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, UserWithHashRow>(
            "SELECT id, name, email, role, created_at, password_hash \
             FROM users WHERE LOWER(email) = $1",
        )
        .bind(email.normalized())
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let user = UserRow {
            id: r.id,
            name: r.name,
            email: r.email,
            role: r.role,
            created_at: r.created_at,
        }
        .try_into()?;

        Ok(Some((user, r.password_hash)))
    }

    /// Get a user's password digest by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn password_hash(&self, id: UserId) -> Result<String, RepositoryError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT password_hash FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        row.map(|(hash,)| hash).ok_or(RepositoryError::NotFound)
    }

    /// Overwrite a user's password digest.
    ///
    /// A single-row UPDATE: there is no window where both the old and new
    /// digests verify.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Check whether another user already holds this email.
    ///
    /// The check is case-insensitive and excludes the caller's own row, so
    /// re-submitting an unchanged email is not a conflict.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_taken_by_other(
        &self,
        email: &Email,
        own_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM users WHERE LOWER(email) = $1 AND id <> $2")
                .bind(email.normalized())
                .bind(own_id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.is_some())
    }

    /// Apply a sparse profile update (name and/or email).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::EmptyUpdate` if neither field is present.
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if the unique email index rejects
    /// the new address.
    pub async fn update_profile(
        &self,
        id: UserId,
        name: Option<String>,
        email: Option<Email>,
    ) -> Result<User, RepositoryError> {
        let statement = UpdateBuilder::new("users")
            .set("name", name.map(SqlValue::Text))
            .set("email", email.map(|e| SqlValue::Text(e.into_inner())))
            .returning(USER_COLUMNS)
            .build(id.as_i32())?;

        let row: Option<UserRow> = statement
            .fetch_optional(self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "email already in use"))?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}
