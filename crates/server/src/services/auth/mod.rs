//! Authentication service.
//!
//! Turns plaintext credentials into verified identities and mints bearer
//! tokens. Password hashing uses Argon2id with a per-call random salt;
//! hashing and verification are CPU-bound and run on the blocking thread
//! pool so they never stall request dispatch.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use amal_core::{Email, Role, UserId};

use crate::db::UserRepository;
use crate::models::user::{ProfilePatch, User};
use crate::services::token::TokenService;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles registration, login, profile updates, and password changes.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new identity.
    ///
    /// The role defaults to the lowest-privilege value (`beneficiary`)
    /// when omitted. Duplicate emails are detected by the store's unique
    /// index, not a pre-check, so concurrent registrations cannot race
    /// past each other.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password).await?;

        let user = self
            .users
            .create(name, &email, &password_hash, role.unwrap_or_default())
            .await
            .map_err(|e| match e {
                crate::db::RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Log in with email and password, minting a two-hour bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no identity matches the email
    /// (case-insensitively). Returns `AuthError::InvalidCredentials` if the
    /// stored digest does not verify.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        // A malformed email can't match any stored identity
        let email = Email::parse(email).map_err(|_| AuthError::UserNotFound)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &password_hash).await?;

        let token = self
            .tokens
            .mint(user.id, user.role)
            .map_err(|e| AuthError::TokenMint(e.to_string()))?;

        Ok((user, token))
    }

    /// Apply a sparse profile update (name and/or email).
    ///
    /// Empty strings count as absent, and the duplicate-email check excludes
    /// the caller's own row so re-submitting an unchanged address succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed new email.
    /// Returns `AuthError::EmailTaken` if another identity holds the email.
    /// Returns `AuthError::Repository(EmptyUpdate)` when neither field is
    /// present.
    pub async fn update_profile(
        &self,
        id: UserId,
        patch: ProfilePatch,
    ) -> Result<User, AuthError> {
        let name = patch
            .name
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());
        let email = patch
            .email
            .filter(|s| !s.trim().is_empty())
            .map(|s| Email::parse(&s))
            .transpose()?;

        if let Some(ref email) = email
            && self.users.email_taken_by_other(email, id).await?
        {
            return Err(AuthError::EmailTaken);
        }

        let user = self
            .users
            .update_profile(id, name, email)
            .await
            .map_err(|e| match e {
                crate::db::RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Change a password after verifying the current one.
    ///
    /// The new digest overwrites the old in a single-row UPDATE; a
    /// concurrent login sees either the old digest or the new one, never a
    /// mix.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the current password does
    /// not verify. Returns `AuthError::WeakPassword` if the new password is
    /// too short.
    pub async fn change_password(
        &self,
        id: UserId,
        current: &str,
        new: &str,
    ) -> Result<(), AuthError> {
        validate_password(new)?;

        let stored = self.users.password_hash(id).await.map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AuthError::UserNotFound,
            other => AuthError::Repository(other),
        })?;

        verify_password(current, &stored).await?;

        let new_hash = hash_password(new).await?;
        self.users.set_password_hash(id, &new_hash).await?;

        Ok(())
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id with a random salt.
///
/// Runs on the blocking thread pool; two calls on the same plaintext
/// produce different digests.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub async fn hash_password(password: &str) -> Result<String, AuthError> {
    let password = password.to_owned();

    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    })
    .await
    .map_err(|_| AuthError::PasswordHash)?
}

/// Verify a password against a stored digest.
///
/// Runs on the blocking thread pool.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match
/// or the digest cannot be parsed.
pub async fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let password = password.to_owned();
    let hash = hash.to_owned();

    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&hash).map_err(|_| AuthError::InvalidCredentials)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)
    })
    .await
    .map_err(|_| AuthError::PasswordHash)?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify_roundtrip() {
        let digest = hash_password("correct horse battery").await.unwrap();
        assert!(verify_password("correct horse battery", &digest).await.is_ok());
    }

    #[tokio::test]
    async fn test_wrong_password_fails() {
        let digest = hash_password("correct horse battery").await.unwrap();
        let err = verify_password("wrong horse", &digest).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_salting_gives_distinct_digests() {
        let a = hash_password("same input").await.unwrap();
        let b = hash_password("same input").await.unwrap();
        assert_ne!(a, b);
        // Both still verify
        assert!(verify_password("same input", &a).await.is_ok());
        assert!(verify_password("same input", &b).await.is_ok());
    }

    #[tokio::test]
    async fn test_garbage_digest_is_rejected() {
        let err = verify_password("anything", "not-a-digest").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_valid() {
        assert!(validate_password("long enough password").is_ok());
    }
}
