//! Authentication route handlers.
//!
//! Registration, login, profile update, and password change. Login hands
//! the bearer token back twice: in the JSON body for API clients and as an
//! HttpOnly cookie for the site frontend.

use axum::{Json, extract::State};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use amal_core::Role;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, build_auth_cookie};
use crate::models::user::{ProfilePatch, User};
use crate::policy::{self, Capability};
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Payload Types
// =============================================================================

/// Registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Password change payload. Field names match the site frontend.
#[derive(Debug, Deserialize)]
pub struct PasswordChangePayload {
    #[serde(rename = "currentPassword")]
    pub current_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

// =============================================================================
// Response Types
// =============================================================================

/// Response carrying a message and the affected identity.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: &'static str,
    pub user: User,
}

/// Login response: identity summary plus the bearer token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub user: User,
}

/// Bare confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new identity.
///
/// The role defaults to `beneficiary` when omitted.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<UserResponse>> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(AppError::Validation(
            "Name, email, and password are required.".to_owned(),
        ));
    }

    let auth = AuthService::new(state.pool(), state.tokens());
    let user = auth
        .register(
            payload.name.trim(),
            &payload.email,
            &payload.password,
            payload.role,
        )
        .await?;

    Ok(Json(UserResponse {
        message: "User registered successfully.",
        user,
    }))
}

/// Login with email and password.
///
/// On success the minted token is returned in the body and set as an
/// HttpOnly SameSite=Lax cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required.".to_owned(),
        ));
    }

    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, token) = auth.login(&payload.email, &payload.password).await?;

    let jar = jar.add(build_auth_cookie(
        token.clone(),
        state.config().cookie_secure,
    ));

    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful.",
            token,
            user,
        }),
    ))
}

/// Update the caller's own profile (name and/or email).
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<UserResponse>> {
    policy::authorize(Some(&current), Capability::UpdateProfile)?;

    let auth = AuthService::new(state.pool(), state.tokens());
    let user = auth.update_profile(current.id, patch).await?;

    Ok(Json(UserResponse {
        message: "Profile updated.",
        user,
    }))
}

/// Change the caller's own password.
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(payload): Json<PasswordChangePayload>,
) -> Result<Json<MessageResponse>> {
    policy::authorize(Some(&current), Capability::ChangePassword)?;

    if payload.current_password.is_empty() || payload.new_password.is_empty() {
        return Err(AppError::Validation(
            "Both current and new password are required.".to_owned(),
        ));
    }

    let auth = AuthService::new(state.pool(), state.tokens());
    auth.change_password(current.id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully.",
    }))
}
