//! Authentication extractors for route handlers.
//!
//! Token verification runs here, on every request to a protected
//! capability, before the handler consults the access policy. The token is
//! read from the `Authorization: Bearer` header or, failing that, from the
//! HttpOnly auth cookie set at login.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use amal_core::UserId;

use crate::error::AppError;
use crate::models::user::CurrentUser;
use crate::services::token::TOKEN_TTL_SECS;
use crate::state::AppState;

/// Cookie name for the authentication token.
pub const AUTH_COOKIE_NAME: &str = "token";

/// Extractor that requires a verified identity.
///
/// Rejects with 401 when the token is missing, malformed, or expired.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, user {}!", user.id)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = extract_token(parts).ok_or(AppError::Unauthenticated)?;
        let claims = state
            .tokens()
            .verify(&token)
            .map_err(|_| AppError::Unauthenticated)?;

        Ok(Self(CurrentUser {
            id: UserId::new(claims.sub),
            role: claims.role,
        }))
    }
}

/// Extractor that optionally carries the verified identity.
///
/// Unlike [`RequireAuth`], this never rejects: a missing or invalid token
/// yields `None`, and the access policy decides what that means.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let user = extract_token(parts)
            .and_then(|token| state.tokens().verify(&token).ok())
            .map(|claims| CurrentUser {
                id: UserId::new(claims.sub),
                role: claims.role,
            });

        Ok(Self(user))
    }
}

/// Pull the bearer token from the `Authorization` header or the auth cookie.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get(header::AUTHORIZATION)
        && let Ok(value) = value.to_str()
        && let Some(token) = value.strip_prefix("Bearer ")
        && !token.is_empty()
    {
        return Some(token.to_owned());
    }

    CookieJar::from_headers(&parts.headers)
        .get(AUTH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
}

/// Build the HttpOnly auth cookie carrying a freshly minted token.
///
/// SameSite=Lax and a max-age matching the token's own lifetime; the
/// Secure flag follows configuration so local development over plain HTTP
/// still works.
#[must_use]
pub fn build_auth_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(TOKEN_TTL_SECS))
        .build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/test");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let parts = parts_with_headers(&[("authorization", "Bearer abc.def.ghi")]);
        assert_eq!(extract_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let parts = parts_with_headers(&[("cookie", "token=abc.def.ghi; other=1")]);
        assert_eq!(extract_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_header_wins_over_cookie() {
        let parts = parts_with_headers(&[
            ("authorization", "Bearer from-header"),
            ("cookie", "token=from-cookie"),
        ]);
        assert_eq!(extract_token(&parts).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_missing_token_yields_none() {
        let parts = parts_with_headers(&[]);
        assert!(extract_token(&parts).is_none());

        // A non-bearer scheme doesn't count
        let parts = parts_with_headers(&[("authorization", "Basic dXNlcjpwdw==")]);
        assert!(extract_token(&parts).is_none());
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = build_auth_cookie("abc.def.ghi".to_owned(), true);

        assert_eq!(cookie.name(), AUTH_COOKIE_NAME);
        assert_eq!(cookie.value(), "abc.def.ghi");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.max_age(),
            Some(time::Duration::seconds(TOKEN_TTL_SECS))
        );
    }
}
