//! HTTP middleware and extractors.
//!
//! # Request pipeline (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. CORS
//! 4. Per-handler extractors: [`RequireAuth`] / [`OptionalAuth`] verify the
//!    bearer token, then the handler consults the access policy

pub mod auth;

pub use auth::{AUTH_COOKIE_NAME, OptionalAuth, RequireAuth, build_auth_cookie};
