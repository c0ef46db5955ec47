//! HTTP route handlers for the public JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Auth
//! POST  /api/auth/register     - Register a new identity
//! POST  /api/auth/login        - Login (returns bearer token + cookie)
//! PATCH /api/auth/profile      - Update own name/email (auth)
//! PATCH /api/auth/password     - Change own password (auth)
//!
//! # Activities
//! GET    /api/activities       - List activities (public)
//! POST   /api/activities       - Add activity (admin/volunteer)
//! PATCH  /api/activities/{id}  - Update activity (admin/volunteer)
//! DELETE /api/activities/{id}  - Delete activity (admin)
//!
//! # Donations
//! GET    /api/donations          - List donations (public)
//! GET    /api/donations/summary  - Totals and count (public)
//! POST   /api/donations          - Record donation (admin/volunteer)
//! PATCH  /api/donations/{id}     - Update donation (admin/volunteer)
//! DELETE /api/donations/{id}     - Delete donation (admin)
//!
//! # Hygiene distributions
//! GET    /api/hygiene          - List distributions (auth)
//! POST   /api/hygiene          - Record distribution (admin/volunteer)
//! PATCH  /api/hygiene/{id}     - Update distribution (admin/volunteer)
//! DELETE /api/hygiene/{id}     - Delete distribution (admin)
//!
//! # Resources
//! GET    /api/resources        - List resources (public)
//! POST   /api/resources        - Add resource (admin/volunteer)
//! PATCH  /api/resources/{id}   - Update resource (admin/volunteer)
//! DELETE /api/resources/{id}   - Delete resource (admin)
//! ```

pub mod activities;
pub mod auth;
pub mod donations;
pub mod hygiene;
pub mod resources;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/profile", patch(auth::update_profile))
        .route("/password", patch(auth::change_password))
}

/// Create the activities routes router.
pub fn activities_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(activities::list).post(activities::create))
        .route(
            "/{id}",
            patch(activities::update).delete(activities::delete),
        )
}

/// Create the donations routes router.
pub fn donations_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(donations::list).post(donations::create))
        .route("/summary", get(donations::summary))
        .route("/{id}", patch(donations::update).delete(donations::delete))
}

/// Create the hygiene distribution routes router.
pub fn hygiene_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(hygiene::list).post(hygiene::create))
        .route("/{id}", patch(hygiene::update).delete(hygiene::delete))
}

/// Create the resources routes router.
pub fn resources_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(resources::list).post(resources::create))
        .route("/{id}", patch(resources::update).delete(resources::delete))
}

/// Assemble the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/activities", activities_routes())
        .nest("/api/donations", donations_routes())
        .nest("/api/hygiene", hygiene_routes())
        .nest("/api/resources", resources_routes())
}
