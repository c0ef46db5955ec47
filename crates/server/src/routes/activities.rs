//! Activity route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use amal_core::ActivityId;

use crate::db::ActivityRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::activity::{Activity, ActivityPatch, NewActivity};
use crate::policy::{self, Capability};
use crate::state::AppState;

/// Response for a single-activity mutation.
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub message: &'static str,
    pub activity: Activity,
}

/// Bare confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// List all activities (public).
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Activity>>> {
    let activities = ActivityRepository::new(state.pool()).list().await?;
    Ok(Json(activities))
}

/// Add a new activity.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(payload): Json<NewActivity>,
) -> Result<Json<ActivityResponse>> {
    policy::authorize(Some(&current), Capability::CreateActivity)?;

    if payload.title.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(AppError::Validation(
            "Title and description are required.".to_owned(),
        ));
    }

    let activity = ActivityRepository::new(state.pool()).create(payload).await?;

    Ok(Json(ActivityResponse {
        message: "Activity added successfully",
        activity,
    }))
}

/// Apply a sparse update to an activity.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
    Json(patch): Json<ActivityPatch>,
) -> Result<Json<ActivityResponse>> {
    policy::authorize(Some(&current), Capability::UpdateActivity)?;

    let activity = ActivityRepository::new(state.pool())
        .update(ActivityId::new(id), patch)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("Activity".to_owned()),
            other => other.into(),
        })?;

    Ok(Json(ActivityResponse {
        message: "Activity updated successfully",
        activity,
    }))
}

/// Delete an activity by id.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    policy::authorize(Some(&current), Capability::DeleteActivity)?;

    ActivityRepository::new(state.pool())
        .delete(ActivityId::new(id))
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("Activity".to_owned()),
            other => other.into(),
        })?;

    Ok(Json(MessageResponse { message: "Deleted." }))
}
