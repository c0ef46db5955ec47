//! Resource route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use amal_core::ResourceId;

use crate::db::ResourceRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::resource::{NewResource, Resource, ResourcePatch};
use crate::policy::{self, Capability};
use crate::state::AppState;

/// Response for a single-resource mutation.
#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    pub message: &'static str,
    pub resource: Resource,
}

/// Bare confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// List all resources (public).
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Resource>>> {
    let resources = ResourceRepository::new(state.pool()).list().await?;
    Ok(Json(resources))
}

/// Add a new resource.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(payload): Json<NewResource>,
) -> Result<Json<ResourceResponse>> {
    policy::authorize(Some(&current), Capability::CreateResource)?;

    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required.".to_owned()));
    }

    let resource = ResourceRepository::new(state.pool()).create(payload).await?;

    Ok(Json(ResourceResponse {
        message: "Resource added",
        resource,
    }))
}

/// Apply a sparse update to a resource.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
    Json(patch): Json<ResourcePatch>,
) -> Result<Json<ResourceResponse>> {
    policy::authorize(Some(&current), Capability::UpdateResource)?;

    let resource = ResourceRepository::new(state.pool())
        .update(ResourceId::new(id), patch)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("Resource".to_owned()),
            other => other.into(),
        })?;

    Ok(Json(ResourceResponse {
        message: "Resource updated",
        resource,
    }))
}

/// Delete a resource by id.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    policy::authorize(Some(&current), Capability::DeleteResource)?;

    ResourceRepository::new(state.pool())
        .delete(ResourceId::new(id))
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("Resource".to_owned()),
            other => other.into(),
        })?;

    Ok(Json(MessageResponse { message: "Deleted." }))
}
