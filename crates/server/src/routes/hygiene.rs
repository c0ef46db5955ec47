//! Hygiene distribution route handlers.
//!
//! Unlike the other entities, the list endpoint is not public: distribution
//! records name locations and beneficiary counts, so reads require an
//! authenticated identity.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use amal_core::DistributionId;

use crate::db::DistributionRepository;
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::distribution::{Distribution, DistributionPatch, NewDistribution};
use crate::policy::{self, Capability};
use crate::state::AppState;

/// Response for a single-distribution mutation.
#[derive(Debug, Serialize)]
pub struct DistributionResponse {
    pub message: &'static str,
    pub distribution: Distribution,
}

/// Bare confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// List all distributions (authenticated).
///
/// Uses `OptionalAuth` so that a missing token is denied by the policy
/// itself rather than the extractor.
pub async fn list(
    State(state): State<AppState>,
    OptionalAuth(current): OptionalAuth,
) -> Result<Json<Vec<Distribution>>> {
    policy::authorize(current.as_ref(), Capability::ListDistributions)?;

    let distributions = DistributionRepository::new(state.pool()).list().await?;
    Ok(Json(distributions))
}

/// Record a hygiene package distribution.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(payload): Json<NewDistribution>,
) -> Result<Json<DistributionResponse>> {
    policy::authorize(Some(&current), Capability::RecordDistribution)?;

    if payload.location.trim().is_empty() {
        return Err(AppError::Validation(
            "Location and beneficiary count are required.".to_owned(),
        ));
    }
    if payload.beneficiary_count < 0 {
        return Err(AppError::Validation(
            "Beneficiary count cannot be negative.".to_owned(),
        ));
    }

    let distribution = DistributionRepository::new(state.pool())
        .create(payload)
        .await?;

    Ok(Json(DistributionResponse {
        message: "Hygiene distribution recorded",
        distribution,
    }))
}

/// Apply a sparse update to a distribution record.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
    Json(patch): Json<DistributionPatch>,
) -> Result<Json<DistributionResponse>> {
    policy::authorize(Some(&current), Capability::UpdateDistribution)?;

    if patch.beneficiary_count.is_some_and(|count| count < 0) {
        return Err(AppError::Validation(
            "Beneficiary count cannot be negative.".to_owned(),
        ));
    }

    let distribution = DistributionRepository::new(state.pool())
        .update(DistributionId::new(id), patch)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Hygiene distribution".to_owned())
            }
            other => other.into(),
        })?;

    Ok(Json(DistributionResponse {
        message: "Hygiene distribution updated",
        distribution,
    }))
}

/// Delete a distribution record by id.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    policy::authorize(Some(&current), Capability::DeleteDistribution)?;

    DistributionRepository::new(state.pool())
        .delete(DistributionId::new(id))
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Hygiene distribution".to_owned())
            }
            other => other.into(),
        })?;

    Ok(Json(MessageResponse { message: "Deleted." }))
}
