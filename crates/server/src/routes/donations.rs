//! Donation route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use amal_core::DonationId;

use crate::db::DonationRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::donation::{Donation, DonationPatch, DonationSummary, NewDonation};
use crate::policy::{self, Capability};
use crate::state::AppState;

/// Response for a single-donation mutation.
#[derive(Debug, Serialize)]
pub struct DonationResponse {
    pub message: &'static str,
    pub donation: Donation,
}

/// List all donations (public).
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Donation>>> {
    let donations = DonationRepository::new(state.pool()).list().await?;
    Ok(Json(donations))
}

/// Donation totals and count (public).
pub async fn summary(State(state): State<AppState>) -> Result<Json<DonationSummary>> {
    let summary = DonationRepository::new(state.pool()).summary().await?;
    Ok(Json(summary))
}

/// Record a new donation.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(payload): Json<NewDonation>,
) -> Result<Json<DonationResponse>> {
    policy::authorize(Some(&current), Capability::CreateDonation)?;

    if payload.donor_name.trim().is_empty() || payload.category.trim().is_empty() {
        return Err(AppError::Validation(
            "Donor name, amount, and category are required.".to_owned(),
        ));
    }

    let donation = DonationRepository::new(state.pool()).create(payload).await?;

    Ok(Json(DonationResponse {
        message: "Donation created successfully",
        donation,
    }))
}

/// Apply a sparse update to a donation.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
    Json(patch): Json<DonationPatch>,
) -> Result<Json<DonationResponse>> {
    policy::authorize(Some(&current), Capability::UpdateDonation)?;

    let donation = DonationRepository::new(state.pool())
        .update(DonationId::new(id), patch)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("Donation".to_owned()),
            other => other.into(),
        })?;

    Ok(Json(DonationResponse {
        message: "Donation updated successfully",
        donation,
    }))
}

/// Delete a donation by id.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<DonationResponse>> {
    policy::authorize(Some(&current), Capability::DeleteDonation)?;

    // RETURNING-based delete so the response can echo the removed record
    let repo = DonationRepository::new(state.pool());
    let donation = repo
        .delete_returning(DonationId::new(id))
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("Donation".to_owned()),
            other => other.into(),
        })?;

    Ok(Json(DonationResponse {
        message: "Donation deleted successfully",
        donation,
    }))
}
