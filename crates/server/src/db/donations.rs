//! Donation repository for database operations.

use sqlx::PgPool;

use amal_core::DonationId;

use super::update::{SqlValue, UpdateBuilder};
use super::RepositoryError;
use crate::models::donation::{Donation, DonationPatch, DonationSummary, NewDonation};

const DONATION_COLUMNS: &str = "id, donor_name, amount, category, note, created_at";

/// Repository for donation database operations.
pub struct DonationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DonationRepository<'a> {
    /// Create a new donation repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all donations, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Donation>, RepositoryError> {
        let rows = sqlx::query_as::<_, Donation>(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations ORDER BY id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a new donation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: NewDonation) -> Result<Donation, RepositoryError> {
        let row = sqlx::query_as::<_, Donation>(&format!(
            "INSERT INTO donations (donor_name, amount, category, note) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {DONATION_COLUMNS}"
        ))
        .bind(new.donor_name)
        .bind(new.amount)
        .bind(new.category)
        .bind(new.note)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Apply a sparse update to a donation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::EmptyUpdate` if no field is present and
    /// `RepositoryError::NotFound` if the id does not exist.
    pub async fn update(
        &self,
        id: DonationId,
        patch: DonationPatch,
    ) -> Result<Donation, RepositoryError> {
        let statement = UpdateBuilder::new("donations")
            .set("donor_name", patch.donor_name.map(SqlValue::Text))
            .set("amount", patch.amount.map(SqlValue::Numeric))
            .set("category", patch.category.map(SqlValue::Text))
            .set("note", patch.note.map(SqlValue::NullableText))
            .returning(DONATION_COLUMNS)
            .build(id.as_i32())?;

        statement
            .fetch_optional(self.pool)
            .await
            .map_err(RepositoryError::Database)?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a donation by id, returning the removed record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    pub async fn delete_returning(&self, id: DonationId) -> Result<Donation, RepositoryError> {
        let row = sqlx::query_as::<_, Donation>(&format!(
            "DELETE FROM donations WHERE id = $1 RETURNING {DONATION_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)
    }

    /// Aggregate total amount and count over all donations.
    ///
    /// An empty table yields a zero total, not NULL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary(&self) -> Result<DonationSummary, RepositoryError> {
        let summary = sqlx::query_as::<_, DonationSummary>(
            "SELECT COALESCE(SUM(amount), 0) AS total_amount, COUNT(*) AS count FROM donations",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }
}
