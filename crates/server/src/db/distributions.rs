//! Hygiene distribution repository for database operations.

use sqlx::PgPool;

use amal_core::DistributionId;

use super::update::{SqlValue, UpdateBuilder};
use super::RepositoryError;
use crate::models::distribution::{Distribution, DistributionPatch, NewDistribution};

const DISTRIBUTION_COLUMNS: &str =
    "id, location, beneficiary_count, package_type, notes, created_at";

/// Repository for hygiene distribution database operations.
pub struct DistributionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DistributionRepository<'a> {
    /// Create a new distribution repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all distributions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Distribution>, RepositoryError> {
        let rows = sqlx::query_as::<_, Distribution>(&format!(
            "SELECT {DISTRIBUTION_COLUMNS} FROM hygiene_distributions ORDER BY id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a new distribution record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: NewDistribution) -> Result<Distribution, RepositoryError> {
        let row = sqlx::query_as::<_, Distribution>(&format!(
            "INSERT INTO hygiene_distributions (location, beneficiary_count, package_type, notes) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {DISTRIBUTION_COLUMNS}"
        ))
        .bind(new.location)
        .bind(new.beneficiary_count)
        .bind(new.package_type)
        .bind(new.notes)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Apply a sparse update to a distribution record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::EmptyUpdate` if no field is present and
    /// `RepositoryError::NotFound` if the id does not exist.
    pub async fn update(
        &self,
        id: DistributionId,
        patch: DistributionPatch,
    ) -> Result<Distribution, RepositoryError> {
        let statement = UpdateBuilder::new("hygiene_distributions")
            .set("location", patch.location.map(SqlValue::Text))
            .set("beneficiary_count", patch.beneficiary_count.map(SqlValue::Int))
            .set("package_type", patch.package_type.map(SqlValue::NullableText))
            .set("notes", patch.notes.map(SqlValue::NullableText))
            .returning(DISTRIBUTION_COLUMNS)
            .build(id.as_i32())?;

        statement
            .fetch_optional(self.pool)
            .await
            .map_err(RepositoryError::Database)?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a distribution record by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    pub async fn delete(&self, id: DistributionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM hygiene_distributions WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
