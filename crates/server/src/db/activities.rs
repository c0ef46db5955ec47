//! Activity repository for database operations.

use sqlx::PgPool;

use amal_core::ActivityId;

use super::update::{SqlValue, UpdateBuilder};
use super::RepositoryError;
use crate::models::activity::{Activity, ActivityPatch, NewActivity};

const ACTIVITY_COLUMNS: &str =
    "id, slug, title, description, category, parent_category, meta, created_at";

/// Repository for activity database operations.
pub struct ActivityRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ActivityRepository<'a> {
    /// Create a new activity repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all activities, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Activity>, RepositoryError> {
        let rows = sqlx::query_as::<_, Activity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities ORDER BY id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a new activity.
    ///
    /// An optional event date is folded into the `meta` JSON object; a
    /// missing category falls back to the parent category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: NewActivity) -> Result<Activity, RepositoryError> {
        let meta = new.date.map(|date| serde_json::json!({ "date": date }));
        let category = new.category.or_else(|| new.parent_category.clone());

        let row = sqlx::query_as::<_, Activity>(&format!(
            "INSERT INTO activities (title, description, category, parent_category, meta) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ACTIVITY_COLUMNS}"
        ))
        .bind(new.title)
        .bind(new.description)
        .bind(category)
        .bind(new.parent_category)
        .bind(meta)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Apply a sparse update to an activity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::EmptyUpdate` if no field is present and
    /// `RepositoryError::NotFound` if the id does not exist.
    pub async fn update(
        &self,
        id: ActivityId,
        patch: ActivityPatch,
    ) -> Result<Activity, RepositoryError> {
        let statement = UpdateBuilder::new("activities")
            .set("title", patch.title.map(SqlValue::Text))
            .set("description", patch.description.map(SqlValue::Text))
            .set("category", patch.category.map(SqlValue::NullableText))
            .set(
                "parent_category",
                patch.parent_category.map(SqlValue::NullableText),
            )
            .set("meta", patch.meta.map(SqlValue::Json))
            .returning(ACTIVITY_COLUMNS)
            .build(id.as_i32())?;

        statement
            .fetch_optional(self.pool)
            .await
            .map_err(RepositoryError::Database)?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete an activity by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    pub async fn delete(&self, id: ActivityId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
