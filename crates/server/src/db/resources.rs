//! Resource repository for database operations.

use sqlx::PgPool;

use amal_core::ResourceId;

use super::update::{SqlValue, UpdateBuilder};
use super::RepositoryError;
use crate::models::resource::{NewResource, Resource, ResourcePatch};

const RESOURCE_COLUMNS: &str = "id, title, description, url, category, created_at";

/// Repository for resource database operations.
pub struct ResourceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ResourceRepository<'a> {
    /// Create a new resource repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all resources, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Resource>, RepositoryError> {
        let rows = sqlx::query_as::<_, Resource>(&format!(
            "SELECT {RESOURCE_COLUMNS} FROM resources ORDER BY id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a new resource.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: NewResource) -> Result<Resource, RepositoryError> {
        let row = sqlx::query_as::<_, Resource>(&format!(
            "INSERT INTO resources (title, description, url, category) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {RESOURCE_COLUMNS}"
        ))
        .bind(new.title)
        .bind(new.description)
        .bind(new.url)
        .bind(new.category)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Apply a sparse update to a resource.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::EmptyUpdate` if no field is present and
    /// `RepositoryError::NotFound` if the id does not exist.
    pub async fn update(
        &self,
        id: ResourceId,
        patch: ResourcePatch,
    ) -> Result<Resource, RepositoryError> {
        let statement = UpdateBuilder::new("resources")
            .set("title", patch.title.map(SqlValue::Text))
            .set("description", patch.description.map(SqlValue::NullableText))
            .set("url", patch.url.map(SqlValue::NullableText))
            .set("category", patch.category.map(SqlValue::NullableText))
            .returning(RESOURCE_COLUMNS)
            .build(id.as_i32())?;

        statement
            .fetch_optional(self.pool)
            .await
            .map_err(RepositoryError::Database)?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a resource by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    pub async fn delete(&self, id: ResourceId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
