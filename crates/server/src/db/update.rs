//! Partial-update statement builder.
//!
//! Every PATCH endpoint accepts a sparse payload: any subset of an entity's
//! mutable fields. This module turns such a payload into one parameterized
//! `UPDATE` statement.
//!
//! Column names come only from the fixed, server-defined whitelist each
//! repository declares at its call site (`&'static str` literals); caller
//! input never reaches the statement text. Values travel exclusively through
//! the bind channel. For a given whitelist and set of present fields the
//! generated template is identical on every call, so the database can reuse
//! its statement plans.

use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Error returned when no whitelisted field is present in the payload.
///
/// Callers must reject the request as a 400 rather than execute a no-op
/// statement.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no fields to update")]
pub struct EmptyUpdate;

/// A value destined for one bind position of an update statement.
///
/// Variants cover the column types of this schema. `Nullable*` variants
/// carry `None` when the caller explicitly clears an optional column.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// `INTEGER` column.
    Int(i32),
    /// `TEXT NOT NULL` column.
    Text(String),
    /// `TEXT` column; `None` writes SQL NULL.
    NullableText(Option<String>),
    /// `NUMERIC` column.
    Numeric(Decimal),
    /// `JSONB` column; `None` writes SQL NULL.
    Json(Option<JsonValue>),
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        Self::Numeric(v)
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        Self::NullableText(v)
    }
}

/// Builder for one parameterized partial-update statement.
///
/// Fields are declared in a fixed order at the call site; positions are
/// assigned sequentially (starting at `$1`) to the fields that are present,
/// and the target id always binds last for the `WHERE id = $n` predicate.
///
/// ```
/// use amal_server::db::update::{SqlValue, UpdateBuilder};
///
/// let stmt = UpdateBuilder::new("users")
///     .set("name", None::<SqlValue>)
///     .set("email", Some(SqlValue::Text("x@y.com".into())))
///     .returning("id, name, email")
///     .build(7)
///     .unwrap();
///
/// assert_eq!(
///     stmt.sql(),
///     "UPDATE users SET email = $1 WHERE id = $2 RETURNING id, name, email"
/// );
/// ```
#[derive(Debug)]
pub struct UpdateBuilder {
    table: &'static str,
    returning: Option<&'static str>,
    fields: Vec<(&'static str, SqlValue)>,
}

impl UpdateBuilder {
    /// Start a builder for the given table.
    #[must_use]
    pub const fn new(table: &'static str) -> Self {
        Self {
            table,
            returning: None,
            fields: Vec::new(),
        }
    }

    /// Declare one whitelisted column. `None` means the payload did not
    /// carry the field and it is skipped; the column name never comes from
    /// caller input.
    #[must_use]
    pub fn set(mut self, column: &'static str, value: Option<impl Into<SqlValue>>) -> Self {
        if let Some(value) = value {
            self.fields.push((column, value.into()));
        }
        self
    }

    /// Append a `RETURNING` clause to the generated statement.
    #[must_use]
    pub fn returning(mut self, columns: &'static str) -> Self {
        self.returning = Some(columns);
        self
    }

    /// Assemble the statement for the row with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyUpdate`] if no declared field was present.
    pub fn build(self, id: i32) -> Result<UpdateStatement, EmptyUpdate> {
        if self.fields.is_empty() {
            return Err(EmptyUpdate);
        }

        let mut clauses = Vec::with_capacity(self.fields.len());
        let mut params = Vec::with_capacity(self.fields.len() + 1);
        for (position, (column, value)) in self.fields.into_iter().enumerate() {
            clauses.push(format!("{} = ${}", column, position + 1));
            params.push(value);
        }

        let mut sql = format!(
            "UPDATE {} SET {} WHERE id = ${}",
            self.table,
            clauses.join(", "),
            params.len() + 1
        );
        params.push(SqlValue::Int(id));

        if let Some(returning) = self.returning {
            sql.push_str(" RETURNING ");
            sql.push_str(returning);
        }

        Ok(UpdateStatement { sql, params })
    }
}

/// A finished statement: template text plus the ordered bind values.
#[derive(Debug)]
pub struct UpdateStatement {
    sql: String,
    params: Vec<SqlValue>,
}

impl UpdateStatement {
    /// The statement template. Contains only whitelisted column names and
    /// bind placeholders.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bind values, in placeholder order (target id last).
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Execute against the pool, decoding the `RETURNING` row.
    ///
    /// Returns `None` when no row matched the id.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the query fails.
    pub async fn fetch_optional<T>(self, pool: &sqlx::PgPool) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let Self { sql, params } = self;
        let mut query = sqlx::query_as::<_, T>(&sql);
        for param in params {
            query = match param {
                SqlValue::Int(v) => query.bind(v),
                SqlValue::Text(v) => query.bind(v),
                SqlValue::NullableText(v) => query.bind(v),
                SqlValue::Numeric(v) => query.bind(v),
                SqlValue::Json(v) => query.bind(v),
            };
        }
        query.fetch_optional(pool).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<SqlValue> {
        Some(SqlValue::Text(s.to_owned()))
    }

    #[test]
    fn test_builds_only_present_fields() {
        let stmt = UpdateBuilder::new("users")
            .set("name", None::<SqlValue>)
            .set("email", text("x@y.com"))
            .build(7)
            .unwrap();

        assert_eq!(stmt.sql(), "UPDATE users SET email = $1 WHERE id = $2");
        assert_eq!(
            stmt.params(),
            &[SqlValue::Text("x@y.com".to_owned()), SqlValue::Int(7)]
        );
    }

    #[test]
    fn test_positions_follow_declaration_order() {
        let stmt = UpdateBuilder::new("donations")
            .set("donor_name", text("Asha"))
            .set("amount", Some(SqlValue::Numeric(Decimal::new(2500, 2))))
            .set("category", None::<SqlValue>)
            .set("note", Some(SqlValue::NullableText(None)))
            .build(3)
            .unwrap();

        assert_eq!(
            stmt.sql(),
            "UPDATE donations SET donor_name = $1, amount = $2, note = $3 WHERE id = $4"
        );
        assert_eq!(stmt.params().len(), 4);
        assert_eq!(stmt.params()[2], SqlValue::NullableText(None));
        assert_eq!(stmt.params()[3], SqlValue::Int(3));
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let result = UpdateBuilder::new("users")
            .set("name", None::<SqlValue>)
            .set("email", None::<SqlValue>)
            .build(7);

        assert_eq!(result.unwrap_err(), EmptyUpdate);
    }

    #[test]
    fn test_template_is_deterministic() {
        let build = || {
            UpdateBuilder::new("resources")
                .set("title", text("Shelter list"))
                .set("url", Some(SqlValue::NullableText(Some("https://example.org".to_owned()))))
                .build(12)
                .unwrap()
        };

        assert_eq!(build().sql(), build().sql());
    }

    #[test]
    fn test_returning_clause_is_appended() {
        let stmt = UpdateBuilder::new("users")
            .set("name", text("Asha"))
            .returning("id, name, email, role, created_at")
            .build(1)
            .unwrap();

        assert_eq!(
            stmt.sql(),
            "UPDATE users SET name = $1 WHERE id = $2 RETURNING id, name, email, role, created_at"
        );
    }

    #[test]
    fn test_values_never_enter_template() {
        // A hostile value stays in the bind list; the template text only
        // contains the whitelisted column names.
        let hostile = "x'; DROP TABLE users; --";
        let stmt = UpdateBuilder::new("users")
            .set("name", text(hostile))
            .build(1)
            .unwrap();

        assert!(!stmt.sql().contains(hostile));
        assert_eq!(stmt.params()[0], SqlValue::Text(hostile.to_owned()));
    }
}
