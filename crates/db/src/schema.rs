//! Idempotent column patches.
//!
//! A patch checks `information_schema.columns` for the target column and
//! issues `ALTER TABLE ... ADD COLUMN IF NOT EXISTS` only when it is absent.
//! The check and the DDL share one pooled connection.

use std::fmt;

use backstore_core::error::CoreError;
use backstore_core::naming::{quote_identifier, validate_identifier};
use sqlx::PgConnection;

use crate::DbPool;

/// Adds `users.terms_accepted BOOLEAN DEFAULT FALSE`.
pub const TERMS_ACCEPTED: ColumnPatch<'static> = ColumnPatch {
    table: "users",
    column: "terms_accepted",
    default: false,
};

/// A boolean column to add to a table found through `search_path`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPatch<'a> {
    pub table: &'a str,
    pub column: &'a str,
    /// Value given to existing rows and to inserts that omit the column.
    pub default: bool,
}

impl ColumnPatch<'_> {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_identifier(self.table)?;
        validate_identifier(self.column)
    }

    /// Render the DDL for this patch. Identifiers must already be validated.
    pub fn add_column_sql(&self) -> String {
        let default = if self.default { "TRUE" } else { "FALSE" };
        format!(
            "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} BOOLEAN DEFAULT {default}",
            quote_identifier(self.table),
            quote_identifier(self.column),
        )
    }
}

impl fmt::Display for ColumnPatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The column was missing and has been added.
    Added,
    /// The column already existed; no DDL was issued.
    AlreadyPresent,
}

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error(transparent)]
    InvalidIdentifier(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Whether `table.column` exists on the table an unqualified `table` resolves to.
///
/// The schema is taken from `search_path` resolution (`to_regclass`), the
/// same lookup the unqualified `ALTER TABLE` uses. A missing table yields
/// `false`. `table` must already be validated.
pub async fn column_exists(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
             SELECT 1
             FROM information_schema.columns
             WHERE table_schema = (
                     SELECT n.nspname
                     FROM pg_class c
                     JOIN pg_namespace n ON n.oid = c.relnamespace
                     WHERE c.oid = to_regclass($1)
                 )
               AND table_name = $2
               AND column_name = $3
         )",
    )
    .bind(quote_identifier(table))
    .bind(table)
    .bind(column)
    .fetch_one(&mut *conn)
    .await
}

/// Add the patch's column unless it already exists.
///
/// Identifiers are validated before any SQL is sent.
pub async fn ensure_column(
    conn: &mut PgConnection,
    patch: &ColumnPatch<'_>,
) -> Result<PatchOutcome, PatchError> {
    patch.validate()?;

    if column_exists(&mut *conn, patch.table, patch.column).await? {
        tracing::info!(table = patch.table, column = patch.column, "Column already present");
        return Ok(PatchOutcome::AlreadyPresent);
    }

    sqlx::query(&patch.add_column_sql())
        .execute(&mut *conn)
        .await?;

    tracing::info!(
        table = patch.table,
        column = patch.column,
        default = patch.default,
        "Column added",
    );
    Ok(PatchOutcome::Added)
}

/// Apply `patch` on one connection from `pool`, then close the pool.
///
/// The pool is consumed and closed on every path, including validation
/// and database failures.
pub async fn run_patch(pool: DbPool, patch: &ColumnPatch<'_>) -> Result<PatchOutcome, PatchError> {
    let result = apply_on_connection(&pool, patch).await;
    pool.close().await;
    tracing::debug!(patch = %patch, "Connection pool closed");
    result
}

async fn apply_on_connection(
    pool: &DbPool,
    patch: &ColumnPatch<'_>,
) -> Result<PatchOutcome, PatchError> {
    let mut conn = pool.acquire().await?;
    ensure_column(&mut conn, patch).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_accepted_sql() {
        assert_eq!(
            TERMS_ACCEPTED.add_column_sql(),
            "ALTER TABLE \"users\" ADD COLUMN IF NOT EXISTS \"terms_accepted\" BOOLEAN DEFAULT FALSE"
        );
    }

    #[test]
    fn true_default_sql() {
        let patch = ColumnPatch {
            table: "accounts",
            column: "is_verified",
            default: true,
        };
        assert!(patch.add_column_sql().ends_with("BOOLEAN DEFAULT TRUE"));
    }

    #[test]
    fn terms_accepted_is_valid() {
        assert!(TERMS_ACCEPTED.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_table_and_column() {
        let bad_table = ColumnPatch {
            table: "users; DROP TABLE users",
            ..TERMS_ACCEPTED
        };
        assert!(bad_table.validate().is_err());

        let bad_column = ColumnPatch {
            column: "Terms",
            ..TERMS_ACCEPTED
        };
        assert!(bad_column.validate().is_err());
    }

    #[test]
    fn display_is_qualified_name() {
        assert_eq!(TERMS_ACCEPTED.to_string(), "users.terms_accepted");
    }

    #[test]
    fn invalid_identifier_error_is_transparent() {
        let err = PatchError::from(CoreError::InvalidIdentifier {
            value: "X".to_string(),
            reason: "must start with a lower-case letter or underscore",
        });
        assert!(err.to_string().starts_with("Invalid identifier \"X\""));
    }
}
