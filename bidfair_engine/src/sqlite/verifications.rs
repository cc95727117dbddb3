use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::{db_types::Verification, sqlite::SqliteDatabaseError};

pub async fn delete_for_identifier(identifier: &str, conn: &mut SqliteConnection) -> Result<u64, SqliteDatabaseError> {
    let result = sqlx::query("DELETE FROM verifications WHERE identifier = ?").bind(identifier).execute(conn).await?;
    Ok(result.rows_affected())
}

pub async fn insert_verification(
    identifier: &str,
    code: &str,
    expires_at: DateTime<Utc>,
    metadata: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    sqlx::query("INSERT INTO verifications (identifier, code, expires_at, metadata) VALUES (?, ?, ?, ?)")
        .bind(identifier)
        .bind(code)
        .bind(expires_at)
        .bind(metadata)
        .execute(conn)
        .await?;
    Ok(())
}

/// Exact match on both identifier and code. No partial or fuzzy matching.
pub async fn fetch_matching(
    identifier: &str,
    code: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Verification>, SqliteDatabaseError> {
    let verification = sqlx::query_as::<_, Verification>(
        "SELECT id, identifier, code, expires_at, metadata, created_at FROM verifications \
         WHERE identifier = ? AND code = ?",
    )
    .bind(identifier)
    .bind(code)
    .fetch_optional(conn)
    .await?;
    Ok(verification)
}

/// Returns the number of rows deleted. Zero means another transaction consumed the row first;
/// the caller must treat that as a lost race, not a success.
pub async fn delete_by_id(id: i64, conn: &mut SqliteConnection) -> Result<u64, SqliteDatabaseError> {
    let result = sqlx::query("DELETE FROM verifications WHERE id = ?").bind(id).execute(conn).await?;
    Ok(result.rows_affected())
}
