//! Ingestion checkpoint operations.
//!
//! The checkpoint is a single row (`id = 1`) written via UPSERT, so each
//! write is atomic and the table can never grow past one row.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::ProcessingStatus;

/// Read the current checkpoint, if one has been written.
pub async fn get_status(pool: &SqlitePool) -> Result<Option<ProcessingStatus>> {
    let status = sqlx::query_as::<_, ProcessingStatus>(
        r#"
        SELECT last_processed_at, last_message_id
        FROM processing_status
        WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(status)
}

/// Write the checkpoint.
///
/// A `None` message id keeps whatever id the previous checkpoint carried,
/// so an empty batch bumps the timestamp without losing the high-water mark.
pub async fn record_checkpoint(
    pool: &SqlitePool,
    last_processed_at: &str,
    last_message_id: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO processing_status (id, last_processed_at, last_message_id)
        VALUES (1, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            last_processed_at = excluded.last_processed_at,
            last_message_id = COALESCE(excluded.last_message_id, processing_status.last_message_id)
        "#,
    )
    .bind(last_processed_at)
    .bind(last_message_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete the checkpoint, returning the prior state (or `None`).
pub async fn reset(pool: &SqlitePool) -> Result<Option<ProcessingStatus>> {
    let mut tx = pool.begin().await?;

    let previous = sqlx::query_as::<_, ProcessingStatus>(
        r#"
        SELECT last_processed_at, last_message_id
        FROM processing_status
        WHERE id = 1
        "#,
    )
    .fetch_optional(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM processing_status")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(previous)
}
