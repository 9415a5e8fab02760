//! Email record operations.
//!
//! One row per external message id. Rows are created unclassified
//! (`processed = false`) so a partially-ingested message survives a
//! classification failure; `record_analysis` flips the flag.

use sqlx::types::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Email, UrgencyLevel};

/// Fields for storing a newly fetched mail message.
#[derive(Debug, Clone)]
pub struct NewEmail {
    pub message_id: String,
    pub sender: String,
    pub subject: String,
    pub received_at: String,
    pub body: String,
}

/// A classification result ready to be written onto an email row.
#[derive(Debug, Clone)]
pub struct StoredAnalysis {
    pub urgency_level: UrgencyLevel,
    pub meeting_request: bool,
    pub follow_up_actions: Vec<String>,
    pub analyzed_at: String,
}

/// Store a new, unclassified email.
///
/// Fails with `AlreadyExists` if the message id has been stored before.
pub async fn create_email(pool: &SqlitePool, new: NewEmail) -> Result<Email> {
    let email = Email {
        id: Uuid::new_v4().to_string(),
        message_id: new.message_id,
        sender: new.sender,
        subject: new.subject,
        received_at: new.received_at,
        body: new.body,
        processed: false,
        urgency_level: None,
        meeting_request: None,
        follow_up_actions: None,
        analyzed_at: None,
    };

    sqlx::query(
        r#"
        INSERT INTO emails (id, message_id, sender, subject, received_at, body, processed)
        VALUES (?, ?, ?, ?, ?, ?, 0)
        "#,
    )
    .bind(&email.id)
    .bind(&email.message_id)
    .bind(&email.sender)
    .bind(&email.subject)
    .bind(&email.received_at)
    .bind(&email.body)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Email",
                    id: email.message_id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(email)
}

/// Whether an email with the given external message id is already stored.
pub async fn message_exists(pool: &SqlitePool, message_id: &str) -> Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM emails WHERE message_id = ?
        "#,
    )
    .bind(message_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Write a classification result onto an email and mark it processed.
pub async fn record_analysis(
    pool: &SqlitePool,
    email_id: &str,
    analysis: &StoredAnalysis,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE emails
        SET urgency_level = ?, meeting_request = ?, follow_up_actions = ?,
            analyzed_at = ?, processed = 1
        WHERE id = ?
        "#,
    )
    .bind(analysis.urgency_level)
    .bind(analysis.meeting_request)
    .bind(Json(&analysis.follow_up_actions))
    .bind(&analysis.analyzed_at)
    .bind(email_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Email",
            id: email_id.to_string(),
        });
    }

    Ok(())
}

/// Get an email by ID.
pub async fn get_email(pool: &SqlitePool, id: &str) -> Result<Email> {
    sqlx::query_as::<_, Email>(
        r#"
        SELECT id, message_id, sender, subject, received_at, body, processed,
               urgency_level, meeting_request, follow_up_actions, analyzed_at
        FROM emails
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Email",
        id: id.to_string(),
    })
}

/// List stored emails, newest first, optionally filtered by urgency.
pub async fn list_emails(
    pool: &SqlitePool,
    urgency: Option<UrgencyLevel>,
) -> Result<Vec<Email>> {
    let emails = match urgency {
        Some(urgency) => {
            sqlx::query_as::<_, Email>(
                r#"
                SELECT id, message_id, sender, subject, received_at, body, processed,
                       urgency_level, meeting_request, follow_up_actions, analyzed_at
                FROM emails
                WHERE urgency_level = ?
                ORDER BY received_at DESC
                "#,
            )
            .bind(urgency)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Email>(
                r#"
                SELECT id, message_id, sender, subject, received_at, body, processed,
                       urgency_level, meeting_request, follow_up_actions, analyzed_at
                FROM emails
                ORDER BY received_at DESC
                "#,
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(emails)
}
