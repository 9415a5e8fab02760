//! Meeting record operations.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Meeting, MeetingStatus};

/// Fields for creating a meeting from a classified email.
#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub source_email_id: String,
    pub subject: String,
    pub date_time: String,
    pub calendar_event_id: String,
    pub meet_link: Option<String>,
    pub status: MeetingStatus,
}

/// Create a new meeting and return the stored row.
///
/// Fails with `NotFound` for the referenced email if the foreign key
/// does not resolve — a meeting never exists without its source email.
pub async fn create_meeting(pool: &SqlitePool, new: NewMeeting) -> Result<Meeting> {
    let meeting = Meeting {
        id: Uuid::new_v4().to_string(),
        source_email_id: new.source_email_id,
        subject: new.subject,
        date_time: new.date_time,
        calendar_event_id: new.calendar_event_id,
        meet_link: new.meet_link,
        status: new.status,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    sqlx::query(
        r#"
        INSERT INTO meetings (id, source_email_id, subject, date_time, calendar_event_id, meet_link, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&meeting.id)
    .bind(&meeting.source_email_id)
    .bind(&meeting.subject)
    .bind(&meeting.date_time)
    .bind(&meeting.calendar_event_id)
    .bind(&meeting.meet_link)
    .bind(meeting.status)
    .bind(&meeting.created_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::NotFound {
                    entity: "Email",
                    id: meeting.source_email_id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(meeting)
}

/// Get a meeting by ID.
pub async fn get_meeting(pool: &SqlitePool, id: &str) -> Result<Meeting> {
    sqlx::query_as::<_, Meeting>(
        r#"
        SELECT id, source_email_id, subject, date_time, calendar_event_id, meet_link, status, created_at
        FROM meetings
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Meeting",
        id: id.to_string(),
    })
}

/// List meetings sorted by start time, optionally filtered by status.
pub async fn list_meetings(
    pool: &SqlitePool,
    status: Option<MeetingStatus>,
) -> Result<Vec<Meeting>> {
    let meetings = match status {
        Some(status) => {
            sqlx::query_as::<_, Meeting>(
                r#"
                SELECT id, source_email_id, subject, date_time, calendar_event_id, meet_link, status, created_at
                FROM meetings
                WHERE status = ?
                ORDER BY date_time
                "#,
            )
            .bind(status)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Meeting>(
                r#"
                SELECT id, source_email_id, subject, date_time, calendar_event_id, meet_link, status, created_at
                FROM meetings
                ORDER BY date_time
                "#,
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(meetings)
}

/// Update a meeting's status and return the updated row.
pub async fn update_meeting_status(
    pool: &SqlitePool,
    id: &str,
    status: MeetingStatus,
) -> Result<Meeting> {
    let result = sqlx::query(
        r#"
        UPDATE meetings
        SET status = ?
        WHERE id = ?
        "#,
    )
    .bind(status)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Meeting",
            id: id.to_string(),
        });
    }

    get_meeting(pool, id).await
}

/// Count meetings referencing the given source email.
pub async fn count_for_email(pool: &SqlitePool, source_email_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM meetings WHERE source_email_id = ?
        "#,
    )
    .bind(source_email_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
