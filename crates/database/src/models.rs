//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Lifecycle status of a tracked company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum CompanyStatus {
    Active,
    OnHold,
    Completed,
}

/// Status of a task or of a single task update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
}

/// Urgency level assigned by email classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum UrgencyLevel {
    High,
    Medium,
    Low,
}

/// Lifecycle status of a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MeetingStatus {
    Pending,
    Scheduled,
    Cancelled,
    Completed,
}

/// A tracked company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// UUID, generated on insert.
    pub id: String,
    pub name: String,
    pub industry: String,
    pub status: CompanyStatus,
    pub description: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 last-modified timestamp.
    pub updated_at: String,
}

/// A task belonging to a company.
///
/// `status` and `notes` always mirror the latest entry in the task's
/// update history whenever that history is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// Scheduled date, `YYYY-MM-DD`.
    pub date: String,
    pub company_id: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// An append-only status/notes entry in a task's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub id: i64,
    pub task_id: String,
    pub status: TaskStatus,
    pub notes: String,
    pub date: String,
    /// RFC 3339 timestamp of when the update was appended.
    pub timestamp: String,
}

/// A stored mail message, optionally carrying its classification result.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: String,
    /// External (mail provider) message id, unique per row.
    pub message_id: String,
    pub sender: String,
    pub subject: String,
    /// RFC 3339 timestamp the provider reported for the message.
    pub received_at: String,
    /// Body snippet as returned by the mail provider.
    pub body: String,
    /// True once classification has been stored.
    pub processed: bool,
    pub urgency_level: Option<UrgencyLevel>,
    pub meeting_request: Option<bool>,
    pub follow_up_actions: Option<Json<Vec<String>>>,
    pub analyzed_at: Option<String>,
}

/// A meeting materialized from a classified email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    /// The email this meeting was derived from.
    pub source_email_id: String,
    pub subject: String,
    /// RFC 3339 start time.
    pub date_time: String,
    /// Provider-side calendar event id.
    pub calendar_event_id: String,
    pub meet_link: Option<String>,
    pub status: MeetingStatus,
    pub created_at: String,
}

/// The ingestion checkpoint (single row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStatus {
    /// RFC 3339 timestamp of the last completed pipeline run.
    pub last_processed_at: String,
    /// Last message id seen by the pipeline, if any batch was non-empty.
    pub last_message_id: Option<String>,
}
