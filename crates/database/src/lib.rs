//! SQLite persistence layer for Opsdesk.
//!
//! This crate provides async database operations for companies, tasks (with
//! their append-only update histories), ingested emails, meetings, and the
//! ingestion checkpoint, using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{company, Database};
//! use database::company::NewCompany;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:opsdesk.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let acme = company::create_company(
//!         db.pool(),
//!         NewCompany {
//!             name: "Acme".to_string(),
//!             industry: "Retail".to_string(),
//!             status: None,
//!             description: None,
//!         },
//!     )
//!     .await?;
//!     println!("created company {}", acme.id);
//!
//!     Ok(())
//! }
//! ```

pub mod company;
pub mod email;
pub mod error;
pub mod meeting;
pub mod models;
pub mod processing_status;
pub mod task;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{
    Company, CompanyStatus, Email, Meeting, MeetingStatus, ProcessingStatus, Task, TaskStatus,
    TaskUpdate, UrgencyLevel,
};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist, or
    /// `sqlite::memory:` for tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::company::NewCompany;
    use crate::email::{NewEmail, StoredAnalysis};
    use crate::meeting::NewMeeting;
    use crate::task::{NewTask, NewTaskUpdate};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn seed_company(db: &Database) -> Company {
        company::create_company(
            db.pool(),
            NewCompany {
                name: "Acme".to_string(),
                industry: "Retail".to_string(),
                status: None,
                description: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_company_crud() {
        let db = test_db().await;

        let created = seed_company(&db).await;
        assert_eq!(created.status, CompanyStatus::Active);

        let fetched = company::get_company(db.pool(), &created.id).await.unwrap();
        assert_eq!(fetched.name, "Acme");

        let updated = company::update_company(
            db.pool(),
            &created.id,
            company::CompanyChanges {
                status: Some(CompanyStatus::OnHold),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.status, CompanyStatus::OnHold);
        assert_eq!(updated.name, "Acme");

        let companies = company::list_companies(db.pool()).await.unwrap();
        assert_eq!(companies.len(), 1);

        let missing = company::update_company(
            db.pool(),
            "no-such-id",
            company::CompanyChanges::default(),
        )
        .await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_task_update_mirrors_latest() {
        let db = test_db().await;
        let acme = seed_company(&db).await;

        let task = task::create_task(
            db.pool(),
            NewTask {
                title: "Quarterly review".to_string(),
                description: None,
                status: None,
                date: "2026-08-06".to_string(),
                company_id: acme.id.clone(),
            },
        )
        .await
        .unwrap();
        assert_eq!(task.status, TaskStatus::Todo);
        assert!(task.notes.is_none());

        let (after_first, updates) = task::append_update(
            db.pool(),
            &task.id,
            NewTaskUpdate {
                status: TaskStatus::InProgress,
                notes: "kicked off".to_string(),
                date: "2026-08-06".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(after_first.status, TaskStatus::InProgress);
        assert_eq!(after_first.notes.as_deref(), Some("kicked off"));
        assert_eq!(updates.len(), 1);

        let (after_second, updates) = task::append_update(
            db.pool(),
            &task.id,
            NewTaskUpdate {
                status: TaskStatus::Completed,
                notes: "done".to_string(),
                date: "2026-08-07".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(after_second.status, TaskStatus::Completed);
        assert_eq!(after_second.notes.as_deref(), Some("done"));
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].notes, "done");
    }

    #[tokio::test]
    async fn test_task_requires_existing_company() {
        let db = test_db().await;

        let result = task::create_task(
            db.pool(),
            NewTask {
                title: "Orphan".to_string(),
                description: None,
                status: None,
                date: "2026-08-06".to_string(),
                company_id: "no-such-company".to_string(),
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(DatabaseError::NotFound { entity: "Company", .. })
        ));
    }

    #[tokio::test]
    async fn test_task_delete_cascades_updates() {
        let db = test_db().await;
        let acme = seed_company(&db).await;

        let task = task::create_task(
            db.pool(),
            NewTask {
                title: "Short-lived".to_string(),
                description: None,
                status: None,
                date: "2026-08-06".to_string(),
                company_id: acme.id.clone(),
            },
        )
        .await
        .unwrap();

        task::append_update(
            db.pool(),
            &task.id,
            NewTaskUpdate {
                status: TaskStatus::Completed,
                notes: "done".to_string(),
                date: "2026-08-06".to_string(),
            },
        )
        .await
        .unwrap();

        task::delete_task(db.pool(), &task.id).await.unwrap();

        let result = task::get_task(db.pool(), &task.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        let result = task::list_updates(db.pool(), &task.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_email_dedup_by_message_id() {
        let db = test_db().await;

        let new_email = NewEmail {
            message_id: "msg-1".to_string(),
            sender: "alice@example.com".to_string(),
            subject: "Hello".to_string(),
            received_at: "2026-08-06T09:00:00+00:00".to_string(),
            body: "snippet".to_string(),
        };

        let stored = email::create_email(db.pool(), new_email.clone()).await.unwrap();
        assert!(!stored.processed);
        assert!(email::message_exists(db.pool(), "msg-1").await.unwrap());

        let duplicate = email::create_email(db.pool(), new_email).await;
        assert!(matches!(
            duplicate,
            Err(DatabaseError::AlreadyExists { entity: "Email", .. })
        ));
    }

    #[tokio::test]
    async fn test_email_analysis_and_filter() {
        let db = test_db().await;

        let stored = email::create_email(
            db.pool(),
            NewEmail {
                message_id: "msg-2".to_string(),
                sender: "bob@example.com".to_string(),
                subject: "Sync?".to_string(),
                received_at: "2026-08-06T10:00:00+00:00".to_string(),
                body: "can we meet".to_string(),
            },
        )
        .await
        .unwrap();

        email::record_analysis(
            db.pool(),
            &stored.id,
            &StoredAnalysis {
                urgency_level: UrgencyLevel::High,
                meeting_request: true,
                follow_up_actions: vec!["reply with availability".to_string()],
                analyzed_at: "2026-08-06T10:01:00+00:00".to_string(),
            },
        )
        .await
        .unwrap();

        let fetched = email::get_email(db.pool(), &stored.id).await.unwrap();
        assert!(fetched.processed);
        assert_eq!(fetched.urgency_level, Some(UrgencyLevel::High));
        assert_eq!(fetched.meeting_request, Some(true));
        assert_eq!(
            fetched.follow_up_actions.as_ref().unwrap().0,
            vec!["reply with availability".to_string()]
        );

        let high = email::list_emails(db.pool(), Some(UrgencyLevel::High))
            .await
            .unwrap();
        assert_eq!(high.len(), 1);

        let low = email::list_emails(db.pool(), Some(UrgencyLevel::Low))
            .await
            .unwrap();
        assert!(low.is_empty());
    }

    #[tokio::test]
    async fn test_meeting_requires_source_email() {
        let db = test_db().await;

        let result = meeting::create_meeting(
            db.pool(),
            NewMeeting {
                source_email_id: "no-such-email".to_string(),
                subject: "Ghost meeting".to_string(),
                date_time: "2026-08-07T15:00:00+00:00".to_string(),
                calendar_event_id: "evt-1".to_string(),
                meet_link: None,
                status: MeetingStatus::Scheduled,
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(DatabaseError::NotFound { entity: "Email", .. })
        ));
    }

    #[tokio::test]
    async fn test_meeting_status_roundtrip() {
        let db = test_db().await;

        let stored = email::create_email(
            db.pool(),
            NewEmail {
                message_id: "msg-3".to_string(),
                sender: "carol@example.com".to_string(),
                subject: "Planning".to_string(),
                received_at: "2026-08-06T11:00:00+00:00".to_string(),
                body: "let's plan".to_string(),
            },
        )
        .await
        .unwrap();

        let created = meeting::create_meeting(
            db.pool(),
            NewMeeting {
                source_email_id: stored.id.clone(),
                subject: "Planning".to_string(),
                date_time: "2026-08-07T15:00:00+00:00".to_string(),
                calendar_event_id: "evt-2".to_string(),
                meet_link: Some("https://meet.example.com/abc".to_string()),
                status: MeetingStatus::Scheduled,
            },
        )
        .await
        .unwrap();

        let cancelled =
            meeting::update_meeting_status(db.pool(), &created.id, MeetingStatus::Cancelled)
                .await
                .unwrap();
        assert_eq!(cancelled.status, MeetingStatus::Cancelled);

        let filtered = meeting::list_meetings(db.pool(), Some(MeetingStatus::Cancelled))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].source_email_id, stored.id);

        assert_eq!(
            meeting::count_for_email(db.pool(), &stored.id).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_checkpoint_upsert_and_reset() {
        let db = test_db().await;

        assert!(processing_status::get_status(db.pool())
            .await
            .unwrap()
            .is_none());

        processing_status::record_checkpoint(
            db.pool(),
            "2026-08-06T09:00:00+00:00",
            Some("msg-9"),
        )
        .await
        .unwrap();

        // An empty-batch checkpoint keeps the prior message id.
        processing_status::record_checkpoint(db.pool(), "2026-08-06T10:00:00+00:00", None)
            .await
            .unwrap();

        let status = processing_status::get_status(db.pool())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(status.last_processed_at, "2026-08-06T10:00:00+00:00");
        assert_eq!(status.last_message_id.as_deref(), Some("msg-9"));

        let previous = processing_status::reset(db.pool()).await.unwrap().unwrap();
        assert_eq!(previous.last_message_id.as_deref(), Some("msg-9"));

        assert!(processing_status::get_status(db.pool())
            .await
            .unwrap()
            .is_none());

        // Resetting an already-empty checkpoint returns None.
        assert!(processing_status::reset(db.pool()).await.unwrap().is_none());
    }
}
