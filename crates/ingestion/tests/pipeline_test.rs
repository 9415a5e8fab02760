//! Pipeline integration tests against in-memory SQLite and mock services.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use database::{email, meeting, processing_status, Database, UrgencyLevel};
use ingest_core::{AnalyzerError, EmailAnalysis, MailMessage, Urgency};
use ingestion::{IngestConfig, IngestError, IngestPipeline, IngestSummary};
use mock_services::{
    FailingAnalyzer, FailingCalendarService, FixedAnalyzer, RecordingCalendarService,
    ScriptedAnalyzer, StaticMailService,
};

const MEETING_TIME: &str = "2026-08-07T15:00:00+00:00";

async fn test_db() -> Database {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();
    db
}

fn config() -> IngestConfig {
    IngestConfig {
        allowed_senders: vec![
            "alice@example.com".to_string(),
            "bob@example.com".to_string(),
        ],
        max_results: 100,
    }
}

fn message(id: &str, subject: Option<&str>) -> MailMessage {
    MailMessage {
        id: id.to_string(),
        sender: "alice@example.com".to_string(),
        subject: subject.map(str::to_string),
        received_at: Utc.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap(),
        snippet: "Can we meet Thursday at 3pm?".to_string(),
    }
}

#[tokio::test]
async fn empty_batch_returns_zero_summary_and_writes_checkpoint() {
    let db = test_db().await;
    let pipeline = IngestPipeline::new(
        StaticMailService::empty(),
        RecordingCalendarService::new(),
        FixedAnalyzer::quiet(),
        db.clone(),
        config(),
    );

    let summary = pipeline.run().await.unwrap();

    assert_eq!(
        summary,
        IngestSummary {
            total_found: 0,
            processed: 0,
            skipped: 0,
            errors: 0
        }
    );

    // The checkpoint is written even for an empty batch.
    let status = processing_status::get_status(db.pool())
        .await
        .unwrap()
        .expect("checkpoint should exist after an empty run");
    assert!(status.last_message_id.is_none());
}

#[tokio::test]
async fn query_is_built_from_sender_allowlist() {
    let db = test_db().await;
    let mail = Arc::new(StaticMailService::empty());
    let pipeline = IngestPipeline::new(
        mail.clone(),
        RecordingCalendarService::new(),
        FixedAnalyzer::quiet(),
        db,
        config(),
    );

    pipeline.run().await.unwrap();

    assert_eq!(
        mail.queries(),
        vec!["from:(alice@example.com OR bob@example.com)".to_string()]
    );
}

#[tokio::test]
async fn empty_allowlist_is_a_configuration_error() {
    let db = test_db().await;
    let pipeline = IngestPipeline::new(
        StaticMailService::empty(),
        RecordingCalendarService::new(),
        FixedAnalyzer::quiet(),
        db,
        IngestConfig {
            allowed_senders: Vec::new(),
            max_results: 100,
        },
    );

    assert!(matches!(
        pipeline.run().await,
        Err(IngestError::Configuration(_))
    ));
}

#[tokio::test]
async fn rejected_credential_fails_the_whole_run() {
    let db = test_db().await;
    let pipeline = IngestPipeline::new(
        StaticMailService::with_auth_failure(),
        RecordingCalendarService::new(),
        FixedAnalyzer::quiet(),
        db.clone(),
        config(),
    );

    assert!(matches!(
        pipeline.run().await,
        Err(IngestError::Authentication(_))
    ));

    // Nothing was written, not even the checkpoint.
    assert!(processing_status::get_status(db.pool())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn meeting_request_creates_email_meeting_and_event() {
    let db = test_db().await;
    let calendar = Arc::new(RecordingCalendarService::new());
    let pipeline = IngestPipeline::new(
        StaticMailService::new(vec![message("msg-1", Some("Project sync"))]),
        calendar.clone(),
        FixedAnalyzer::meeting_at(MEETING_TIME),
        db.clone(),
        config(),
    );

    let summary = pipeline.run().await.unwrap();
    assert_eq!(summary.total_found, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.errors, 0);

    // Email stored, classified, and marked processed.
    let emails = email::list_emails(db.pool(), None).await.unwrap();
    assert_eq!(emails.len(), 1);
    let stored = &emails[0];
    assert_eq!(stored.message_id, "msg-1");
    assert_eq!(stored.subject, "Project sync");
    assert!(stored.processed);
    assert_eq!(stored.urgency_level, Some(UrgencyLevel::High));
    assert_eq!(stored.meeting_request, Some(true));

    // One calendar invite, subject carried over.
    let invites = calendar.invites();
    assert_eq!(invites.len(), 1);
    assert_eq!(invites[0].subject, "Project sync");
    assert_eq!(invites[0].start.to_rfc3339(), MEETING_TIME);

    // Meeting resolves back to the stored email.
    let meetings = meeting::list_meetings(db.pool(), None).await.unwrap();
    assert_eq!(meetings.len(), 1);
    assert_eq!(meetings[0].source_email_id, stored.id);
    assert_eq!(meetings[0].calendar_event_id, "evt-1");
    assert_eq!(meetings[0].date_time, MEETING_TIME);

    // Checkpoint carries the last message id of the batch.
    let status = processing_status::get_status(db.pool())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(status.last_message_id.as_deref(), Some("msg-1"));
}

#[tokio::test]
async fn missing_subject_defaults_to_no_subject() {
    let db = test_db().await;
    let pipeline = IngestPipeline::new(
        StaticMailService::new(vec![message("msg-1", None)]),
        RecordingCalendarService::new(),
        FixedAnalyzer::quiet(),
        db.clone(),
        config(),
    );

    pipeline.run().await.unwrap();

    let emails = email::list_emails(db.pool(), None).await.unwrap();
    assert_eq!(emails[0].subject, "No Subject");
}

#[tokio::test]
async fn rerun_skips_already_stored_messages() {
    let db = test_db().await;
    let messages = vec![
        message("msg-1", Some("Project sync")),
        message("msg-2", Some("Follow-up")),
    ];
    let calendar = Arc::new(RecordingCalendarService::new());
    let analyzer = Arc::new(FixedAnalyzer::meeting_at(MEETING_TIME));

    let first_run = IngestPipeline::new(
        StaticMailService::new(messages.clone()),
        calendar.clone(),
        analyzer.clone(),
        db.clone(),
        config(),
    );
    let summary = first_run.run().await.unwrap();
    assert_eq!(summary.processed, 2);

    let second_run = IngestPipeline::new(
        StaticMailService::new(messages),
        calendar.clone(),
        analyzer,
        db.clone(),
        config(),
    );
    let summary = second_run.run().await.unwrap();
    assert_eq!(summary.total_found, 2);
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.errors, 0);

    // No duplicate emails, meetings, or calendar events.
    assert_eq!(email::list_emails(db.pool(), None).await.unwrap().len(), 2);
    assert_eq!(meeting::list_meetings(db.pool(), None).await.unwrap().len(), 2);
    assert_eq!(calendar.invites().len(), 2);
}

#[tokio::test]
async fn no_meeting_without_meeting_request() {
    let db = test_db().await;
    let calendar = Arc::new(RecordingCalendarService::new());
    let pipeline = IngestPipeline::new(
        StaticMailService::new(vec![message("msg-1", Some("FYI"))]),
        calendar.clone(),
        FixedAnalyzer::quiet(),
        db.clone(),
        config(),
    );

    let summary = pipeline.run().await.unwrap();
    assert_eq!(summary.processed, 1);

    assert!(calendar.invites().is_empty());
    assert!(meeting::list_meetings(db.pool(), None).await.unwrap().is_empty());
}

#[tokio::test]
async fn no_meeting_when_date_time_is_absent() {
    let db = test_db().await;
    let analyzer = FixedAnalyzer::new(EmailAnalysis {
        meeting_request: true,
        date_time: None,
        urgency: Urgency::Medium,
        follow_up_actions: Vec::new(),
    });
    let calendar = Arc::new(RecordingCalendarService::new());
    let pipeline = IngestPipeline::new(
        StaticMailService::new(vec![message("msg-1", Some("Meet sometime?"))]),
        calendar.clone(),
        analyzer,
        db.clone(),
        config(),
    );

    let summary = pipeline.run().await.unwrap();
    assert_eq!(summary.processed, 1);

    assert!(calendar.invites().is_empty());
    assert!(meeting::list_meetings(db.pool(), None).await.unwrap().is_empty());

    // The email itself is still classified.
    let emails = email::list_emails(db.pool(), None).await.unwrap();
    assert!(emails[0].processed);
    assert_eq!(emails[0].meeting_request, Some(true));
}

#[tokio::test]
async fn no_meeting_when_date_time_is_unparseable() {
    let db = test_db().await;
    let calendar = Arc::new(RecordingCalendarService::new());
    let pipeline = IngestPipeline::new(
        StaticMailService::new(vec![message("msg-1", Some("Sync"))]),
        calendar.clone(),
        FixedAnalyzer::meeting_at("next thursday"),
        db.clone(),
        config(),
    );

    let summary = pipeline.run().await.unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.errors, 0);

    assert!(calendar.invites().is_empty());
    assert!(meeting::list_meetings(db.pool(), None).await.unwrap().is_empty());
}

#[tokio::test]
async fn classification_failure_is_counted_and_leaves_email_unprocessed() {
    let db = test_db().await;
    let pipeline = IngestPipeline::new(
        StaticMailService::new(vec![message("msg-1", Some("Sync"))]),
        RecordingCalendarService::new(),
        FailingAnalyzer::new(),
        db.clone(),
        config(),
    );

    let summary = pipeline.run().await.unwrap();
    assert_eq!(summary.total_found, 1);
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.errors, 1);

    // Partial progress is durable: the email row exists, unclassified.
    let emails = email::list_emails(db.pool(), None).await.unwrap();
    assert_eq!(emails.len(), 1);
    assert!(!emails[0].processed);
    assert!(emails[0].urgency_level.is_none());

    // The batch still completed, so the checkpoint moved.
    assert!(processing_status::get_status(db.pool())
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn one_bad_message_does_not_stop_the_batch() {
    let db = test_db().await;
    let analyzer = ScriptedAnalyzer::new(vec![
        Err(AnalyzerError::Api {
            status: 500,
            message: "model overloaded".to_string(),
        }),
        Ok(EmailAnalysis {
            meeting_request: false,
            date_time: None,
            urgency: Urgency::Low,
            follow_up_actions: Vec::new(),
        }),
    ]);
    let pipeline = IngestPipeline::new(
        StaticMailService::new(vec![
            message("msg-1", Some("First")),
            message("msg-2", Some("Second")),
        ]),
        RecordingCalendarService::new(),
        analyzer,
        db.clone(),
        config(),
    );

    let summary = pipeline.run().await.unwrap();
    assert_eq!(summary.total_found, 2);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.errors, 1);

    let emails = email::list_emails(db.pool(), None).await.unwrap();
    assert_eq!(emails.len(), 2);
}

#[tokio::test]
async fn calendar_failure_still_counts_as_processed() {
    let db = test_db().await;
    let pipeline = IngestPipeline::new(
        StaticMailService::new(vec![message("msg-1", Some("Sync"))]),
        FailingCalendarService::new(),
        FixedAnalyzer::meeting_at(MEETING_TIME),
        db.clone(),
        config(),
    );

    let summary = pipeline.run().await.unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.errors, 0);

    // Classified email, but no meeting materialized.
    let emails = email::list_emails(db.pool(), None).await.unwrap();
    assert!(emails[0].processed);
    assert!(meeting::list_meetings(db.pool(), None).await.unwrap().is_empty());
}

#[tokio::test]
async fn reset_returns_prior_state_and_does_not_reprocess() {
    let db = test_db().await;
    let messages = vec![message("msg-1", Some("Sync"))];
    let calendar = Arc::new(RecordingCalendarService::new());

    let pipeline = IngestPipeline::new(
        StaticMailService::new(messages.clone()),
        calendar.clone(),
        FixedAnalyzer::meeting_at(MEETING_TIME),
        db.clone(),
        config(),
    );
    pipeline.run().await.unwrap();

    let previous = pipeline.reset().await.unwrap();
    assert!(previous.is_some());
    assert!(processing_status::get_status(db.pool())
        .await
        .unwrap()
        .is_none());

    // Resetting the checkpoint does not cause re-processing: dedup is
    // keyed on message ids.
    let summary = pipeline.run().await.unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.processed, 0);
    assert_eq!(email::list_emails(db.pool(), None).await.unwrap().len(), 1);
    assert_eq!(meeting::list_meetings(db.pool(), None).await.unwrap().len(), 1);
    assert_eq!(calendar.invites().len(), 1);

    // A second reset, now with no checkpoint, returns None.
    assert!(pipeline.reset().await.unwrap().is_none());
}
