//! The ingestion pipeline.
//!
//! Strictly sequential: one credential check, one list call, then each
//! message processed in list order. A failure inside a single message's
//! processing is logged and counted; it never aborts the batch. Only a
//! rejected credential, a failed list call, or a checkpoint write failure
//! fails the whole run.

use chrono::{DateTime, Utc};
use database::email::{NewEmail, StoredAnalysis};
use database::meeting::NewMeeting;
use database::{email, meeting, processing_status, Database, DatabaseError, MeetingStatus};
use ingest_core::{
    Analyzer, AnalyzerError, CalendarInvite, CalendarService, EmailAnalysis, EmailContent,
    MailError, MailService, MessageStub, Urgency,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::IngestError;

/// Subject recorded when a message carries no Subject header.
const DEFAULT_SUBJECT: &str = "No Subject";

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Senders whose mail is ingested. The list query is built from this.
    pub allowed_senders: Vec<String>,
    /// Page cap for the list call.
    pub max_results: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            allowed_senders: Vec::new(),
            max_results: 100,
        }
    }
}

impl IngestConfig {
    /// The provider query string: `from:(s1 OR s2 OR ...)`.
    pub fn query(&self) -> String {
        format!("from:({})", self.allowed_senders.join(" OR "))
    }
}

/// Per-run outcome counts.
///
/// Counts reflect true per-item outcomes: `processed` is the number of
/// messages classified and stored, `skipped` the number already ingested,
/// `errors` the number whose processing failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub total_found: usize,
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Outcome of one message's processing.
enum Outcome {
    Processed,
    Skipped,
}

/// A failure inside one message's processing. Logged and counted, never
/// propagated past the loop.
#[derive(Debug, thiserror::Error)]
enum MessageError {
    #[error("mail error: {0}")]
    Mail(#[from] MailError),
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),
}

/// The email-ingestion pipeline.
///
/// Generic over its three external seams so it runs identically against
/// the real providers and the mock services used in tests.
#[derive(Debug, Clone)]
pub struct IngestPipeline<M, C, A> {
    mail: M,
    calendar: C,
    analyzer: A,
    db: Database,
    config: IngestConfig,
}

impl<M, C, A> IngestPipeline<M, C, A>
where
    M: MailService,
    C: CalendarService,
    A: Analyzer,
{
    /// Create a pipeline over the given services and store.
    pub fn new(mail: M, calendar: C, analyzer: A, db: Database, config: IngestConfig) -> Self {
        Self {
            mail,
            calendar,
            analyzer,
            db,
            config,
        }
    }

    /// Run one ingestion pass and return its summary.
    pub async fn run(&self) -> Result<IngestSummary, IngestError> {
        if self.config.allowed_senders.is_empty() {
            return Err(IngestError::Configuration(
                "allowed sender list is empty".to_string(),
            ));
        }

        info!("Starting email ingestion run");

        // A rejected credential fails the whole run, before any message
        // is touched.
        self.mail
            .verify_credentials()
            .await
            .map_err(|e| IngestError::Authentication(e.to_string()))?;

        let query = self.config.query();
        let stubs = self
            .mail
            .list_messages(&query, self.config.max_results)
            .await?;

        let mut summary = IngestSummary {
            total_found: stubs.len(),
            ..Default::default()
        };

        if stubs.is_empty() {
            info!("No messages matched the sender filter");
            self.checkpoint(None).await?;
            return Ok(summary);
        }

        info!(count = stubs.len(), "Found messages to examine");

        for stub in &stubs {
            match self.process_message(stub).await {
                Ok(Outcome::Processed) => summary.processed += 1,
                Ok(Outcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    warn!(message_id = %stub.id, error = %e, "Failed to process message");
                    summary.errors += 1;
                }
            }
        }

        self.checkpoint(stubs.last().map(|s| s.id.as_str())).await?;

        info!(
            total_found = summary.total_found,
            processed = summary.processed,
            skipped = summary.skipped,
            errors = summary.errors,
            "Ingestion run complete"
        );

        Ok(summary)
    }

    /// Delete the checkpoint, returning the prior state (or `None`).
    ///
    /// Email dedup is keyed on message ids, not the checkpoint, so a
    /// reset never causes already-stored mail to be re-processed.
    pub async fn reset(&self) -> Result<Option<database::ProcessingStatus>, IngestError> {
        let previous = processing_status::reset(self.db.pool()).await?;
        info!(had_status = previous.is_some(), "Processing status reset");
        Ok(previous)
    }

    async fn checkpoint(&self, last_message_id: Option<&str>) -> Result<(), IngestError> {
        processing_status::record_checkpoint(
            self.db.pool(),
            &Utc::now().to_rfc3339(),
            last_message_id,
        )
        .await?;
        Ok(())
    }

    /// Process a single listed message.
    async fn process_message(&self, stub: &MessageStub) -> Result<Outcome, MessageError> {
        let pool = self.db.pool();

        if email::message_exists(pool, &stub.id).await? {
            debug!(message_id = %stub.id, "Email already stored; skipping");
            return Ok(Outcome::Skipped);
        }

        let message = self.mail.fetch_message(&stub.id).await?;
        let subject = message
            .subject
            .clone()
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

        // Persist before classifying so partial progress is durable even
        // if the analyzer call fails.
        let stored = match email::create_email(
            pool,
            NewEmail {
                message_id: message.id.clone(),
                sender: message.sender.clone(),
                subject: subject.clone(),
                received_at: message.received_at.to_rfc3339(),
                body: message.snippet.clone(),
            },
        )
        .await
        {
            Ok(stored) => stored,
            // Another writer got there first; same as the existence check.
            Err(DatabaseError::AlreadyExists { .. }) => return Ok(Outcome::Skipped),
            Err(e) => return Err(e.into()),
        };

        debug!(message_id = %stub.id, email_id = %stored.id, "Stored email");

        let analysis = self
            .analyzer
            .analyze_email(&EmailContent {
                sender: message.sender,
                subject: subject.clone(),
                body: message.snippet,
            })
            .await?;

        email::record_analysis(
            pool,
            &stored.id,
            &StoredAnalysis {
                urgency_level: store_urgency(analysis.urgency),
                meeting_request: analysis.meeting_request,
                follow_up_actions: analysis.follow_up_actions.clone(),
                analyzed_at: Utc::now().to_rfc3339(),
            },
        )
        .await?;

        self.maybe_schedule_meeting(&stub.id, &stored.id, &subject, &analysis)
            .await;

        Ok(Outcome::Processed)
    }

    /// Create the calendar event and meeting record when the analysis
    /// calls for one. Failures here are logged and swallowed; the email
    /// is already classified and stays counted as processed.
    async fn maybe_schedule_meeting(
        &self,
        message_id: &str,
        email_id: &str,
        subject: &str,
        analysis: &EmailAnalysis,
    ) {
        if !analysis.meeting_request {
            return;
        }

        let Some(date_time) = analysis.date_time.as_deref() else {
            debug!(message_id, "Meeting request without a date/time; nothing to schedule");
            return;
        };

        let start = match DateTime::parse_from_rfc3339(date_time) {
            Ok(start) => start.with_timezone(&Utc),
            Err(e) => {
                warn!(message_id, date_time, error = %e, "Meeting date/time not parseable; skipping meeting");
                return;
            }
        };

        let invite = CalendarInvite {
            subject: subject.to_string(),
            start,
        };

        let event = match self.calendar.create_event(&invite).await {
            Ok(event) => event,
            Err(e) => {
                warn!(message_id, error = %e, "Failed to create calendar event");
                return;
            }
        };

        match meeting::create_meeting(
            self.db.pool(),
            NewMeeting {
                source_email_id: email_id.to_string(),
                subject: subject.to_string(),
                date_time: start.to_rfc3339(),
                calendar_event_id: event.event_id,
                meet_link: event.meet_link,
                status: MeetingStatus::Scheduled,
            },
        )
        .await
        {
            Ok(meeting) => {
                info!(message_id, meeting_id = %meeting.id, "Created meeting");
            }
            Err(e) => {
                warn!(message_id, error = %e, "Failed to store meeting");
            }
        }
    }
}

fn store_urgency(urgency: Urgency) -> database::UrgencyLevel {
    match urgency {
        Urgency::High => database::UrgencyLevel::High,
        Urgency::Medium => database::UrgencyLevel::Medium,
        Urgency::Low => database::UrgencyLevel::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_joins_senders_with_or() {
        let config = IngestConfig {
            allowed_senders: vec![
                "alice@example.com".to_string(),
                "bob@example.com".to_string(),
            ],
            max_results: 100,
        };

        assert_eq!(config.query(), "from:(alice@example.com OR bob@example.com)");
    }

    #[test]
    fn test_default_page_size() {
        assert_eq!(IngestConfig::default().max_results, 100);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = IngestSummary {
            total_found: 3,
            processed: 2,
            skipped: 1,
            errors: 0,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalFound"], 3);
        assert_eq!(json["processed"], 2);
        assert_eq!(json["skipped"], 1);
        assert_eq!(json["errors"], 0);
    }
}
