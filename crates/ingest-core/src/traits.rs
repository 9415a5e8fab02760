//! Service traits implemented by the external adapters.

use async_trait::async_trait;

use crate::analysis::{EmailAnalysis, EmailContent};
use crate::error::{AnalyzerError, CalendarError, MailError};
use crate::event::{CalendarInvite, ScheduledEvent};
use crate::message::{MailMessage, MessageStub};

/// Mail retrieval.
///
/// Abstracted so the pipeline can run against the real provider or
/// against test doubles.
#[async_trait]
pub trait MailService: Send + Sync {
    /// Check that the stored credential is currently accepted by the
    /// provider. Called once before a pipeline run; failure aborts the
    /// whole run.
    async fn verify_credentials(&self) -> Result<(), MailError>;

    /// List message references matching a provider query string, capped
    /// at `max_results`.
    async fn list_messages(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<MessageStub>, MailError>;

    /// Fetch the full message for a reference.
    async fn fetch_message(&self, id: &str) -> Result<MailMessage, MailError>;
}

/// Calendar event creation.
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Create an event for the invite and return the provider's ids.
    async fn create_event(&self, invite: &CalendarInvite) -> Result<ScheduledEvent, CalendarError>;
}

/// Text classification and generation.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Classify a single email into structured meeting/urgency metadata.
    async fn analyze_email(&self, email: &EmailContent) -> Result<EmailAnalysis, AnalyzerError>;

    /// Generate a free-form markdown report for a prompt.
    async fn generate_report(&self, prompt: &str) -> Result<String, AnalyzerError>;

    /// Human-readable implementation name, for logs.
    fn name(&self) -> &str;
}

// Shared handles are services too; the pipeline and its caller can hold
// the same instance.

#[async_trait]
impl<T: MailService + ?Sized> MailService for std::sync::Arc<T> {
    async fn verify_credentials(&self) -> Result<(), MailError> {
        (**self).verify_credentials().await
    }

    async fn list_messages(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<MessageStub>, MailError> {
        (**self).list_messages(query, max_results).await
    }

    async fn fetch_message(&self, id: &str) -> Result<MailMessage, MailError> {
        (**self).fetch_message(id).await
    }
}

#[async_trait]
impl<T: CalendarService + ?Sized> CalendarService for std::sync::Arc<T> {
    async fn create_event(&self, invite: &CalendarInvite) -> Result<ScheduledEvent, CalendarError> {
        (**self).create_event(invite).await
    }
}

#[async_trait]
impl<T: Analyzer + ?Sized> Analyzer for std::sync::Arc<T> {
    async fn analyze_email(&self, email: &EmailContent) -> Result<EmailAnalysis, AnalyzerError> {
        (**self).analyze_email(email).await
    }

    async fn generate_report(&self, prompt: &str) -> Result<String, AnalyzerError> {
        (**self).generate_report(prompt).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
