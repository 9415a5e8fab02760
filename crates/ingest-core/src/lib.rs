//! Core traits and types for the email-ingestion pipeline.
//!
//! This crate provides the shared interface between the ingestion pipeline
//! and its three external collaborators. It defines:
//!
//! - [`MailService`] - mail retrieval (credential check, list, fetch)
//! - [`CalendarService`] - calendar event creation
//! - [`Analyzer`] - email classification and report generation
//! - [`MailMessage`] / [`EmailAnalysis`] / [`ScheduledEvent`] - the value
//!   types flowing between them
//! - [`MailError`] / [`CalendarError`] / [`AnalyzerError`] - per-seam errors
//!
//! # Example
//!
//! ```rust
//! use ingest_core::{async_trait, Analyzer, AnalyzerError, EmailAnalysis, EmailContent, Urgency};
//!
//! struct AlwaysLow;
//!
//! #[async_trait]
//! impl Analyzer for AlwaysLow {
//!     async fn analyze_email(&self, _email: &EmailContent) -> Result<EmailAnalysis, AnalyzerError> {
//!         Ok(EmailAnalysis {
//!             meeting_request: false,
//!             date_time: None,
//!             urgency: Urgency::Low,
//!             follow_up_actions: Vec::new(),
//!         })
//!     }
//!
//!     async fn generate_report(&self, _prompt: &str) -> Result<String, AnalyzerError> {
//!         Ok("nothing to report".to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "AlwaysLow"
//!     }
//! }
//! ```

mod analysis;
mod error;
mod event;
mod message;
mod traits;

pub use analysis::{EmailAnalysis, EmailContent, Urgency};
pub use error::{AnalyzerError, CalendarError, MailError};
pub use event::{CalendarInvite, ScheduledEvent};
pub use message::{MailMessage, MessageStub};
pub use traits::{Analyzer, CalendarService, MailService};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
