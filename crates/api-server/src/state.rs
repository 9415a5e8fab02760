//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use database::Database;
use gemini_analyzer::GeminiAnalyzer;
use google_workspace::{CalendarClient, GmailClient, GoogleAuth};
use ingestion::IngestPipeline;

/// The concrete pipeline wired against the real providers.
pub type Pipeline = IngestPipeline<GmailClient, CalendarClient, GeminiAnalyzer>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Google OAuth credential shared by the mail and calendar clients.
    pub auth: Arc<GoogleAuth>,
    /// Analyzer for report generation.
    pub analyzer: GeminiAnalyzer,
    /// The email-ingestion pipeline.
    pub pipeline: Pipeline,
    /// Wall-clock budget for report generation.
    pub report_timeout: Duration,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        auth: Arc<GoogleAuth>,
        analyzer: GeminiAnalyzer,
        pipeline: Pipeline,
        report_timeout: Duration,
    ) -> Self {
        Self {
            db,
            auth,
            analyzer,
            pipeline,
            report_timeout,
        }
    }
}
