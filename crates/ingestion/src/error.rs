//! Error types for pipeline runs.

use database::DatabaseError;
use ingest_core::MailError;
use thiserror::Error;

/// Errors that abort a whole pipeline run.
///
/// Per-message failures are not represented here; they are logged and
/// counted in the run's summary instead.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The pipeline is misconfigured (e.g. empty sender allowlist).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The mail credential was rejected before any message was touched.
    #[error("mail authentication failed: {0}")]
    Authentication(String),

    /// Mail service failure outside the per-message loop.
    #[error("mail error: {0}")]
    Mail(#[from] MailError),

    /// Database failure outside the per-message loop.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}
