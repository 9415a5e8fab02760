//! Error types for the pipeline's external seams.

use thiserror::Error;

/// Errors from the mail-retrieval service.
#[derive(Debug, Error)]
pub enum MailError {
    /// Credential is missing, expired, or rejected.
    #[error("mail authentication failed: {0}")]
    Authentication(String),

    /// Transport-level failure (connection, timeout).
    #[error("mail network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("mail API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response could not be interpreted.
    #[error("mail response parse error: {0}")]
    Parse(String),
}

/// Errors from the calendar service.
#[derive(Debug, Error)]
pub enum CalendarError {
    /// Credential is missing, expired, or rejected.
    #[error("calendar authentication failed: {0}")]
    Authentication(String),

    /// Transport-level failure (connection, timeout).
    #[error("calendar network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("calendar API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response could not be interpreted.
    #[error("calendar response parse error: {0}")]
    Parse(String),
}

/// Errors from the text-classification/generation service.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Invalid or missing configuration (API key, URL).
    #[error("analyzer configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure (connection, timeout).
    #[error("analyzer network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("analyzer API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The model's output did not match the expected shape.
    #[error("analyzer response invalid: {0}")]
    InvalidResponse(String),
}
