//! Google Workspace clients for Opsdesk.
//!
//! Direct HTTP access to the Gmail and Google Calendar APIs via reqwest,
//! sharing one OAuth2 credential:
//!
//! - [`GoogleAuth`] - client credentials + token file, refresh, and the
//!   interactive authorization-code exchange
//! - [`GmailClient`] - implements [`ingest_core::MailService`]
//! - [`CalendarClient`] - implements [`ingest_core::CalendarService`]
//!
//! Every API call is single-shot: failures surface immediately and are
//! never retried here.

mod auth;
mod calendar;
mod gmail;

pub use auth::{GoogleAuth, GoogleToken, OAuthClient, SCOPES};
pub use calendar::CalendarClient;
pub use gmail::GmailClient;

use std::path::PathBuf;

/// Errors from Google API access or credential handling.
#[derive(Debug, thiserror::Error)]
pub enum GoogleApiError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Token expired or revoked")]
    AuthExpired,
    #[error("No token loaded; complete the authorization flow first")]
    NotAuthorized,
    #[error("Credentials not found at {0}")]
    CredentialsNotFound(PathBuf),
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),
    #[error("Token exchange failed: {0}")]
    ExchangeFailed(String),
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid credentials format: {0}")]
    InvalidCredentials(String),
}
