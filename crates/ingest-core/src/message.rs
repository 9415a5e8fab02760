//! Mail message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message reference returned by a list query, before the full
/// message has been fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStub {
    /// Provider-side message id.
    pub id: String,
}

/// A fully fetched mail message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    /// Provider-side message id.
    pub id: String,
    /// Sender, as reported in the From header.
    pub sender: String,
    /// Subject line; `None` when the header is absent.
    pub subject: Option<String>,
    /// Provider-reported receive time.
    pub received_at: DateTime<Utc>,
    /// Short body snippet.
    pub snippet: String,
}
