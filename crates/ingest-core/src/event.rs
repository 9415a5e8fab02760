//! Calendar event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A request to put a meeting on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarInvite {
    /// Event title (the source email's subject).
    pub subject: String,
    /// Event start; the service applies its fixed duration and timezone.
    pub start: DateTime<Utc>,
}

/// A calendar event as created by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Provider-side event id.
    pub event_id: String,
    /// Conferencing link, when the provider attached one.
    pub meet_link: Option<String>,
}
