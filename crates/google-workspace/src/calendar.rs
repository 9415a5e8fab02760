//! Google Calendar API v3 — event creation with auto-generated conferencing.

use std::sync::Arc;

use chrono::Duration;
use ingest_core::{async_trait, CalendarError, CalendarInvite, CalendarService, ScheduledEvent};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::auth::GoogleAuth;
use crate::GoogleApiError;

const CALENDAR_EVENTS_URL: &str =
    "https://www.googleapis.com/calendar/v3/calendars/primary/events";

/// Fixed event length: every detected meeting is booked for one hour.
const EVENT_DURATION_HOURS: i64 = 1;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedEventResponse {
    id: String,
    #[serde(default)]
    hangout_link: Option<String>,
}

/// Calendar client sharing the process-wide [`GoogleAuth`] credential.
#[derive(Clone)]
pub struct CalendarClient {
    client: reqwest::Client,
    auth: Arc<GoogleAuth>,
    timezone: String,
}

impl CalendarClient {
    pub fn new(auth: Arc<GoogleAuth>, timezone: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth,
            timezone: timezone.into(),
        }
    }

    /// Event payload: one hour long, fixed timezone, with a Meet
    /// conference attached.
    fn event_body(invite: &CalendarInvite, timezone: &str, request_id: &str) -> serde_json::Value {
        let end = invite.start + Duration::hours(EVENT_DURATION_HOURS);

        serde_json::json!({
            "summary": invite.subject,
            "start": {
                "dateTime": invite.start.to_rfc3339(),
                "timeZone": timezone,
            },
            "end": {
                "dateTime": end.to_rfc3339(),
                "timeZone": timezone,
            },
            "conferenceData": {
                "createRequest": {
                    "requestId": request_id,
                    "conferenceSolutionKey": { "type": "hangoutsMeet" },
                },
            },
        })
    }

    /// Create the event on the primary calendar.
    pub async fn insert_event(
        &self,
        invite: &CalendarInvite,
    ) -> Result<ScheduledEvent, GoogleApiError> {
        let access_token = self.auth.access_token().await?;
        let request_id = format!("meet-{}", Uuid::new_v4());
        let body = Self::event_body(invite, &self.timezone, &request_id);

        debug!(subject = %invite.subject, start = %invite.start, "Creating calendar event");

        let response = self
            .client
            .post(CALENDAR_EVENTS_URL)
            .bearer_auth(access_token)
            .query(&[("conferenceDataVersion", "1")])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GoogleApiError::AuthExpired);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleApiError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let created: CreatedEventResponse = response.json().await?;

        Ok(ScheduledEvent {
            event_id: created.id,
            meet_link: created.hangout_link,
        })
    }
}

fn map_error(err: GoogleApiError) -> CalendarError {
    match err {
        GoogleApiError::AuthExpired | GoogleApiError::NotAuthorized => {
            CalendarError::Authentication(err.to_string())
        }
        GoogleApiError::RefreshFailed(msg) => CalendarError::Authentication(msg),
        GoogleApiError::ApiError { status, message } => CalendarError::Api { status, message },
        GoogleApiError::Http(e) => CalendarError::Network(e.to_string()),
        other => CalendarError::Parse(other.to_string()),
    }
}

#[async_trait]
impl CalendarService for CalendarClient {
    async fn create_event(&self, invite: &CalendarInvite) -> Result<ScheduledEvent, CalendarError> {
        self.insert_event(invite).await.map_err(map_error)
    }
}
