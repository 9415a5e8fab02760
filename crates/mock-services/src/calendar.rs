//! Calendar service doubles - record or reject event creation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ingest_core::{async_trait, CalendarError, CalendarInvite, CalendarService, ScheduledEvent};

/// A calendar service that accepts every invite, handing out sequential
/// event ids and recording what it was asked to create.
#[derive(Debug, Default)]
pub struct RecordingCalendarService {
    invites: Mutex<Vec<CalendarInvite>>,
    counter: AtomicUsize,
}

impl RecordingCalendarService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invites received so far.
    pub fn invites(&self) -> Vec<CalendarInvite> {
        self.invites.lock().expect("invites lock poisoned").clone()
    }
}

#[async_trait]
impl CalendarService for RecordingCalendarService {
    async fn create_event(&self, invite: &CalendarInvite) -> Result<ScheduledEvent, CalendarError> {
        self.invites
            .lock()
            .expect("invites lock poisoned")
            .push(invite.clone());

        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ScheduledEvent {
            event_id: format!("evt-{}", n),
            meet_link: Some(format!("https://meet.example.com/mock-{}", n)),
        })
    }
}

/// A calendar service that rejects every invite.
#[derive(Debug, Default)]
pub struct FailingCalendarService;

impl FailingCalendarService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CalendarService for FailingCalendarService {
    async fn create_event(
        &self,
        _invite: &CalendarInvite,
    ) -> Result<ScheduledEvent, CalendarError> {
        Err(CalendarError::Api {
            status: 500,
            message: "mock calendar rejection".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_recording_calendar_sequences_ids() {
        let calendar = RecordingCalendarService::new();
        let invite = CalendarInvite {
            subject: "Sync".to_string(),
            start: Utc::now(),
        };

        let first = calendar.create_event(&invite).await.unwrap();
        let second = calendar.create_event(&invite).await.unwrap();

        assert_eq!(first.event_id, "evt-1");
        assert_eq!(second.event_id, "evt-2");
        assert_eq!(calendar.invites().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_calendar() {
        let calendar = FailingCalendarService::new();
        let invite = CalendarInvite {
            subject: "Sync".to_string(),
            start: Utc::now(),
        };

        assert!(calendar.create_event(&invite).await.is_err());
    }
}
