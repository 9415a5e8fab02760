//! Static mail service - serves a fixed set of messages.

use std::sync::Mutex;

use ingest_core::{async_trait, MailError, MailMessage, MailService, MessageStub};

/// A mail service backed by a fixed message list.
///
/// `list_messages` returns the messages in insertion order (capped at
/// `max_results`) and records each query string for assertions.
#[derive(Debug, Default)]
pub struct StaticMailService {
    messages: Vec<MailMessage>,
    fail_auth: bool,
    queries: Mutex<Vec<String>>,
}

impl StaticMailService {
    /// Create a service serving the given messages.
    pub fn new(messages: Vec<MailMessage>) -> Self {
        Self {
            messages,
            fail_auth: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Create an empty service.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Create a service whose credential check always fails.
    pub fn with_auth_failure() -> Self {
        Self {
            messages: Vec::new(),
            fail_auth: true,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("queries lock poisoned").clone()
    }
}

#[async_trait]
impl MailService for StaticMailService {
    async fn verify_credentials(&self) -> Result<(), MailError> {
        if self.fail_auth {
            return Err(MailError::Authentication(
                "mock credential rejected".to_string(),
            ));
        }
        Ok(())
    }

    async fn list_messages(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<MessageStub>, MailError> {
        self.queries
            .lock()
            .expect("queries lock poisoned")
            .push(query.to_string());

        Ok(self
            .messages
            .iter()
            .take(max_results as usize)
            .map(|m| MessageStub { id: m.id.clone() })
            .collect())
    }

    async fn fetch_message(&self, id: &str) -> Result<MailMessage, MailError> {
        self.messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| MailError::Api {
                status: 404,
                message: format!("no such message: {}", id),
            })
    }
}
