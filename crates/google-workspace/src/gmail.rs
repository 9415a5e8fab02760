//! Gmail API v1 — credential check, message listing, message fetch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ingest_core::{async_trait, MailError, MailMessage, MailService, MessageStub};
use serde::Deserialize;
use tracing::debug;

use crate::auth::GoogleAuth;
use crate::GoogleApiError;

const GMAIL_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

// ============================================================================
// API response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    #[serde(default)]
    email_address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageListResponse {
    #[serde(default)]
    messages: Vec<ListedMessage>,
}

#[derive(Debug, Deserialize)]
struct ListedMessage {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageDetail {
    #[serde(default)]
    id: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    internal_date: Option<String>,
    #[serde(default)]
    payload: Option<MessagePayload>,
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    headers: Vec<Header>,
}

#[derive(Debug, Deserialize)]
struct Header {
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: String,
}

impl MessageDetail {
    fn header(&self, name: &str) -> Option<String> {
        self.payload.as_ref().and_then(|p| {
            p.headers
                .iter()
                .find(|h| h.name.eq_ignore_ascii_case(name))
                .map(|h| h.value.clone())
        })
    }

    /// Gmail reports receipt time as epoch milliseconds in `internalDate`.
    fn received_at(&self) -> DateTime<Utc> {
        self.internal_date
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or_else(Utc::now)
    }
}

// ============================================================================
// Client
// ============================================================================

/// Gmail client sharing the process-wide [`GoogleAuth`] credential.
#[derive(Clone)]
pub struct GmailClient {
    client: reqwest::Client,
    auth: Arc<GoogleAuth>,
}

impl GmailClient {
    pub fn new(auth: Arc<GoogleAuth>) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, GoogleApiError> {
        let access_token = self.auth.access_token().await?;

        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .query(query)
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

        Ok(response.json().await?)
    }

    /// Fetch the authenticated mailbox's profile. Used as the credential
    /// check before a pipeline run.
    pub async fn profile(&self) -> Result<String, GoogleApiError> {
        let profile: ProfileResponse = self
            .get_json(&format!("{}/users/me/profile", GMAIL_BASE), &[])
            .await?;
        Ok(profile.email_address)
    }

    /// List message ids matching a Gmail query string.
    pub async fn list(&self, query: &str, max_results: u32) -> Result<Vec<String>, GoogleApiError> {
        debug!(query, max_results, "Listing Gmail messages");

        let list: MessageListResponse = self
            .get_json(
                &format!("{}/users/me/messages", GMAIL_BASE),
                &[("q", query), ("maxResults", &max_results.to_string())],
            )
            .await?;

        Ok(list.messages.into_iter().map(|m| m.id).collect())
    }

    /// Fetch a full message and extract the fields the pipeline stores.
    pub async fn get(&self, id: &str) -> Result<MailMessage, GoogleApiError> {
        let detail: MessageDetail = self
            .get_json(
                &format!("{}/users/me/messages/{}", GMAIL_BASE, id),
                &[("format", "full")],
            )
            .await?;

        Ok(MailMessage {
            id: if detail.id.is_empty() {
                id.to_string()
            } else {
                detail.id.clone()
            },
            sender: detail.header("From").unwrap_or_default(),
            subject: detail.header("Subject"),
            received_at: detail.received_at(),
            snippet: detail.snippet,
        })
    }
}

fn map_error(err: GoogleApiError) -> MailError {
    match err {
        GoogleApiError::AuthExpired | GoogleApiError::NotAuthorized => {
            MailError::Authentication(err.to_string())
        }
        GoogleApiError::RefreshFailed(msg) => MailError::Authentication(msg),
        GoogleApiError::ApiError { status: 401, message } | GoogleApiError::ApiError { status: 403, message } => {
            MailError::Authentication(message)
        }
        GoogleApiError::ApiError { status, message } => MailError::Api { status, message },
        GoogleApiError::Http(e) => MailError::Network(e.to_string()),
        other => MailError::Parse(other.to_string()),
    }
}

#[async_trait]
impl MailService for GmailClient {
    async fn verify_credentials(&self) -> Result<(), MailError> {
        let email = self.profile().await.map_err(map_error)?;
        debug!(mailbox = %email, "Gmail authentication is valid");
        Ok(())
    }

    async fn list_messages(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<MessageStub>, MailError> {
        let ids = self.list(query, max_results).await.map_err(map_error)?;
        Ok(ids.into_iter().map(|id| MessageStub { id }).collect())
    }

    async fn fetch_message(&self, id: &str) -> Result<MailMessage, MailError> {
        self.get(id).await.map_err(map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_list_deserialization() {
        let json = r#"{
            "messages": [
                {"id": "msg1", "threadId": "thread1"},
                {"id": "msg2", "threadId": "thread2"}
            ],
            "resultSizeEstimate": 2
        }"#;

        let resp: MessageListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.messages.len(), 2);
        assert_eq!(resp.messages[0].id, "msg1");
    }

    #[test]
    fn test_message_list_empty() {
        let json = r#"{"resultSizeEstimate": 0}"#;
        let resp: MessageListResponse = serde_json::from_str(json).unwrap();
        assert!(resp.messages.is_empty());
    }

    #[test]
    fn test_message_detail_extraction() {
        let json = r#"{
            "id": "msg123",
            "threadId": "thread456",
            "snippet": "Can we meet Thursday?",
            "internalDate": "1754464800000",
            "payload": {
                "headers": [
                    {"name": "From", "value": "Jane Doe <jane@customer.com>"},
                    {"name": "Subject", "value": "Re: Project Update"},
                    {"name": "Date", "value": "Wed, 6 Aug 2026 09:00:00 +0000"}
                ]
            }
        }"#;

        let detail: MessageDetail = serde_json::from_str(json).unwrap();
        assert_eq!(
            detail.header("from").as_deref(),
            Some("Jane Doe <jane@customer.com>")
        );
        assert_eq!(detail.header("Subject").as_deref(), Some("Re: Project Update"));
        assert!(detail.header("X-Missing").is_none());

        let received = detail.received_at();
        assert_eq!(received.timestamp_millis(), 1_754_464_800_000);
    }

    #[test]
    fn test_message_detail_no_payload() {
        let json = r#"{"id": "msg789", "snippet": ""}"#;
        let detail: MessageDetail = serde_json::from_str(json).unwrap();
        assert!(detail.payload.is_none());
        assert!(detail.header("From").is_none());
    }

    #[test]
    fn test_auth_errors_map_to_authentication() {
        assert!(matches!(
            map_error(GoogleApiError::AuthExpired),
            MailError::Authentication(_)
        ));
        assert!(matches!(
            map_error(GoogleApiError::NotAuthorized),
            MailError::Authentication(_)
        ));
        assert!(matches!(
            map_error(GoogleApiError::ApiError {
                status: 403,
                message: "forbidden".to_string()
            }),
            MailError::Authentication(_)
        ));
        assert!(matches!(
            map_error(GoogleApiError::ApiError {
                status: 500,
                message: "boom".to_string()
            }),
            MailError::Api { status: 500, .. }
        ));
    }
}
