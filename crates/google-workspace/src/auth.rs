//! OAuth2 credential and token handling.
//!
//! Client credentials come from a local `credentials.json` (web or
//! installed app). The token lives in a local `token.json`, is loaded at
//! process start, refreshed with the refresh token when expired, and
//! renewed interactively through an authorization-code exchange driven by
//! the server's callback endpoint.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::GoogleApiError;

/// OAuth2 scopes used by Opsdesk: read mail, create calendar events.
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/calendar.events",
];

/// Access token considered expired this many seconds before its stated
/// expiry, to absorb clock skew and request latency.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// OAuth2 token payload persisted to the token file.
///
/// `access_token` is accepted under the alias `token` on read, for
/// compatibility with tokens written by Google's client libraries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleToken {
    #[serde(alias = "token")]
    pub access_token: String,
    /// Long-lived token used to mint new access tokens.
    pub refresh_token: Option<String>,
    /// Access token expiry (RFC 3339).
    #[serde(default)]
    pub expiry: Option<String>,
    /// Authorized scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl GoogleToken {
    /// Whether the access token is at (or within a minute of) expiry.
    ///
    /// A token without an expiry is treated as expired so a refresh is
    /// attempted before first use.
    pub fn is_expired(&self) -> bool {
        match &self.expiry {
            None => true,
            Some(expiry_str) => match chrono::DateTime::parse_from_rfc3339(expiry_str) {
                Ok(expiry) => {
                    let now = chrono::Utc::now();
                    expiry <= now + chrono::Duration::seconds(EXPIRY_MARGIN_SECS)
                }
                Err(_) => true,
            },
        }
    }
}

/// OAuth2 client registration from `credentials.json`.
///
/// Google writes web-application credentials under a `web` key and
/// desktop-application credentials under `installed`; both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientCredentials {
    #[serde(alias = "installed")]
    pub web: OAuthClient,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Token endpoint response for both exchange and refresh.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    scope: Option<String>,
}

/// Shared OAuth2 state: client registration, token file path, and the
/// in-memory token. Wrapped in an `Arc` and shared by every API client.
pub struct GoogleAuth {
    client: reqwest::Client,
    oauth: OAuthClient,
    token_path: PathBuf,
    token: RwLock<Option<GoogleToken>>,
}

impl GoogleAuth {
    /// Load client credentials (required) and any persisted token.
    pub fn load(
        credentials_path: impl AsRef<Path>,
        token_path: impl AsRef<Path>,
    ) -> Result<Self, GoogleApiError> {
        let credentials_path = credentials_path.as_ref();
        if !credentials_path.exists() {
            return Err(GoogleApiError::CredentialsNotFound(
                credentials_path.to_path_buf(),
            ));
        }

        let content = std::fs::read_to_string(credentials_path)?;
        let credentials: ClientCredentials = serde_json::from_str(&content).map_err(|e| {
            GoogleApiError::InvalidCredentials(format!("{}: {}", credentials_path.display(), e))
        })?;

        let token_path = token_path.as_ref().to_path_buf();
        let token = match std::fs::read_to_string(&token_path) {
            Ok(content) => match serde_json::from_str::<GoogleToken>(&content) {
                Ok(token) => {
                    info!("Loaded Google token from {}", token_path.display());
                    Some(token)
                }
                Err(e) => {
                    warn!(
                        "Ignoring unreadable token file {}: {}",
                        token_path.display(),
                        e
                    );
                    None
                }
            },
            Err(_) => None,
        };

        Ok(Self {
            client: reqwest::Client::new(),
            oauth: credentials.web,
            token_path,
            token: RwLock::new(token),
        })
    }

    /// Whether a token is currently loaded.
    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// The URL a user must visit to grant consent.
    pub fn consent_url(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.oauth.client_id)
            .append_pair("redirect_uri", self.redirect_uri())
            .append_pair("response_type", "code")
            .append_pair("scope", &SCOPES.join(" "))
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .finish();

        format!("{}?{}", self.oauth.auth_uri, query)
    }

    fn redirect_uri(&self) -> &str {
        self.oauth
            .redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or("http://localhost:5000/oauth2callback")
    }

    /// Exchange an authorization code for tokens, persisting the result.
    pub async fn exchange_code(&self, code: &str) -> Result<(), GoogleApiError> {
        let response = self
            .client
            .post(&self.oauth.token_uri)
            .form(&[
                ("code", code),
                ("client_id", self.oauth.client_id.as_str()),
                ("client_secret", self.oauth.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(GoogleApiError::ExchangeFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)?;
        let token = self.store(parsed, None).await?;

        info!(
            scopes = ?token.scopes,
            "Google authorization complete; token saved to {}",
            self.token_path.display()
        );

        Ok(())
    }

    /// A currently valid access token, refreshing first when expired.
    pub async fn access_token(&self) -> Result<String, GoogleApiError> {
        {
            let guard = self.token.read().await;
            match guard.as_ref() {
                None => return Err(GoogleApiError::NotAuthorized),
                Some(token) if !token.is_expired() => return Ok(token.access_token.clone()),
                Some(_) => {}
            }
        }

        self.refresh().await
    }

    /// Refresh the access token using the stored refresh token.
    async fn refresh(&self) -> Result<String, GoogleApiError> {
        let refresh_token = {
            let guard = self.token.read().await;
            guard
                .as_ref()
                .ok_or(GoogleApiError::NotAuthorized)?
                .refresh_token
                .clone()
                .ok_or(GoogleApiError::AuthExpired)?
        };

        let response = self
            .client
            .post(&self.oauth.token_uri)
            .form(&[
                ("client_id", self.oauth.client_id.as_str()),
                ("client_secret", self.oauth.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            if body.contains("invalid_grant") {
                return Err(GoogleApiError::AuthExpired);
            }
            return Err(GoogleApiError::RefreshFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)?;
        let token = self.store(parsed, Some(refresh_token)).await?;

        info!("Refreshed Google access token");

        Ok(token.access_token)
    }

    /// Build a token from a token-endpoint response, persist it, and put
    /// it in memory. `prior_refresh_token` is kept when the response
    /// carries no new refresh token (refresh responses usually don't).
    async fn store(
        &self,
        response: TokenResponse,
        prior_refresh_token: Option<String>,
    ) -> Result<GoogleToken, GoogleApiError> {
        let expiry = response
            .expires_in
            .map(|secs| (chrono::Utc::now() + chrono::Duration::seconds(secs)).to_rfc3339());

        let token = GoogleToken {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(prior_refresh_token),
            expiry,
            scopes: response
                .scope
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_else(|| SCOPES.iter().map(|s| s.to_string()).collect()),
        };

        std::fs::write(&self.token_path, serde_json::to_string_pretty(&token)?)?;

        *self.token.write().await = Some(token.clone());

        Ok(token)
    }
}
