//! GeminiAnalyzer implementation using the Generative Language API.

use ingest_core::{
    async_trait, Analyzer, AnalyzerError, EmailAnalysis, EmailContent, Urgency,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::api_types::{
    ApiError, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use crate::config::GeminiConfig;

/// An analyzer implementation that uses the Gemini API.
///
/// Stateless: each call is a single request with no retry.
#[derive(Debug, Clone)]
pub struct GeminiAnalyzer {
    client: Client,
    config: GeminiConfig,
}

/// Classification result as the model emits it, before conversion into
/// the core type.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    meeting_request: bool,
    #[serde(default)]
    date_time: Option<String>,
    urgency_level: Urgency,
    #[serde(default)]
    required_follow_up_actions: Vec<String>,
}

impl From<RawAnalysis> for EmailAnalysis {
    fn from(raw: RawAnalysis) -> Self {
        EmailAnalysis {
            meeting_request: raw.meeting_request,
            date_time: raw.date_time,
            urgency: raw.urgency_level,
            follow_up_actions: raw.required_follow_up_actions,
        }
    }
}

impl GeminiAnalyzer {
    /// Create a new GeminiAnalyzer with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, AnalyzerError> {
        let client = Client::builder().build().map_err(|e| {
            AnalyzerError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!("GeminiAnalyzer initialized with model: {}", config.model);

        Ok(Self { client, config })
    }

    /// Create a GeminiAnalyzer from environment variables.
    ///
    /// See [`GeminiConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, AnalyzerError> {
        let config = GeminiConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// JSON schema the classification response must conform to.
    ///
    /// A single object: each call classifies exactly one email.
    fn analysis_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "meetingRequest": {
                    "type": "BOOLEAN",
                    "description": "Whether the email contains a meeting request"
                },
                "dateTime": {
                    "type": "STRING",
                    "description": "Proposed meeting date and time in ISO format, if any",
                    "nullable": true
                },
                "urgencyLevel": {
                    "type": "STRING",
                    "description": "High, Medium, or Low urgency level",
                    "enum": ["High", "Medium", "Low"]
                },
                "requiredFollowUpActions": {
                    "type": "ARRAY",
                    "items": {
                        "type": "STRING",
                        "description": "Action items that need to be completed"
                    }
                }
            },
            "required": ["meetingRequest", "urgencyLevel", "requiredFollowUpActions"]
        })
    }

    /// Build the classification prompt for an email.
    fn analysis_prompt(email: &EmailContent) -> String {
        format!(
            "Analyze this email and extract key information:\n\
             From: {}\n\
             Subject: {}\n\
             Content: {}\n\n\
             Provide a structured analysis including meeting requests, urgency level, \
             and required follow-up actions.",
            email.sender, email.subject, email.body
        )
    }

    /// Make a generateContent request and return the first candidate's text.
    async fn generate(&self, request: GenerateContentRequest) -> Result<String, AnalyzerError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url, self.config.model
        );

        debug!(model = %self.config.model, "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalyzerError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try to parse as API error
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(AnalyzerError::Api {
                    status: status.as_u16(),
                    message: api_error.error.message,
                });
            }

            return Err(AnalyzerError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let completion: GenerateContentResponse = response.json().await.map_err(|e| {
            AnalyzerError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        completion
            .first_text()
            .ok_or_else(|| AnalyzerError::InvalidResponse("No candidates in response".to_string()))
    }
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze_email(&self, email: &EmailContent) -> Result<EmailAnalysis, AnalyzerError> {
        debug!(sender = %email.sender, subject = %email.subject, "Analyzing email");

        let request = GenerateContentRequest {
            contents: vec![Content::user(Self::analysis_prompt(email))],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(Self::analysis_schema()),
                ..Default::default()
            }),
        };

        let text = self.generate(request).await?;

        let raw: RawAnalysis = serde_json::from_str(&text).map_err(|e| {
            AnalyzerError::InvalidResponse(format!("Analysis did not match schema: {}", e))
        })?;

        debug!(
            meeting_request = raw.meeting_request,
            urgency = ?raw.urgency_level,
            "Gemini analysis result"
        );

        Ok(raw.into())
    }

    async fn generate_report(&self, prompt: &str) -> Result<String, AnalyzerError> {
        debug!("Generating report for prompt ({} chars)", prompt.len());

        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            generation_config: Some(GenerationConfig {
                temperature: self.config.temperature,
                top_k: self.config.top_k,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_output_tokens,
                ..Default::default()
            }),
        };

        let text = self.generate(request).await?;

        if text.trim().is_empty() {
            return Err(AnalyzerError::InvalidResponse(
                "Empty response from model".to_string(),
            ));
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "GeminiAnalyzer"
    }
}
