//! Configuration for GeminiAnalyzer.

use ingest_core::AnalyzerError;
use std::env;

/// Configuration for GeminiAnalyzer.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Generative Language API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Temperature for report generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Top-k sampling for report generation.
    pub top_k: Option<u32>,

    /// Top-p sampling for report generation.
    pub top_p: Option<f32>,

    /// Maximum tokens for report generation.
    pub max_output_tokens: Option<u32>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            model: "gemini-1.5-pro".to_string(),
            temperature: Some(0.7),
            top_k: Some(40),
            top_p: Some(0.95),
            max_output_tokens: Some(2048),
        }
    }
}

impl GeminiConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GEMINI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `GEMINI_API_URL` - API URL (default: https://generativelanguage.googleapis.com)
    /// - `GEMINI_MODEL` - Model name (default: gemini-1.5-pro)
    /// - `GEMINI_TEMPERATURE` - Report temperature (default: 0.7)
    /// - `GEMINI_MAX_OUTPUT_TOKENS` - Report token cap (default: 2048)
    pub fn from_env() -> Result<Self, AnalyzerError> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| AnalyzerError::Configuration("GEMINI_API_KEY not set".to_string()))?;

        let api_url = env::var("GEMINI_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-pro".to_string());

        let temperature = env::var("GEMINI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(0.7));

        let max_output_tokens = env::var("GEMINI_MAX_OUTPUT_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(2048));

        Ok(Self {
            api_url,
            api_key,
            model,
            temperature,
            top_k: Some(40),
            top_p: Some(0.95),
            max_output_tokens,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
    }
}

/// Builder for GeminiConfig.
#[derive(Debug, Default)]
pub struct GeminiConfigBuilder {
    config: GeminiConfig,
}

impl GeminiConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the report-generation temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the report-generation token cap.
    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.config.max_output_tokens = Some(tokens);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GeminiConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();

        assert_eq!(config.api_url, "https://generativelanguage.googleapis.com");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.top_k, Some(40));
        assert_eq!(config.top_p, Some(0.95));
        assert_eq!(config.max_output_tokens, Some(2048));
    }

    #[test]
    fn test_builder_all_options() {
        let config = GeminiConfig::builder()
            .api_key("my-key")
            .api_url("https://custom.api.com")
            .model("gemini-1.5-flash")
            .temperature(0.2)
            .max_output_tokens(512)
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.api_url, "https://custom.api.com");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.max_output_tokens, Some(512));
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_gemini_vars() {
            std::env::remove_var("GEMINI_API_KEY");
            std::env::remove_var("GEMINI_API_URL");
            std::env::remove_var("GEMINI_MODEL");
            std::env::remove_var("GEMINI_TEMPERATURE");
            std::env::remove_var("GEMINI_MAX_OUTPUT_TOKENS");
        }

        // Scenario 1: Missing API key should error
        clear_all_gemini_vars();
        let result = GeminiConfig::from_env();
        assert!(result.is_err());
        match result.unwrap_err() {
            AnalyzerError::Configuration(msg) => {
                assert!(msg.contains("GEMINI_API_KEY"));
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }

        // Scenario 2: Only API key set, defaults used
        clear_all_gemini_vars();
        std::env::set_var("GEMINI_API_KEY", "test-env-key");

        let config = GeminiConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-env-key");
        assert_eq!(config.api_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.model, "gemini-1.5-pro");

        // Scenario 3: All vars set
        clear_all_gemini_vars();
        std::env::set_var("GEMINI_API_KEY", "full-test-key");
        std::env::set_var("GEMINI_API_URL", "https://test.api.com");
        std::env::set_var("GEMINI_MODEL", "gemini-1.5-flash");
        std::env::set_var("GEMINI_TEMPERATURE", "0.9");
        std::env::set_var("GEMINI_MAX_OUTPUT_TOKENS", "1024");

        let config = GeminiConfig::from_env().unwrap();
        assert_eq!(config.api_key, "full-test-key");
        assert_eq!(config.api_url, "https://test.api.com");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.temperature, Some(0.9));
        assert_eq!(config.max_output_tokens, Some(1024));

        // Cleanup
        clear_all_gemini_vars();
    }
}
