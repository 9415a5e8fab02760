//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// API server configuration.
///
/// Analyzer settings (API key, model) are read separately by
/// [`gemini_analyzer::GeminiConfig::from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Senders whose mail the pipeline ingests.
    pub allowed_senders: Vec<String>,
    /// Path to the OAuth client credentials file.
    pub credentials_path: PathBuf,
    /// Path to the persisted OAuth token file.
    pub token_path: PathBuf,
    /// Timezone applied to created calendar events.
    pub calendar_timezone: String,
    /// Wall-clock budget for report generation.
    pub report_timeout: Duration,
    /// Page cap for the mail list call.
    pub mail_page_size: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SERVER_ADDR` | Server bind address | `127.0.0.1:5000` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:opsdesk.db?mode=rwc` |
    /// | `ALLOWED_SENDERS` | Comma-separated sender allowlist | (required) |
    /// | `GOOGLE_CREDENTIALS_PATH` | OAuth client credentials file | `credentials.json` |
    /// | `GOOGLE_TOKEN_PATH` | Persisted OAuth token file | `token.json` |
    /// | `CALENDAR_TIMEZONE` | Timezone for created events | `Asia/Kolkata` |
    /// | `REPORT_TIMEOUT_SECS` | Report generation budget | `30` |
    /// | `MAIL_PAGE_SIZE` | Mail list page cap | `100` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("SERVER_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:opsdesk.db?mode=rwc".to_string());

        let allowed_senders = parse_sender_list(
            &env::var("ALLOWED_SENDERS").map_err(|_| ConfigError::MissingAllowedSenders)?,
        );
        if allowed_senders.is_empty() {
            return Err(ConfigError::MissingAllowedSenders);
        }

        let credentials_path = env::var("GOOGLE_CREDENTIALS_PATH")
            .unwrap_or_else(|_| "credentials.json".to_string())
            .into();

        let token_path = env::var("GOOGLE_TOKEN_PATH")
            .unwrap_or_else(|_| "token.json".to_string())
            .into();

        let calendar_timezone =
            env::var("CALENDAR_TIMEZONE").unwrap_or_else(|_| "Asia/Kolkata".to_string());

        let report_timeout_secs = env::var("REPORT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let mail_page_size = env::var("MAIL_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        Ok(Self {
            addr,
            database_url,
            allowed_senders,
            credentials_path,
            token_path,
            calendar_timezone,
            report_timeout: Duration::from_secs(report_timeout_secs),
            mail_page_size,
        })
    }
}

fn parse_sender_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid SERVER_ADDR format")]
    InvalidAddr,

    #[error("ALLOWED_SENDERS environment variable is required")]
    MissingAllowedSenders,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sender_list() {
        assert_eq!(
            parse_sender_list("a@x.com, b@y.com ,c@z.com"),
            vec!["a@x.com", "b@y.com", "c@z.com"]
        );
        assert_eq!(parse_sender_list("a@x.com"), vec!["a@x.com"]);
        assert!(parse_sender_list("").is_empty());
        assert!(parse_sender_list(" , ,").is_empty());
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_vars() {
            std::env::remove_var("SERVER_ADDR");
            std::env::remove_var("SQLITE_PATH");
            std::env::remove_var("ALLOWED_SENDERS");
            std::env::remove_var("GOOGLE_CREDENTIALS_PATH");
            std::env::remove_var("GOOGLE_TOKEN_PATH");
            std::env::remove_var("CALENDAR_TIMEZONE");
            std::env::remove_var("REPORT_TIMEOUT_SECS");
            std::env::remove_var("MAIL_PAGE_SIZE");
        }

        // Missing sender allowlist is an error
        clear_vars();
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingAllowedSenders)
        ));

        // Blank allowlist is also an error
        clear_vars();
        std::env::set_var("ALLOWED_SENDERS", " , ");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingAllowedSenders)
        ));

        // Defaults
        clear_vars();
        std::env::set_var("ALLOWED_SENDERS", "a@x.com,b@y.com");
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.database_url, "sqlite:opsdesk.db?mode=rwc");
        assert_eq!(config.allowed_senders.len(), 2);
        assert_eq!(config.calendar_timezone, "Asia/Kolkata");
        assert_eq!(config.report_timeout, Duration::from_secs(30));
        assert_eq!(config.mail_page_size, 100);

        // Overrides
        clear_vars();
        std::env::set_var("ALLOWED_SENDERS", "a@x.com");
        std::env::set_var("SERVER_ADDR", "0.0.0.0:8080");
        std::env::set_var("REPORT_TIMEOUT_SECS", "5");
        std::env::set_var("MAIL_PAGE_SIZE", "25");
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.report_timeout, Duration::from_secs(5));
        assert_eq!(config.mail_page_size, 25);

        // Bad address
        clear_vars();
        std::env::set_var("ALLOWED_SENDERS", "a@x.com");
        std::env::set_var("SERVER_ADDR", "not-an-addr");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidAddr)));

        clear_vars();
    }
}
