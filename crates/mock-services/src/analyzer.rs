//! Analyzer doubles - canned, scripted, failing, and delayed.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use ingest_core::{
    async_trait, Analyzer, AnalyzerError, EmailAnalysis, EmailContent, Urgency,
};
use tokio::time::sleep;

/// An analyzer that returns the same result for every email and a fixed
/// report text, recording the contents it was asked to analyze.
#[derive(Debug)]
pub struct FixedAnalyzer {
    analysis: EmailAnalysis,
    report: String,
    analyzed: Mutex<Vec<EmailContent>>,
}

impl FixedAnalyzer {
    /// Create an analyzer returning the given classification.
    pub fn new(analysis: EmailAnalysis) -> Self {
        Self {
            analysis,
            report: "mock report".to_string(),
            analyzed: Mutex::new(Vec::new()),
        }
    }

    /// A low-urgency, no-meeting result.
    pub fn quiet() -> Self {
        Self::new(EmailAnalysis {
            meeting_request: false,
            date_time: None,
            urgency: Urgency::Low,
            follow_up_actions: Vec::new(),
        })
    }

    /// A meeting request at the given ISO date/time.
    pub fn meeting_at(date_time: impl Into<String>) -> Self {
        Self::new(EmailAnalysis {
            meeting_request: true,
            date_time: Some(date_time.into()),
            urgency: Urgency::High,
            follow_up_actions: vec!["confirm attendance".to_string()],
        })
    }

    /// Set the report text returned by `generate_report`.
    pub fn with_report(mut self, report: impl Into<String>) -> Self {
        self.report = report.into();
        self
    }

    /// Emails analyzed so far.
    pub fn analyzed(&self) -> Vec<EmailContent> {
        self.analyzed.lock().expect("analyzed lock poisoned").clone()
    }
}

#[async_trait]
impl Analyzer for FixedAnalyzer {
    async fn analyze_email(&self, email: &EmailContent) -> Result<EmailAnalysis, AnalyzerError> {
        self.analyzed
            .lock()
            .expect("analyzed lock poisoned")
            .push(email.clone());
        Ok(self.analysis.clone())
    }

    async fn generate_report(&self, _prompt: &str) -> Result<String, AnalyzerError> {
        Ok(self.report.clone())
    }

    fn name(&self) -> &str {
        "FixedAnalyzer"
    }
}

/// An analyzer that pops one scripted result per call, in order.
///
/// Panics if called more times than it has results; size the script to
/// the test.
#[derive(Debug, Default)]
pub struct ScriptedAnalyzer {
    results: Mutex<VecDeque<Result<EmailAnalysis, AnalyzerError>>>,
}

impl ScriptedAnalyzer {
    pub fn new(results: Vec<Result<EmailAnalysis, AnalyzerError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
        }
    }
}

#[async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn analyze_email(&self, _email: &EmailContent) -> Result<EmailAnalysis, AnalyzerError> {
        self.results
            .lock()
            .expect("results lock poisoned")
            .pop_front()
            .expect("ScriptedAnalyzer ran out of results")
    }

    async fn generate_report(&self, _prompt: &str) -> Result<String, AnalyzerError> {
        Ok("scripted report".to_string())
    }

    fn name(&self) -> &str {
        "ScriptedAnalyzer"
    }
}

/// An analyzer whose every call fails.
#[derive(Debug, Default)]
pub struct FailingAnalyzer;

impl FailingAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Analyzer for FailingAnalyzer {
    async fn analyze_email(&self, _email: &EmailContent) -> Result<EmailAnalysis, AnalyzerError> {
        Err(AnalyzerError::Api {
            status: 500,
            message: "mock analyzer failure".to_string(),
        })
    }

    async fn generate_report(&self, _prompt: &str) -> Result<String, AnalyzerError> {
        Err(AnalyzerError::Api {
            status: 500,
            message: "mock analyzer failure".to_string(),
        })
    }

    fn name(&self) -> &str {
        "FailingAnalyzer"
    }
}

/// An analyzer that wraps another analyzer and adds artificial delay.
///
/// Useful for testing timeout handling and simulating model latency.
pub struct DelayedAnalyzer<A: Analyzer> {
    inner: A,
    delay: Duration,
}

impl<A: Analyzer> DelayedAnalyzer<A> {
    /// Create a new DelayedAnalyzer wrapping the given analyzer.
    pub fn new(inner: A, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create an analyzer with a delay in milliseconds.
    pub fn with_millis(inner: A, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<A: Analyzer> Analyzer for DelayedAnalyzer<A> {
    async fn analyze_email(&self, email: &EmailContent) -> Result<EmailAnalysis, AnalyzerError> {
        sleep(self.delay).await;
        self.inner.analyze_email(email).await
    }

    async fn generate_report(&self, prompt: &str) -> Result<String, AnalyzerError> {
        sleep(self.delay).await;
        self.inner.generate_report(prompt).await
    }

    fn name(&self) -> &str {
        "DelayedAnalyzer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn content() -> EmailContent {
        EmailContent {
            sender: "alice@example.com".to_string(),
            subject: "Sync".to_string(),
            body: "meet?".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fixed_analyzer_records_contents() {
        let analyzer = FixedAnalyzer::meeting_at("2026-08-07T15:00:00+00:00");

        let analysis = analyzer.analyze_email(&content()).await.unwrap();
        assert!(analysis.meeting_request);
        assert_eq!(analyzer.analyzed().len(), 1);
        assert_eq!(analyzer.analyzed()[0].subject, "Sync");
    }

    #[tokio::test]
    async fn test_scripted_analyzer_pops_in_order() {
        let analyzer = ScriptedAnalyzer::new(vec![
            Ok(EmailAnalysis {
                meeting_request: false,
                date_time: None,
                urgency: Urgency::Medium,
                follow_up_actions: Vec::new(),
            }),
            Err(AnalyzerError::Api {
                status: 500,
                message: "second call fails".to_string(),
            }),
        ]);

        assert!(analyzer.analyze_email(&content()).await.is_ok());
        assert!(analyzer.analyze_email(&content()).await.is_err());
    }

    #[tokio::test]
    async fn test_delayed_analyzer() {
        let analyzer = DelayedAnalyzer::with_millis(FixedAnalyzer::quiet(), 50);

        let start = Instant::now();
        let report = analyzer.generate_report("anything").await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(report, "mock report");
        assert!(elapsed >= Duration::from_millis(50));
    }
}
