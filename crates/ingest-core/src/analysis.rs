//! Classification input and output types.

use serde::{Deserialize, Serialize};

/// The email fields handed to the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub sender: String,
    pub subject: String,
    pub body: String,
}

/// Urgency level assigned by classification.
///
/// Serialized in the provider's capitalized form (`"High"`, `"Medium"`,
/// `"Low"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    High,
    Medium,
    Low,
}

/// Structured classification result for a single email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAnalysis {
    /// Whether the email contains a meeting request.
    pub meeting_request: bool,
    /// Proposed meeting start in ISO 8601 form, when the classifier
    /// found one. Present does not imply parseable; callers decide.
    pub date_time: Option<String>,
    pub urgency: Urgency,
    /// Action items the classifier extracted.
    pub follow_up_actions: Vec<String>,
}
