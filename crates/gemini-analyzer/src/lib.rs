//! Gemini-backed [`Analyzer`] implementation.
//!
//! Classification requests are schema-constrained: the model is configured
//! with a JSON `responseSchema` so its output parses directly into
//! [`ingest_core::EmailAnalysis`]. Report generation is a free-form text
//! call against the same API.
//!
//! [`Analyzer`]: ingest_core::Analyzer

mod analyzer;
mod api_types;
mod config;

pub use analyzer::GeminiAnalyzer;
pub use config::{GeminiConfig, GeminiConfigBuilder};
