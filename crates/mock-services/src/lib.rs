//! Mock service implementations for the ingestion pipeline.
//!
//! This crate provides test doubles for the three external seams:
//! - `StaticMailService` - serves a fixed set of messages
//! - `RecordingCalendarService` / `FailingCalendarService` - capture or
//!   reject event creation
//! - `FixedAnalyzer` / `ScriptedAnalyzer` / `FailingAnalyzer` - canned
//!   classification results
//! - `DelayedAnalyzer` - wraps another analyzer with artificial delay,
//!   for timeout handling tests
//!
//! For production use the `google-workspace` and `gemini-analyzer` crates
//! instead.

mod analyzer;
mod calendar;
mod mail;

pub use analyzer::{DelayedAnalyzer, FailingAnalyzer, FixedAnalyzer, ScriptedAnalyzer};
pub use calendar::{FailingCalendarService, RecordingCalendarService};
pub use mail::StaticMailService;
