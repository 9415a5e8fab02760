//! Email-ingestion pipeline for Opsdesk.
//!
//! The pipeline pulls unseen mail from an allow-listed set of senders,
//! classifies each message, and materializes meeting records for detected
//! meeting requests. See [`IngestPipeline`] for the step-by-step contract.

mod error;
mod pipeline;

pub use error::IngestError;
pub use pipeline::{IngestConfig, IngestPipeline, IngestSummary};
