//! Job-description extraction domain.
//!
//! This library provides:
//!
//! - **Events**: the bus contract for job submissions, extraction results,
//!   and classified failures
//! - **Sanitization**: whitespace/markup cleanup and length bounds for raw
//!   job-description text
//! - **Model client**: HTTP client for the external text-extraction model
//! - **Fallback extractor**: deterministic keyword/regex extraction used
//!   when the model under-delivers
//! - **Adapter**: orchestrates sanitize → model → fallback behind a shared
//!   circuit breaker

mod adapter;
mod client;
mod error;
mod events;
mod fallback;
mod result;
mod sanitize;

pub use adapter::{Extraction, ExtractionAdapter, ExtractionMethod};
pub use client::{HttpModelClient, ModelClient, ModelError, ModelResponse};
pub use error::{is_retryable_message, ExtractError};
pub use events::{
    subjects, ExtractedEvent, FailureEvent, Severity, StartedEvent, SubmissionEvent,
};
pub use fallback::RuleBasedExtractor;
pub use result::{CompanyInfo, ExtractionResult};
pub use sanitize::{sanitize_text, MAX_TEXT_LEN, MIN_TEXT_LEN};
