//! Bus contract: event payloads and subjects.
//!
//! Wire names are camelCase because the upstream producers and downstream
//! consumers are JavaScript services.

use crate::result::ExtractionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subjects this worker consumes and publishes.
pub mod subjects {
    /// Consumed: a job description was submitted for extraction.
    pub const JD_SUBMITTED: &str = "job.jd.submitted";

    /// Published on success.
    pub const JD_EXTRACTED: &str = "analysis.jd.extracted";

    /// Published on terminal failure.
    pub const JD_FAILED: &str = "job.jd.failed";

    /// Published (observability) when processing begins.
    pub const JD_STARTED: &str = "job.jd.started";
}

/// A job description submitted for extraction. Immutable; logically
/// consumed once (duplicates are suppressed by the bus dedup window and the
/// orchestrator's in-flight map).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionEvent {
    pub job_id: String,
    pub job_title: String,
    pub raw_text: String,
    pub submitted_at: DateTime<Utc>,
}

/// Published exactly once per successfully processed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedEvent {
    pub job_id: String,
    pub extracted_data: ExtractionResult,
    pub processing_time_ms: u64,
    pub confidence: f64,
    pub extraction_method: String,
    pub timestamp: DateTime<Utc>,
}

/// Published when a job cannot be completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureEvent {
    pub job_id: String,
    pub error_message: String,
    pub error_name: String,
    pub stage: String,
    pub retry_attempt: u32,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
}

/// Published when processing begins (best-effort observability).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedEvent {
    pub job_id: String,
    pub input_size: usize,
    pub expected_processing_time_ms: u64,
}

/// Failure severity for operational triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}
