//! Failure reporting and aggregate health verdicts.

use chrono::Utc;
use domain_extraction::{subjects, ExtractError, FailureEvent, Severity};
use messaging::Publisher;
use std::fmt;
use std::sync::Arc;
use tracing::{error, warn};

/// Publishes classified failure events.
///
/// `report_failure` never returns an error: a failure to publish the
/// failure event is logged and swallowed so one broken publish path cannot
/// cascade into a failure loop.
pub struct FailureReporter<P: Publisher> {
    publisher: Arc<P>,
    source_name: String,
}

impl<P: Publisher> FailureReporter<P> {
    pub fn new(publisher: Arc<P>, source_name: impl Into<String>) -> Self {
        Self {
            publisher,
            source_name: source_name.into(),
        }
    }

    /// Publish a terminal `FailureEvent` for the job.
    pub async fn report_failure(
        &self,
        job_id: &str,
        error: &ExtractError,
        stage: &str,
        retry_attempt: u32,
    ) {
        let severity = severity_for(error);

        let event = FailureEvent {
            job_id: job_id.to_string(),
            error_message: error.to_string(),
            error_name: error.error_name().to_string(),
            stage: stage.to_string(),
            retry_attempt,
            severity,
            timestamp: Utc::now(),
        };

        let message_id = format!("{}-failed-{}", job_id, retry_attempt);
        let headers = [
            ("job-id", job_id.to_string()),
            ("severity", severity.to_string()),
            ("source-service", self.source_name.clone()),
        ];

        match self
            .publisher
            .publish(subjects::JD_FAILED, &message_id, &headers, &event)
            .await
        {
            Ok(_) => {
                warn!(
                    job_id = %job_id,
                    error_name = %event.error_name,
                    stage = %stage,
                    retry_attempt = retry_attempt,
                    severity = %severity,
                    "Failure event published"
                );
            }
            Err(e) => {
                error!(
                    job_id = %job_id,
                    error = %e,
                    original_error = %event.error_message,
                    "Failed to publish failure event, swallowing"
                );
            }
        }
    }
}

/// Severity classification: connection-level failures are critical,
/// validation/parse failures high, extraction-quality and delivery issues
/// medium, everything else low.
pub fn severity_for(error: &ExtractError) -> Severity {
    match error {
        ExtractError::Network(_) | ExtractError::CircuitOpen => Severity::Critical,
        ExtractError::Validation(_) => Severity::High,
        ExtractError::Timeout(_) | ExtractError::Unavailable(_) => Severity::Medium,
        ExtractError::Publish(message) => {
            if message.to_lowercase().contains("connection") {
                Severity::Critical
            } else {
                Severity::Medium
            }
        }
        ExtractError::RateLimited(_) => Severity::Low,
    }
}

/// Aggregate health verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthVerdict {
    Healthy,
    Degraded,
    Unhealthy,
}

impl fmt::Display for HealthVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthVerdict::Healthy => write!(f, "healthy"),
            HealthVerdict::Degraded => write!(f, "degraded"),
            HealthVerdict::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Combine transport connectivity, model availability, and the in-flight
/// load into a single verdict.
pub fn health_status(
    transport_connected: bool,
    model_available: bool,
    in_flight: usize,
    max_in_flight: usize,
) -> HealthVerdict {
    if !transport_connected {
        HealthVerdict::Unhealthy
    } else if !model_available || in_flight >= max_in_flight {
        HealthVerdict::Degraded
    } else {
        HealthVerdict::Healthy
    }
}
