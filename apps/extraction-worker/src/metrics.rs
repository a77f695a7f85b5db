//! Prometheus metrics for the extraction worker.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Metrics for the extraction worker.
#[derive(Clone)]
pub struct WorkerMetrics {
    subject: String,
}

impl WorkerMetrics {
    /// Create new metrics for the given consumed subject.
    pub fn new(subject: &str) -> Self {
        Self {
            subject: subject.to_string(),
        }
    }

    /// Record a submission received from the bus.
    pub fn job_received(&self) {
        counter!(
            "jd_worker_jobs_received_total",
            "subject" => self.subject.clone()
        )
        .increment(1);
    }

    /// Record a duplicate submission discarded by admission.
    pub fn duplicate_discarded(&self) {
        counter!(
            "jd_worker_duplicates_discarded_total",
            "subject" => self.subject.clone()
        )
        .increment(1);
    }

    /// Record a submission requeued because the in-flight ceiling was hit.
    pub fn backpressure_requeued(&self) {
        counter!(
            "jd_worker_backpressure_requeued_total",
            "subject" => self.subject.clone()
        )
        .increment(1);
    }

    /// Record a successful extraction.
    pub fn job_extracted(&self, duration: Duration, method: &str) {
        counter!(
            "jd_worker_jobs_extracted_total",
            "subject" => self.subject.clone(),
            "method" => method.to_string()
        )
        .increment(1);

        histogram!(
            "jd_worker_processing_duration_seconds",
            "subject" => self.subject.clone()
        )
        .record(duration.as_secs_f64());
    }

    /// Record a terminal failure.
    pub fn job_failed(&self, error_name: &str) {
        counter!(
            "jd_worker_jobs_failed_total",
            "subject" => self.subject.clone(),
            "error" => error_name.to_string()
        )
        .increment(1);
    }

    /// Record a scheduled retry.
    pub fn job_retried(&self) {
        counter!(
            "jd_worker_jobs_retried_total",
            "subject" => self.subject.clone()
        )
        .increment(1);
    }

    /// Update the in-flight jobs gauge.
    pub fn set_in_flight(&self, count: usize) {
        gauge!(
            "jd_worker_in_flight_jobs",
            "subject" => self.subject.clone()
        )
        .set(count as f64);
    }
}

/// Initialize Prometheus metrics.
pub fn init_metrics() -> metrics_exporter_prometheus::PrometheusHandle {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    builder
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}
