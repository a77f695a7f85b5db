//! Job orchestrator: admission, retry discipline, and outcome publication.
//!
//! State machine per job id:
//! `Idle → Admitted → Processing → {Completed | Failed | Cancelled-by-timeout}`
//!
//! The in-flight map is owned exclusively by the orchestrator. At most one
//! entry exists per job id, and the tracked set is always a subset of jobs
//! whose terminal event has not yet been published.

use crate::metrics::WorkerMetrics;
use crate::reporter::{health_status, FailureReporter, HealthVerdict};
use chrono::Utc;
use domain_extraction::{
    sanitize_text, subjects, ExtractError, Extraction, ExtractedEvent, ExtractionAdapter,
    ModelClient, StartedEvent, SubmissionEvent, MIN_TEXT_LEN,
};
use messaging::{HealthState, ProcessingError, Publisher};
use resilience::RetryPolicy;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Orchestrator limits and identity.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Ceiling on concurrently processing jobs; excess submissions are
    /// requeued to the bus.
    pub max_in_flight: usize,

    /// Per-job attempt ceiling for retryable failures.
    pub max_job_attempts: u32,

    /// Age past which an in-flight entry is reclaimed by the sweep.
    pub job_timeout: Duration,

    /// Redelivery delay for submissions rejected by backpressure.
    pub requeue_delay: Duration,

    /// Service name carried in event headers.
    pub source_name: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 25,
            max_job_attempts: 3,
            job_timeout: Duration::from_secs(300),
            requeue_delay: Duration::from_secs(5),
            source_name: "jd-extraction-worker".to_string(),
        }
    }
}

/// Bookkeeping for an admitted job. Never leaves the orchestrator.
#[derive(Debug)]
struct InFlightJob {
    started_at: Instant,
    attempts: u32,
}

/// Aggregate worker health.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerHealth {
    pub status: String,
    pub in_flight_count: usize,
    pub transport_connected: bool,
}

/// Owns the lifecycle of every submission: deduplicates concurrent
/// submissions per job id, bounds total in-flight jobs, drives the retry
/// schedule, and publishes the outcome.
pub struct JobOrchestrator<P: Publisher, C: ModelClient> {
    publisher: Arc<P>,
    adapter: ExtractionAdapter<C>,
    reporter: FailureReporter<P>,
    retry_policy: RetryPolicy,
    config: OrchestratorConfig,
    in_flight: Mutex<HashMap<String, InFlightJob>>,
    health: HealthState,
    metrics: WorkerMetrics,
}

impl<P: Publisher, C: ModelClient> JobOrchestrator<P, C> {
    pub fn new(
        publisher: Arc<P>,
        adapter: ExtractionAdapter<C>,
        retry_policy: RetryPolicy,
        config: OrchestratorConfig,
        health: HealthState,
        metrics: WorkerMetrics,
    ) -> Self {
        let reporter = FailureReporter::new(publisher.clone(), config.source_name.clone());
        Self {
            publisher,
            adapter,
            reporter,
            retry_policy,
            config,
            in_flight: Mutex::new(HashMap::new()),
            health,
            metrics,
        }
    }

    /// Handle one submission delivery.
    ///
    /// Returns `Ok(())` when the delivery is fully resolved (including
    /// terminal failures, which are reported as events). Returns a
    /// rate-limited error when the in-flight ceiling is hit so the bus
    /// requeues the delivery after a delay instead of dropping it.
    pub async fn handle_submission(&self, event: SubmissionEvent) -> Result<(), ProcessingError> {
        self.sweep_expired();

        // Admission: at most one in-flight entry per job id
        {
            let mut map = self.in_flight.lock().unwrap();

            if map.contains_key(&event.job_id) {
                info!(
                    job_id = %event.job_id,
                    "Duplicate submission while in flight, discarding"
                );
                self.metrics.duplicate_discarded();
                return Ok(());
            }

            if map.len() >= self.config.max_in_flight {
                warn!(
                    job_id = %event.job_id,
                    in_flight = map.len(),
                    ceiling = self.config.max_in_flight,
                    "In-flight ceiling reached, requeueing submission"
                );
                self.metrics.backpressure_requeued();
                return Err(ProcessingError::rate_limited_with_retry(
                    format!("in-flight ceiling {} reached", self.config.max_in_flight),
                    self.config.requeue_delay.as_millis() as u64,
                ));
            }

            map.insert(
                event.job_id.clone(),
                InFlightJob {
                    started_at: Instant::now(),
                    attempts: 0,
                },
            );
            self.metrics.set_in_flight(map.len());
        }

        self.process(&event).await;

        // Terminal for this job id, whatever the outcome
        {
            let mut map = self.in_flight.lock().unwrap();
            map.remove(&event.job_id);
            self.metrics.set_in_flight(map.len());
        }

        Ok(())
    }

    /// True while the job id has an in-flight entry.
    pub fn is_processing(&self, job_id: &str) -> bool {
        self.sweep_expired();
        self.in_flight.lock().unwrap().contains_key(job_id)
    }

    /// Job ids currently in flight (stale entries swept first).
    pub fn list_in_flight(&self) -> Vec<String> {
        self.sweep_expired();
        self.in_flight.lock().unwrap().keys().cloned().collect()
    }

    /// Aggregate health: transport connectivity plus in-flight load.
    pub async fn health_check(&self) -> WorkerHealth {
        self.sweep_expired();
        let in_flight_count = self.in_flight.lock().unwrap().len();
        let transport_connected = self.health.transport_connected().await;
        let model_available = self.health.model_available().await;

        let verdict: HealthVerdict = health_status(
            transport_connected,
            model_available,
            in_flight_count,
            self.config.max_in_flight,
        );

        WorkerHealth {
            status: verdict.to_string(),
            in_flight_count,
            transport_connected,
        }
    }

    /// Purge entries older than the job timeout. Removes bookkeeping only;
    /// an extraction call already running is not cancelled.
    fn sweep_expired(&self) {
        let mut map = self.in_flight.lock().unwrap();
        let before = map.len();

        map.retain(|job_id, job| {
            let expired = job.started_at.elapsed() > self.config.job_timeout;
            if expired {
                warn!(
                    job_id = %job_id,
                    age_secs = job.started_at.elapsed().as_secs(),
                    attempts = job.attempts,
                    "Reclaiming stale in-flight job"
                );
            }
            !expired
        });

        if map.len() != before {
            self.metrics.set_in_flight(map.len());
        }
    }

    /// Drive a submission to a terminal state. All failures are routed to
    /// the reporter; nothing escapes uncaught.
    async fn process(&self, event: &SubmissionEvent) {
        let processing_start = Instant::now();

        // Precondition guards: jobId, jobTitle, and minimum text length.
        // Violations never reach the extraction adapter.
        if let Err(violation) = validate_submission(event) {
            warn!(
                job_id = %event.job_id,
                error = %violation,
                "Submission failed validation"
            );
            self.metrics.job_failed(violation.error_name());
            self.reporter
                .report_failure(&event.job_id, &violation, "validation", 0)
                .await;
            return;
        }

        self.publish_started(event).await;

        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            self.record_attempt(&event.job_id, attempts);

            let failure = match self
                .adapter
                .extract(&event.job_title, &event.raw_text)
                .await
            {
                Ok(extraction) => {
                    self.health.set_model_available(true).await;
                    match self
                        .publish_extracted(event, &extraction, processing_start)
                        .await
                    {
                        Ok(()) => return,
                        Err(publish_failure) => publish_failure,
                    }
                }
                Err(e) => {
                    if matches!(e, ExtractError::CircuitOpen) {
                        self.health.set_model_available(false).await;
                    }
                    e
                }
            };

            if failure.is_retryable() && attempts < self.config.max_job_attempts {
                let delay = self.retry_policy.delay_for_attempt(attempts);
                info!(
                    job_id = %event.job_id,
                    retry_attempt = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %failure,
                    "Scheduling retry with backoff"
                );
                self.metrics.job_retried();
                tokio::time::sleep(delay).await;
                continue;
            }

            let stage = match failure {
                ExtractError::Publish(_) => "publish",
                ExtractError::Validation(_) => "validation",
                _ => "extraction",
            };
            self.metrics.job_failed(failure.error_name());
            self.reporter
                .report_failure(&event.job_id, &failure, stage, attempts)
                .await;
            return;
        }
    }

    fn record_attempt(&self, job_id: &str, attempts: u32) {
        let mut map = self.in_flight.lock().unwrap();
        if let Some(job) = map.get_mut(job_id) {
            job.attempts = attempts;
        }
    }

    /// Best-effort observability event; failures are logged and ignored.
    async fn publish_started(&self, event: &SubmissionEvent) {
        let input_size = event.raw_text.len();
        let started = StartedEvent {
            job_id: event.job_id.clone(),
            input_size,
            expected_processing_time_ms: ((input_size / 10) as u64).clamp(1_000, 30_000),
        };

        let message_id = format!("{}-started", event.job_id);
        let headers = [("source-service", self.config.source_name.clone())];

        if let Err(e) = self
            .publisher
            .publish(subjects::JD_STARTED, &message_id, &headers, &started)
            .await
        {
            debug!(
                job_id = %event.job_id,
                error = %e,
                "Failed to publish started event"
            );
        }
    }

    async fn publish_extracted(
        &self,
        event: &SubmissionEvent,
        extraction: &Extraction,
        processing_start: Instant,
    ) -> Result<(), ExtractError> {
        let extracted = ExtractedEvent {
            job_id: event.job_id.clone(),
            extracted_data: extraction.result.clone(),
            processing_time_ms: processing_start.elapsed().as_millis() as u64,
            confidence: extraction.confidence,
            extraction_method: extraction.method.to_string(),
            timestamp: Utc::now(),
        };

        // Shape check is warn-only: a thin result is still forwarded
        for warning in extracted.extracted_data.quality_warnings() {
            warn!(
                job_id = %event.job_id,
                warning = warning,
                "Extraction quality check flagged result"
            );
        }

        let message_id = format!("{}-extracted", event.job_id);
        let headers = [
            ("job-id", event.job_id.clone()),
            ("confidence", format!("{:.2}", extraction.confidence)),
            ("source-service", self.config.source_name.clone()),
        ];

        match self
            .publisher
            .publish(subjects::JD_EXTRACTED, &message_id, &headers, &extracted)
            .await
        {
            Ok(ack) => {
                info!(
                    job_id = %event.job_id,
                    sequence = ack.sequence,
                    duplicate = ack.duplicate,
                    confidence = extraction.confidence,
                    method = %extraction.method,
                    processing_time_ms = extracted.processing_time_ms,
                    "Extraction published"
                );
                self.metrics
                    .job_extracted(processing_start.elapsed(), &extracted.extraction_method);
                Ok(())
            }
            Err(e) => Err(ExtractError::Publish(e.to_string())),
        }
    }
}

/// Guard functions for submission preconditions. Returns a typed,
/// non-retryable error on violation.
fn validate_submission(event: &SubmissionEvent) -> Result<(), ExtractError> {
    if event.job_id.trim().is_empty() {
        return Err(ExtractError::Validation("jobId is missing".to_string()));
    }
    if event.job_title.trim().is_empty() {
        return Err(ExtractError::Validation("jobTitle is missing".to_string()));
    }

    let text_len = sanitize_text(&event.raw_text).chars().count();
    if text_len < MIN_TEXT_LEN {
        return Err(ExtractError::Validation(format!(
            "rawText too short: {} chars (minimum {})",
            text_len, MIN_TEXT_LEN
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain_extraction::{ModelError, ModelResponse};
    use messaging::{PublishAck, TransportError};
    use resilience::{CircuitBreaker, CircuitBreakerConfig};
    use serde_json::Value;
    use std::sync::atomic::{AtomicU32, Ordering};

    const VALID_JD: &str = "Backend Engineer needed for our fintech platform. \
        Build and maintain distributed services in Rust and PostgreSQL. \
        Design event-driven pipelines on Kafka and deploy them to Kubernetes. \
        Requirements: 5+ years of backend experience, strong communication \
        skills, and a Bachelor's degree in Computer Science or equivalent. \
        We offer equity, health insurance, and flexible hours. \
        Collaborate with product managers to deliver reliable infrastructure \
        for payments processing at scale.";

    fn submission(job_id: &str) -> SubmissionEvent {
        SubmissionEvent {
            job_id: job_id.to_string(),
            job_title: "Backend Engineer".to_string(),
            raw_text: VALID_JD.to_string(),
            submitted_at: Utc::now(),
        }
    }

    /// Mock publisher recording every published event.
    struct MockPublisher {
        published: Mutex<Vec<(String, String, Value)>>,
        fail_subject: Option<&'static str>,
    }

    impl MockPublisher {
        fn new() -> Self {
            Self {
                published: Mutex::new(Vec::new()),
                fail_subject: None,
            }
        }

        fn failing_on(subject: &'static str) -> Self {
            Self {
                published: Mutex::new(Vec::new()),
                fail_subject: Some(subject),
            }
        }

        fn published_on(&self, subject: &str) -> Vec<Value> {
            self.published
                .lock()
                .unwrap()
                .iter()
                .filter(|(s, _, _)| s == subject)
                .map(|(_, _, payload)| payload.clone())
                .collect()
        }
    }

    #[async_trait]
    impl Publisher for MockPublisher {
        async fn publish<T: Serialize + Send + Sync>(
            &self,
            subject: &str,
            message_id: &str,
            _headers: &[(&str, String)],
            payload: &T,
        ) -> Result<PublishAck, TransportError> {
            if self.fail_subject == Some(subject) {
                return Err(TransportError::publish_error("connection reset by peer"));
            }
            let value = serde_json::to_value(payload).unwrap();
            self.published
                .lock()
                .unwrap()
                .push((subject.to_string(), message_id.to_string(), value));
            Ok(PublishAck {
                sequence: 1,
                duplicate: false,
            })
        }
    }

    /// Mock model: fails `failures` times, then succeeds; optional per-call
    /// latency to keep jobs in flight.
    struct MockModel {
        failures: AtomicU32,
        calls: AtomicU32,
        latency: Duration,
    }

    impl MockModel {
        fn succeeding() -> Self {
            Self::failing(0)
        }

        fn failing(failures: u32) -> Self {
            Self {
                failures: AtomicU32::new(failures),
                calls: AtomicU32::new(0),
                latency: Duration::ZERO,
            }
        }

        fn slow(latency: Duration) -> Self {
            Self {
                failures: AtomicU32::new(0),
                calls: AtomicU32::new(0),
                latency,
            }
        }

        fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelClient for MockModel {
        async fn extract(&self, _: &str, _: &str) -> Result<ModelResponse, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.latency > Duration::ZERO {
                tokio::time::sleep(self.latency).await;
            }
            if self.failures.load(Ordering::SeqCst) > 0 {
                self.failures.fetch_sub(1, Ordering::SeqCst);
                return Err(ModelError::Network("connection refused".to_string()));
            }
            Ok(ModelResponse {
                technical_skills: Some(vec!["Rust".to_string()]),
                responsibilities: Some(vec!["Build services".to_string()]),
                confidence: Some(0.95),
                ..Default::default()
            })
        }
    }

    struct Harness {
        orchestrator: Arc<JobOrchestrator<MockPublisher, MockModel>>,
        publisher: Arc<MockPublisher>,
        model: Arc<MockModel>,
    }

    fn harness_with(publisher: MockPublisher, model: MockModel, config: OrchestratorConfig) -> Harness {
        let publisher = Arc::new(publisher);
        let model = Arc::new(model);
        let breaker = Arc::new(CircuitBreaker::new(
            // High threshold so breaker behavior doesn't interfere
            CircuitBreakerConfig::new().with_failure_threshold(100),
        ));
        let adapter = ExtractionAdapter::new(model.clone(), breaker);
        let retry_policy = RetryPolicy::new()
            .with_max_attempts(config.max_job_attempts)
            .with_base_delay(1)
            .with_max_delay(5)
            .without_jitter();

        let orchestrator = Arc::new(JobOrchestrator::new(
            publisher.clone(),
            adapter,
            retry_policy,
            config,
            HealthState::new(),
            WorkerMetrics::new(subjects::JD_SUBMITTED),
        ));

        Harness {
            orchestrator,
            publisher,
            model,
        }
    }

    fn harness(model: MockModel) -> Harness {
        harness_with(MockPublisher::new(), model, OrchestratorConfig::default())
    }

    #[tokio::test]
    async fn test_valid_submission_publishes_exactly_one_extracted_event() {
        let h = harness(MockModel::succeeding());

        h.orchestrator
            .handle_submission(submission("job-1"))
            .await
            .unwrap();

        let extracted = h.publisher.published_on(subjects::JD_EXTRACTED);
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0]["jobId"], "job-1");
        assert_eq!(extracted[0]["extractionMethod"], "model");
        let confidence = extracted[0]["confidence"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&confidence));
        assert!(!extracted[0]["extractedData"]["technicalSkills"]
            .as_array()
            .unwrap()
            .is_empty());

        // Started event emitted, no failures, bookkeeping cleaned up
        assert_eq!(h.publisher.published_on(subjects::JD_STARTED).len(), 1);
        assert!(h.publisher.published_on(subjects::JD_FAILED).is_empty());
        assert!(!h.orchestrator.is_processing("job-1"));
        assert!(h.orchestrator.list_in_flight().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_while_in_flight_discarded() {
        let h = harness(MockModel::slow(Duration::from_millis(200)));

        let first = {
            let orchestrator = h.orchestrator.clone();
            tokio::spawn(async move { orchestrator.handle_submission(submission("job-1")).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(h.orchestrator.is_processing("job-1"));

        // Second delivery of the same id: discarded without side effects
        h.orchestrator
            .handle_submission(submission("job-1"))
            .await
            .unwrap();

        first.await.unwrap().unwrap();

        assert_eq!(h.model.call_count(), 1);
        assert_eq!(h.publisher.published_on(subjects::JD_EXTRACTED).len(), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_is_terminal_without_retry() {
        let h = harness(MockModel::succeeding());

        let event = SubmissionEvent {
            job_id: "job-2".to_string(),
            job_title: "".to_string(),
            raw_text: "x".to_string(),
            submitted_at: Utc::now(),
        };

        h.orchestrator.handle_submission(event).await.unwrap();

        let failed = h.publisher.published_on(subjects::JD_FAILED);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0]["errorName"], "ValidationError");
        assert_eq!(failed[0]["stage"], "validation");
        assert_eq!(failed[0]["retryAttempt"], 0);

        // Adapter never consulted, nothing else published
        assert_eq!(h.model.call_count(), 0);
        assert!(h.publisher.published_on(subjects::JD_EXTRACTED).is_empty());
        assert!(h.publisher.published_on(subjects::JD_STARTED).is_empty());
    }

    #[tokio::test]
    async fn test_transient_error_recovers_before_exhaustion() {
        let h = harness(MockModel::failing(1));

        h.orchestrator
            .handle_submission(submission("job-1"))
            .await
            .unwrap();

        assert_eq!(h.model.call_count(), 2);
        assert_eq!(h.publisher.published_on(subjects::JD_EXTRACTED).len(), 1);
        assert!(h.publisher.published_on(subjects::JD_FAILED).is_empty());
    }

    #[tokio::test]
    async fn test_persistent_network_error_exhausts_attempts() {
        let h = harness(MockModel::failing(100));

        h.orchestrator
            .handle_submission(submission("job-3"))
            .await
            .unwrap();

        // Attempt ceiling reached: one terminal failure event
        assert_eq!(h.model.call_count(), 3);

        let failed = h.publisher.published_on(subjects::JD_FAILED);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0]["jobId"], "job-3");
        assert_eq!(failed[0]["errorName"], "NetworkError");
        assert_eq!(failed[0]["retryAttempt"], 3);
        assert_eq!(failed[0]["severity"], "critical");

        assert!(h.publisher.published_on(subjects::JD_EXTRACTED).is_empty());
    }

    #[tokio::test]
    async fn test_backpressure_requeues_beyond_ceiling() {
        let config = OrchestratorConfig {
            max_in_flight: 1,
            ..Default::default()
        };
        let h = harness_with(
            MockPublisher::new(),
            MockModel::slow(Duration::from_millis(200)),
            config,
        );

        let first = {
            let orchestrator = h.orchestrator.clone();
            tokio::spawn(async move { orchestrator.handle_submission(submission("job-1")).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;

        // Different job id beyond the ceiling: requeued, not dropped
        let err = h
            .orchestrator
            .handle_submission(submission("job-2"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::RateLimited { .. }));

        first.await.unwrap().unwrap();

        // Once capacity frees up the requeued job processes normally
        h.orchestrator
            .handle_submission(submission("job-2"))
            .await
            .unwrap();
        assert_eq!(h.publisher.published_on(subjects::JD_EXTRACTED).len(), 2);
    }

    #[tokio::test]
    async fn test_timeout_reclaims_stale_entries() {
        let config = OrchestratorConfig {
            job_timeout: Duration::from_millis(50),
            ..Default::default()
        };
        let h = harness_with(
            MockPublisher::new(),
            MockModel::slow(Duration::from_millis(300)),
            config,
        );

        let hung = {
            let orchestrator = h.orchestrator.clone();
            tokio::spawn(async move { orchestrator.handle_submission(submission("job-1")).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(h.orchestrator.is_processing("job-1"));

        // Past the timeout the entry is swept even though the extraction
        // call is still running
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(h.orchestrator.list_in_flight().is_empty());
        assert!(!h.orchestrator.is_processing("job-1"));

        hung.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_publish_failure_routed_to_failure_handling() {
        let h = harness_with(
            MockPublisher::failing_on(subjects::JD_EXTRACTED),
            MockModel::succeeding(),
            OrchestratorConfig::default(),
        );

        h.orchestrator
            .handle_submission(submission("job-1"))
            .await
            .unwrap();

        let failed = h.publisher.published_on(subjects::JD_FAILED);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0]["errorName"], "PublishError");
        assert_eq!(failed[0]["stage"], "publish");
        // "connection reset" classifies as retryable, so attempts were used up
        assert_eq!(failed[0]["retryAttempt"], 3);
    }

    #[tokio::test]
    async fn test_health_check_reports_in_flight_and_transport() {
        let h = harness(MockModel::slow(Duration::from_millis(200)));

        let health = h.orchestrator.health_check().await;
        assert_eq!(health.status, "healthy");
        assert_eq!(health.in_flight_count, 0);
        assert!(health.transport_connected);

        let running = {
            let orchestrator = h.orchestrator.clone();
            tokio::spawn(async move { orchestrator.handle_submission(submission("job-1")).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let health = h.orchestrator.health_check().await;
        assert_eq!(health.in_flight_count, 1);

        running.await.unwrap().unwrap();
    }

    #[test]
    fn test_validate_submission_guards() {
        let valid = submission("job-1");
        assert!(validate_submission(&valid).is_ok());

        let mut missing_id = submission("job-1");
        missing_id.job_id = "  ".to_string();
        assert!(validate_submission(&missing_id).is_err());

        let mut missing_title = submission("job-1");
        missing_title.job_title = String::new();
        assert!(validate_submission(&missing_title).is_err());

        let mut short_text = submission("job-1");
        short_text.raw_text = "too short".to_string();
        let err = validate_submission(&short_text).unwrap_err();
        assert!(matches!(err, ExtractError::Validation(_)));
    }
}
