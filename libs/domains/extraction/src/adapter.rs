//! Extraction adapter: sanitize → model → fallback, behind a shared
//! circuit breaker.

use crate::client::{ModelClient, ModelError, ModelResponse};
use crate::error::ExtractError;
use crate::fallback::RuleBasedExtractor;
use crate::result::ExtractionResult;
use crate::sanitize::{sanitize_text, MIN_TEXT_LEN};
use resilience::CircuitBreaker;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// How a result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    Model,
    Fallback,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMethod::Model => write!(f, "model"),
            ExtractionMethod::Fallback => write!(f, "fallback"),
        }
    }
}

/// A completed extraction with provenance.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub result: ExtractionResult,
    pub confidence: f64,
    pub method: ExtractionMethod,
}

/// Adapter around the external extraction model.
///
/// The breaker guards the model call path and is shared across every job;
/// when it is open the adapter fails fast without touching the model.
/// Transport-level model failures (timeout, network, rate limit, 5xx)
/// propagate so the caller can retry; a model response that under-delivers
/// is repaired with the rule-based fallback instead.
pub struct ExtractionAdapter<C: ModelClient> {
    client: Arc<C>,
    breaker: Arc<CircuitBreaker>,
    fallback: RuleBasedExtractor,
}

impl<C: ModelClient> ExtractionAdapter<C> {
    pub fn new(client: Arc<C>, breaker: Arc<CircuitBreaker>) -> Self {
        Self {
            client,
            breaker,
            fallback: RuleBasedExtractor::new(),
        }
    }

    /// Extract structured requirements from a raw job description.
    ///
    /// Precondition: `raw_text` sanitizes to at least `MIN_TEXT_LEN`
    /// characters; shorter inputs are a non-retryable validation error.
    /// Postcondition: on success every result field is a well-formed
    /// (possibly empty) array.
    pub async fn extract(
        &self,
        job_title: &str,
        raw_text: &str,
    ) -> Result<Extraction, ExtractError> {
        let text = sanitize_text(raw_text);
        let text_len = text.chars().count();

        if text_len < MIN_TEXT_LEN {
            return Err(ExtractError::Validation(format!(
                "raw text too short after sanitization: {} chars (minimum {})",
                text_len, MIN_TEXT_LEN
            )));
        }

        if !self.breaker.can_execute() {
            return Err(ExtractError::CircuitOpen);
        }

        match self.client.extract(job_title, &text).await {
            Ok(response) => {
                self.breaker.record_success();

                match usable_result(response) {
                    Some((result, confidence)) => {
                        debug!(job_title = %job_title, confidence, "Model extraction accepted");
                        Ok(Extraction {
                            result,
                            confidence,
                            method: ExtractionMethod::Model,
                        })
                    }
                    None => {
                        warn!(
                            job_title = %job_title,
                            "Model response missing required fields, using rule-based fallback"
                        );
                        Ok(self.run_fallback(job_title, &text))
                    }
                }
            }
            Err(e) if e.is_response() => {
                // The service is up; the payload just wasn't usable
                self.breaker.record_success();
                warn!(
                    job_title = %job_title,
                    error = %e,
                    "Unusable model response, using rule-based fallback"
                );
                Ok(self.run_fallback(job_title, &text))
            }
            Err(e) => {
                self.breaker.record_failure();
                Err(match e {
                    ModelError::Timeout(msg) => ExtractError::Timeout(msg),
                    ModelError::Network(msg) => ExtractError::Network(msg),
                    ModelError::RateLimited { status } => {
                        ExtractError::RateLimited(format!("status {}", status))
                    }
                    ModelError::Upstream { status, message } => {
                        ExtractError::Unavailable(format!("status {}: {}", status, message))
                    }
                    ModelError::Unusable(_) => unreachable!("handled by is_response"),
                })
            }
        }
    }

    fn run_fallback(&self, job_title: &str, text: &str) -> Extraction {
        let (result, confidence) = self.fallback.extract(job_title, text);
        Extraction {
            result,
            confidence,
            method: ExtractionMethod::Fallback,
        }
    }
}

/// Validate a model response. Returns `None` when required fields are
/// missing (no technical skills or no responsibilities), which routes the
/// job to the fallback extractor.
fn usable_result(response: ModelResponse) -> Option<(ExtractionResult, f64)> {
    let confidence = response.confidence.unwrap_or(0.95).clamp(0.0, 1.0);

    let result = ExtractionResult {
        technical_skills: response.technical_skills.unwrap_or_default(),
        soft_skills: response.soft_skills.unwrap_or_default(),
        experience_range: response.experience_range.unwrap_or_default(),
        education_level: response.education_level.unwrap_or_default(),
        responsibilities: response.responsibilities.unwrap_or_default(),
        benefits: response.benefits.unwrap_or_default(),
        company: response.company.unwrap_or_default(),
    };

    if result.technical_skills.is_empty() || result.responsibilities.is_empty() {
        return None;
    }

    Some((result, confidence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use resilience::{CircuitBreakerConfig, CircuitState};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    const VALID_JD: &str = "Backend Engineer needed. Build and maintain distributed \
        services in Rust and PostgreSQL. Design event-driven pipelines on Kafka. \
        Requirements: 5+ years of backend experience and a Bachelor's degree.";

    /// Mock model client with a scripted response sequence.
    struct MockModel {
        responses: Mutex<Vec<Result<ModelResponse, ModelError>>>,
        calls: AtomicU32,
    }

    impl MockModel {
        fn new(responses: Vec<Result<ModelResponse, ModelError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: AtomicU32::new(0),
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
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(ModelResponse::default())
            } else {
                responses.remove(0)
            }
        }
    }

    fn good_response() -> ModelResponse {
        ModelResponse {
            technical_skills: Some(vec!["Rust".to_string(), "PostgreSQL".to_string()]),
            responsibilities: Some(vec!["Build distributed services".to_string()]),
            confidence: Some(0.95),
            ..Default::default()
        }
    }

    fn adapter_with(
        responses: Vec<Result<ModelResponse, ModelError>>,
    ) -> (ExtractionAdapter<MockModel>, Arc<MockModel>, Arc<CircuitBreaker>) {
        let client = Arc::new(MockModel::new(responses));
        let breaker = Arc::new(CircuitBreaker::new(
            CircuitBreakerConfig::new().with_failure_threshold(2),
        ));
        let adapter = ExtractionAdapter::new(client.clone(), breaker.clone());
        (adapter, client, breaker)
    }

    #[tokio::test]
    async fn test_model_result_accepted() {
        let (adapter, client, _) = adapter_with(vec![Ok(good_response())]);

        let extraction = adapter.extract("Backend Engineer", VALID_JD).await.unwrap();
        assert_eq!(extraction.method, ExtractionMethod::Model);
        assert_eq!(extraction.confidence, 0.95);
        assert_eq!(extraction.result.technical_skills.len(), 2);
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_under_delivering_model_falls_back() {
        // Model responds but with no skills and no responsibilities
        let (adapter, _, breaker) = adapter_with(vec![Ok(ModelResponse::default())]);

        let extraction = adapter.extract("Backend Engineer", VALID_JD).await.unwrap();
        assert_eq!(extraction.method, ExtractionMethod::Fallback);
        assert!(extraction.confidence >= 0.5 && extraction.confidence <= 0.7);
        // Fallback found the skills the model missed
        assert!(extraction
            .result
            .technical_skills
            .contains(&"rust".to_string()));
        // The service responded: no breaker failure recorded
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_unusable_response_falls_back() {
        let (adapter, _, _) =
            adapter_with(vec![Err(ModelError::Unusable("bad JSON".to_string()))]);

        let extraction = adapter.extract("Backend Engineer", VALID_JD).await.unwrap();
        assert_eq!(extraction.method, ExtractionMethod::Fallback);
    }

    #[tokio::test]
    async fn test_network_error_propagates() {
        let (adapter, _, breaker) = adapter_with(vec![Err(ModelError::Network(
            "connection refused".to_string(),
        ))]);

        let err = adapter
            .extract("Backend Engineer", VALID_JD)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Network(_)));
        assert!(err.is_retryable());
        assert_eq!(breaker.failure_count(), 1);
    }

    #[tokio::test]
    async fn test_open_breaker_fails_fast_without_model_call() {
        let (adapter, client, breaker) = adapter_with(vec![Ok(good_response())]);
        breaker.record_failure();
        breaker.record_failure(); // threshold 2: now open

        let err = adapter
            .extract("Backend Engineer", VALID_JD)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::CircuitOpen));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_short_input_rejected_without_model_call() {
        let (adapter, client, _) = adapter_with(vec![Ok(good_response())]);

        let err = adapter.extract("Engineer", "x").await.unwrap_err();
        assert!(matches!(err, ExtractError::Validation(_)));
        assert!(!err.is_retryable());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_model_confidence_clamped() {
        let mut response = good_response();
        response.confidence = Some(1.7);
        let (adapter, _, _) = adapter_with(vec![Ok(response)]);

        let extraction = adapter.extract("Backend Engineer", VALID_JD).await.unwrap();
        assert_eq!(extraction.confidence, 1.0);
    }
}
