//! HTTP client for the external text-extraction model.
//!
//! The model is an opaque capability: given a job title and raw text, it
//! returns a structured requirements object plus a confidence score, or
//! fails. All other modules reach it through the `ModelClient` trait.

use crate::result::CompanyInfo;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors from the extraction model call.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Request-level failure (connect, DNS, TLS)
    #[error("network error: {0}")]
    Network(String),

    /// The request timed out
    #[error("request timed out: {0}")]
    Timeout(String),

    /// 429 from the model service
    #[error("model rate limited (status {status})")]
    RateLimited { status: u16 },

    /// 5xx from the model service
    #[error("model service error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    /// The service responded but the payload is unusable (bad JSON,
    /// 4xx rejection); the adapter falls back rather than retrying
    #[error("unusable model response: {0}")]
    Unusable(String),
}

impl ModelError {
    /// True when the model service itself responded; the dependency is up
    /// even though the call produced nothing usable.
    pub fn is_response(&self) -> bool {
        matches!(self, ModelError::Unusable(_))
    }
}

/// Raw model output. Every field is optional; the adapter validates and
/// repairs before anything reaches the bus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    pub technical_skills: Option<Vec<String>>,
    pub soft_skills: Option<Vec<String>>,
    pub experience_range: Option<String>,
    pub education_level: Option<String>,
    pub responsibilities: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub company: Option<CompanyInfo>,
    pub confidence: Option<f64>,
}

/// Abstract extraction model interface.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Extract structured requirements from sanitized job-description text.
    async fn extract(&self, job_title: &str, text: &str) -> Result<ModelResponse, ModelError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractRequest<'a> {
    job_title: &'a str,
    text: &'a str,
}

/// HTTP implementation of `ModelClient`.
///
/// Does not retry internally; the orchestrator owns the retry schedule so
/// attempts are counted in exactly one place.
pub struct HttpModelClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpModelClient {
    /// Create a client for the given base URL (e.g. "http://model:8000").
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/v1/extract", base_url.trim_end_matches('/')),
            api_key,
        })
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn extract(&self, job_title: &str, text: &str) -> Result<ModelResponse, ModelError> {
        let mut request = self.client.post(&self.endpoint).json(&ExtractRequest {
            job_title,
            text,
        });

        if let Some(ref key) = self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::Timeout(e.to_string())
            } else {
                ModelError::Network(e.to_string())
            }
        })?;

        let status = response.status();

        if status.as_u16() == 429 {
            return Err(ModelError::RateLimited {
                status: status.as_u16(),
            });
        }

        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Upstream {
                status: status.as_u16(),
                message: body,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Unusable(format!(
                "status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: ModelResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Unusable(format!("bad JSON: {}", e)))?;

        debug!(
            technical_skills = parsed.technical_skills.as_ref().map(|s| s.len()),
            confidence = parsed.confidence,
            "Model response received"
        );

        Ok(parsed)
    }
}
