//! Extraction error taxonomy and retryability classification.

use thiserror::Error;

/// Errors raised while extracting a job description.
///
/// Retryability is intrinsic to the variant; `is_retryable_message` covers
/// errors that arrive as plain text (wrapped transport errors).
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Malformed or undersized input; never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// The model call timed out.
    #[error("extraction model call timed out: {0}")]
    Timeout(String),

    /// Network-level failure reaching the model.
    #[error("network error calling extraction model: {0}")]
    Network(String),

    /// The model rate-limited the call.
    #[error("extraction model rate limited: {0}")]
    RateLimited(String),

    /// The model service returned a server error.
    #[error("extraction model unavailable: {0}")]
    Unavailable(String),

    /// Fast-fail while the circuit breaker is open.
    #[error("circuit breaker open for extraction model")]
    CircuitOpen,

    /// The outcome event could not be published.
    #[error("failed to publish outcome event: {0}")]
    Publish(String),
}

impl ExtractError {
    /// Stable error name carried in failure events.
    pub fn error_name(&self) -> &'static str {
        match self {
            ExtractError::Validation(_) => "ValidationError",
            ExtractError::Timeout(_) => "TimeoutError",
            ExtractError::Network(_) => "NetworkError",
            ExtractError::RateLimited(_) => "RateLimitError",
            ExtractError::Unavailable(_) => "ServiceUnavailableError",
            ExtractError::CircuitOpen => "CircuitOpenError",
            ExtractError::Publish(_) => "PublishError",
        }
    }

    /// Whether the orchestrator should schedule a reprocessing attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExtractError::Validation(_) => false,
            ExtractError::Timeout(_)
            | ExtractError::Network(_)
            | ExtractError::RateLimited(_)
            | ExtractError::Unavailable(_)
            | ExtractError::CircuitOpen => true,
            // Publish failures carry wrapped transport text; classify by
            // substring heuristics.
            ExtractError::Publish(message) => is_retryable_message(message),
        }
    }
}

/// Substring heuristic for classifying errors that arrive as plain text.
///
/// Timeout, network, rate-limit, and connection failures are retryable;
/// validation-shaped messages are not. Unrecognized messages default to
/// retryable.
pub fn is_retryable_message(message: &str) -> bool {
    let message = message.to_lowercase();

    const NON_RETRYABLE: &[&str] = &["validation", "malformed", "invalid", "missing"];
    if NON_RETRYABLE.iter().any(|marker| message.contains(marker)) {
        return false;
    }

    const RETRYABLE: &[&str] = &[
        "timeout",
        "timed out",
        "network",
        "rate limit",
        "too many requests",
        "connection",
        "unavailable",
        "no responders",
    ];
    if RETRYABLE.iter().any(|marker| message.contains(marker)) {
        return true;
    }

    true
}
