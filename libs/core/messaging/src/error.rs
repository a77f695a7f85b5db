//! Error types for the transport and the bus-boundary handler contract.

use std::fmt;
use thiserror::Error;

/// Error categories determine how the worker loop resolves a delivery.
///
/// - **Transient**: negatively acknowledge with a backoff delay (bus
///   redelivers, bounded by the consumer's max_deliver)
/// - **Permanent**: terminate the delivery (never redelivered)
/// - **RateLimited**: negatively acknowledge with a longer, fixed delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Temporary failure (network timeout, service unavailable)
    Transient,

    /// Permanent failure (invalid data, missing required fields)
    Permanent,

    /// Backpressure or upstream rate limiting
    RateLimited,
}

impl ErrorCategory {
    /// Base redelivery delay in milliseconds.
    pub fn base_delay_ms(&self) -> u64 {
        match self {
            ErrorCategory::Transient => 1000,
            ErrorCategory::Permanent => 0,
            ErrorCategory::RateLimited => 5000,
        }
    }

    /// Maximum redelivery delay in milliseconds.
    pub fn max_delay_ms(&self) -> u64 {
        match self {
            ErrorCategory::Transient => 30_000,
            ErrorCategory::Permanent => 0,
            ErrorCategory::RateLimited => 120_000,
        }
    }

    /// Exponential redelivery delay for the given delivery count.
    pub fn backoff_delay_ms(&self, delivery_count: u32) -> u64 {
        if *self == ErrorCategory::Permanent {
            return 0;
        }

        let base = self.base_delay_ms();
        let max = self.max_delay_ms();
        let delay = base * 2u64.saturating_pow(delivery_count);
        delay.min(max)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Transient => write!(f, "transient"),
            ErrorCategory::Permanent => write!(f, "permanent"),
            ErrorCategory::RateLimited => write!(f, "rate_limited"),
        }
    }
}

/// Error returned by a message handler to the worker loop.
///
/// The category decides whether the delivery is acked, naked with a delay,
/// or terminated.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Transient error (network timeout, temporary unavailability)
    #[error("transient error: {message}")]
    Transient { message: String },

    /// Permanent error (invalid data, business logic failure)
    #[error("permanent error: {message}")]
    Permanent { message: String },

    /// Backpressure or rate limiting; redeliver after the given delay
    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after_ms: Option<u64>,
    },

    /// Payload could not be deserialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProcessingError {
    /// Create a transient error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    /// Create a permanent error.
    pub fn permanent(message: impl Into<String>) -> Self {
        Self::Permanent {
            message: message.into(),
        }
    }

    /// Create a rate limited error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms: None,
        }
    }

    /// Create a rate limited error with a redelivery-delay hint.
    pub fn rate_limited_with_retry(message: impl Into<String>, retry_after_ms: u64) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms: Some(retry_after_ms),
        }
    }

    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProcessingError::Transient { .. } => ErrorCategory::Transient,
            ProcessingError::Permanent { .. } => ErrorCategory::Permanent,
            ProcessingError::RateLimited { .. } => ErrorCategory::RateLimited,
            ProcessingError::Serialization(_) => ErrorCategory::Permanent,
        }
    }

    /// Redelivery delay for the given delivery count.
    ///
    /// Rate-limited errors with an explicit hint use it verbatim.
    pub fn backoff_delay_ms(&self, delivery_count: u32) -> u64 {
        if let ProcessingError::RateLimited {
            retry_after_ms: Some(ms),
            ..
        } = self
        {
            return *ms;
        }
        self.category().backoff_delay_ms(delivery_count)
    }
}

/// Error that can occur in transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// NATS connection error
    #[error("NATS connection error: {0}")]
    Connection(#[from] async_nats::ConnectError),

    /// Connection attempts exhausted
    #[error("connection failed after {attempts} attempts: {last_error}")]
    ConnectExhausted { attempts: u32, last_error: String },

    /// JetStream error
    #[error("JetStream error: {0}")]
    JetStream(String),

    /// Consumer error
    #[error("consumer error: {0}")]
    Consumer(String),

    /// Publish error
    #[error("publish error: {0}")]
    Publish(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TransportError {
    /// Create a JetStream error from any displayable error.
    pub fn from_jetstream_error(error: impl std::fmt::Display) -> Self {
        Self::JetStream(error.to_string())
    }

    /// Create a publish error.
    pub fn publish_error(msg: impl Into<String>) -> Self {
        Self::Publish(msg.into())
    }

    /// Create a consumer error.
    pub fn consumer_error(msg: impl Into<String>) -> Self {
        Self::Consumer(msg.into())
    }
}
