//! Configuration types for the JetStream transport.

use std::time::Duration;

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// NATS server URL
    pub url: String,

    /// Client connection name (shows up in server monitoring)
    pub name: String,

    /// Maximum connection attempts before failing fatally
    pub connect_attempts: u32,

    /// Fixed wait between connection attempts
    pub connect_retry_wait: Duration,
}

impl TransportConfig {
    /// Create a new transport configuration for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: "worker".to_string(),
            connect_attempts: 5,
            connect_retry_wait: Duration::from_secs(2),
        }
    }

    /// Set the client connection name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the number of connection attempts.
    pub fn with_connect_attempts(mut self, attempts: u32) -> Self {
        self.connect_attempts = attempts.max(1);
        self
    }

    /// Set the wait between connection attempts.
    pub fn with_connect_retry_wait(mut self, wait: Duration) -> Self {
        self.connect_retry_wait = wait;
        self
    }
}

/// Declarative stream definition.
///
/// `duplicate_window` is the stream-level message-id dedup window:
/// republishing the same `Nats-Msg-Id` within it is a no-op at the bus.
#[derive(Debug, Clone)]
pub struct StreamSpec {
    /// JetStream stream name (e.g., "JD_JOBS")
    pub name: String,

    /// Subjects captured by the stream (e.g., ["job.jd.>"])
    pub subjects: Vec<String>,

    /// Maximum retained messages
    pub max_messages: i64,

    /// Maximum message age
    pub max_age: Duration,

    /// Message-id deduplication window
    pub duplicate_window: Duration,
}

impl StreamSpec {
    /// Create a stream spec with default retention and a 2-minute dedup window.
    pub fn new(name: impl Into<String>, subjects: Vec<String>) -> Self {
        Self {
            name: name.into(),
            subjects,
            max_messages: 100_000,
            max_age: Duration::from_secs(7 * 24 * 60 * 60), // 7 days
            duplicate_window: Duration::from_secs(120),
        }
    }

    /// Set the dedup window.
    pub fn with_duplicate_window(mut self, window: Duration) -> Self {
        self.duplicate_window = window;
        self
    }

    /// Set the maximum retained messages.
    pub fn with_max_messages(mut self, max: i64) -> Self {
        self.max_messages = max;
        self
    }
}

/// Durable consumer subscription options.
///
/// Every worker replica binding the same `durable_name` shares the
/// consumer's delivery cursor, which load-balances the subject across
/// replicas (the pull-consumer equivalent of a queue group).
#[derive(Debug, Clone)]
pub struct SubscribeOptions {
    /// Stream to bind the consumer to
    pub stream: String,

    /// Filter subject (e.g., "job.jd.submitted")
    pub subject: String,

    /// Durable consumer name, fixed per deployment
    pub durable_name: String,

    /// Maximum deliveries before the bus gives up on a message
    pub max_deliver: i64,

    /// How long the bus waits for an ack before redelivering
    pub ack_wait: Duration,

    /// Batch size for fetching messages
    pub batch_size: usize,

    /// How long a fetch waits for messages before returning empty
    pub fetch_timeout: Duration,
}

impl SubscribeOptions {
    /// Create subscription options for a stream/subject pair.
    pub fn new(
        stream: impl Into<String>,
        subject: impl Into<String>,
        durable_name: impl Into<String>,
    ) -> Self {
        Self {
            stream: stream.into(),
            subject: subject.into(),
            durable_name: durable_name.into(),
            max_deliver: 3,
            ack_wait: Duration::from_secs(30),
            batch_size: 10,
            fetch_timeout: Duration::from_secs(5),
        }
    }

    /// Set the maximum deliveries.
    pub fn with_max_deliver(mut self, max_deliver: i64) -> Self {
        self.max_deliver = max_deliver;
        self
    }

    /// Set the ack wait.
    pub fn with_ack_wait(mut self, ack_wait: Duration) -> Self {
        self.ack_wait = ack_wait;
        self
    }

    /// Set the fetch batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set the fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_config_builder() {
        let config = TransportConfig::new("nats://localhost:4222")
            .with_name("jd-extraction-worker")
            .with_connect_attempts(3)
            .with_connect_retry_wait(Duration::from_millis(500));

        assert_eq!(config.url, "nats://localhost:4222");
        assert_eq!(config.name, "jd-extraction-worker");
        assert_eq!(config.connect_attempts, 3);
        assert_eq!(config.connect_retry_wait, Duration::from_millis(500));
    }

    #[test]
    fn test_stream_spec_defaults() {
        let spec = StreamSpec::new("JD_JOBS", vec!["job.jd.>".to_string()]);
        assert_eq!(spec.name, "JD_JOBS");
        assert_eq!(spec.duplicate_window, Duration::from_secs(120));
        assert_eq!(spec.max_messages, 100_000);
    }

    #[test]
    fn test_subscribe_options_builder() {
        let opts = SubscribeOptions::new("JD_JOBS", "job.jd.submitted", "jd-extraction-workers")
            .with_max_deliver(5)
            .with_batch_size(20);

        assert_eq!(opts.stream, "JD_JOBS");
        assert_eq!(opts.subject, "job.jd.submitted");
        assert_eq!(opts.durable_name, "jd-extraction-workers");
        assert_eq!(opts.max_deliver, 5);
        assert_eq!(opts.batch_size, 20);
    }
}
