//! Configuration for the extraction worker service.

use core_config::{env_or_default, env_parse_or};
use std::env;
use std::time::Duration;

/// Service name carried in event headers and connection metadata.
pub const SOURCE_NAME: &str = "jd-extraction-worker";

/// Stream holding job lifecycle subjects (`job.jd.>`).
pub const JD_JOBS_STREAM: &str = "JD_JOBS";

/// Stream holding analysis results (`analysis.jd.>`).
pub const JD_ANALYSIS_STREAM: &str = "JD_ANALYSIS";

#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// Connection attempts before the process gives up
    pub connect_attempts: u32,
    pub connect_retry_wait: Duration,

    /// Health server port
    pub health_port: u16,

    /// Extraction model endpoint
    pub model_url: String,
    pub model_api_key: Option<String>,
    pub model_timeout: Duration,

    /// Durable consumer name, fixed per deployment so replicas load-balance
    pub durable_name: String,
    pub max_deliver: i64,
    pub ack_wait: Duration,
    pub batch_size: usize,
    pub fetch_timeout: Duration,

    /// Orchestrator limits
    pub max_in_flight: usize,
    pub max_job_attempts: u32,
    pub job_timeout: Duration,
    pub requeue_delay: Duration,

    /// Retry backoff
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    pub retry_jitter_ms: u64,

    /// Circuit breaker for the model dependency
    pub breaker_failure_threshold: u32,
    pub breaker_cooldown: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            nats_url: env_or_default("NATS_URL", "nats://localhost:4222"),
            connect_attempts: env_parse_or("NATS_CONNECT_ATTEMPTS", 5),
            connect_retry_wait: Duration::from_millis(env_parse_or(
                "NATS_CONNECT_RETRY_WAIT_MS",
                2000,
            )),

            health_port: env_parse_or("HEALTH_PORT", 8081),

            model_url: env_or_default("MODEL_URL", "http://localhost:8000"),
            model_api_key: env::var("MODEL_API_KEY").ok(),
            model_timeout: Duration::from_secs(env_parse_or("MODEL_TIMEOUT_SECS", 30)),

            durable_name: env_or_default("DURABLE_NAME", "jd-extraction-workers"),
            max_deliver: env_parse_or("MAX_DELIVER", 3),
            ack_wait: Duration::from_secs(env_parse_or("ACK_WAIT_SECS", 30)),
            batch_size: env_parse_or("BATCH_SIZE", 10),
            fetch_timeout: Duration::from_secs(env_parse_or("FETCH_TIMEOUT_SECS", 5)),

            max_in_flight: env_parse_or("MAX_IN_FLIGHT", 25),
            max_job_attempts: env_parse_or("MAX_JOB_ATTEMPTS", 3),
            job_timeout: Duration::from_secs(env_parse_or("JOB_TIMEOUT_SECS", 300)),
            requeue_delay: Duration::from_secs(env_parse_or("REQUEUE_DELAY_SECS", 5)),

            retry_base_delay_ms: env_parse_or("RETRY_BASE_DELAY_MS", 1000),
            retry_max_delay_ms: env_parse_or("RETRY_MAX_DELAY_MS", 30_000),
            retry_jitter_ms: env_parse_or("RETRY_JITTER_MS", 250),

            breaker_failure_threshold: env_parse_or("BREAKER_FAILURE_THRESHOLD", 5),
            breaker_cooldown: Duration::from_secs(env_parse_or("BREAKER_COOLDOWN_SECS", 30)),
        }
    }
}
