use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy for calls to external dependencies.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first one)
    pub max_attempts: u32,

    /// Initial delay between attempts in milliseconds
    pub base_delay_ms: u64,

    /// Maximum delay between attempts in milliseconds
    pub max_delay_ms: u64,

    /// Multiplier for exponential backoff (typically 2.0)
    pub backoff_multiplier: f64,

    /// Maximum random jitter added to each delay, in milliseconds.
    /// Zero disables jitter (useful in tests).
    pub jitter_ms: u64,
}

impl RetryPolicy {
    /// Create a new retry policy with defaults
    ///
    /// Defaults:
    /// - max_attempts: 3
    /// - base_delay_ms: 1000
    /// - max_delay_ms: 30_000
    /// - backoff_multiplier: 2.0
    /// - jitter_ms: 250
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of attempts
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the initial delay
    pub fn with_base_delay(mut self, delay_ms: u64) -> Self {
        self.base_delay_ms = delay_ms;
        self
    }

    /// Set the maximum delay
    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    /// Set the backoff multiplier
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Set the maximum jitter
    pub fn with_jitter(mut self, jitter_ms: u64) -> Self {
        self.jitter_ms = jitter_ms;
        self
    }

    /// Disable jitter
    pub fn without_jitter(mut self) -> Self {
        self.jitter_ms = 0;
        self
    }

    /// Delay before the attempt following attempt number `attempt` (1-based):
    /// `min(max_delay, base_delay * multiplier^(attempt-1)) + random(jitter)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32);
        let raw = self.base_delay_ms as f64 * self.backoff_multiplier.powi(exponent as i32);
        let capped = (raw as u64).min(self.max_delay_ms);
        Duration::from_millis(capped + random_jitter(self.jitter_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
            jitter_ms: 250,
        }
    }
}

/// Retry an async operation with exponential backoff.
///
/// Retries on every error up to `max_attempts`; the final failure is
/// returned unchanged so callers see the original error rather than a
/// wrapper.
///
/// # Example
/// ```ignore
/// use resilience::{retry_with_backoff, RetryPolicy};
///
/// let policy = RetryPolicy::new().with_max_attempts(5);
/// let result = retry_with_backoff(|| async { client.extract(text).await }, &policy).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(operation: F, policy: &RetryPolicy) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_if(operation, policy, |_| true).await
}

/// Retry an async operation, consulting a predicate before each retry.
///
/// Errors for which `retryable` returns `false` are returned immediately,
/// so validation failures short-circuit on the first attempt.
pub async fn retry_if<F, Fut, T, E, P>(
    mut operation: F,
    policy: &RetryPolicy,
    mut retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: FnMut(&E) -> bool,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("Operation succeeded on attempt {}", attempt);
                }
                return Ok(result);
            }
            Err(e) => {
                if !retryable(&e) {
                    debug!("Operation failed with non-retryable error: {}", e);
                    return Err(e);
                }

                if attempt >= policy.max_attempts {
                    warn!(
                        "Operation failed after {} attempts: {}",
                        policy.max_attempts, e
                    );
                    return Err(e);
                }

                let delay = policy.delay_for_attempt(attempt);

                debug!(
                    "Operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                    attempt,
                    policy.max_attempts,
                    e,
                    delay.as_millis()
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Random jitter in `[0, jitter_ms]` to prevent thundering herd.
///
/// Uses hashed system time rather than a dedicated RNG dependency.
fn random_jitter(jitter_ms: u64) -> u64 {
    if jitter_ms == 0 {
        return 0;
    }

    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    RandomState::new().hash_one(std::time::SystemTime::now()) % (jitter_ms + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new()
            .with_max_attempts(max_attempts)
            .with_base_delay(10)
            .with_max_delay(50)
            .without_jitter()
    }

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_backoff(
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>("success")
                }
            },
            &fast_policy(3),
        )
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_failures() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_backoff(
            || {
                let counter = counter_clone.clone();
                async move {
                    let count = counter.fetch_add(1, Ordering::SeqCst);
                    if count < 2 {
                        Err(format!("attempt {}", count + 1))
                    } else {
                        Ok("success")
                    }
                }
            },
            &fast_policy(5),
        )
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_returns_original_error() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_backoff(
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<String, _>("always fails")
                }
            },
            &fast_policy(3),
        )
        .await;

        assert_eq!(result.unwrap_err(), "always fails");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_if_non_retryable_short_circuits() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_if(
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<String, _>("validation: raw text too short")
                }
            },
            &fast_policy(5),
            |e| !e.starts_with("validation"),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delay_for_attempt_backoff() {
        let policy = RetryPolicy::new()
            .with_base_delay(100)
            .with_max_delay(1000)
            .without_jitter();

        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
        // Capped at max_delay
        assert_eq!(policy.delay_for_attempt(10), Duration::from_millis(1000));
    }

    #[test]
    fn test_jitter_bounds() {
        let policy = RetryPolicy::new().with_base_delay(100).with_max_delay(100);
        for _ in 0..10 {
            let delay = policy.delay_for_attempt(1).as_millis() as u64;
            assert!(delay >= 100);
            assert!(delay <= 100 + policy.jitter_ms);
        }
    }

    #[test]
    fn test_policy_builder() {
        let policy = RetryPolicy::new()
            .with_max_attempts(5)
            .with_base_delay(200)
            .with_max_delay(10_000)
            .with_backoff_multiplier(3.0)
            .without_jitter();

        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay_ms, 200);
        assert_eq!(policy.max_delay_ms, 10_000);
        assert_eq!(policy.jitter_ms, 0);
    }
}
