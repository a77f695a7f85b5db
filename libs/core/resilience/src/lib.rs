//! Resilience primitives for calls to external dependencies.
//!
//! This library provides:
//! - **Retry**: exponential backoff with jitter (`retry_with_backoff`, `retry_if`)
//! - **Circuit Breaker**: stops calling a failing dependency for a cool-down period
//!
//! The two compose: wrap the call in a retry loop and consult a shared
//! `CircuitBreaker` on every attempt, so a known-down dependency fails fast
//! instead of being hammered.

mod breaker;
mod retry;

pub use breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use retry::{retry_if, retry_with_backoff, RetryPolicy};
