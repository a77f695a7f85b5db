//! Durable messaging over NATS JetStream.
//!
//! This library provides the transport layer for event-driven workers:
//!
//! - **Durable pub/sub**: streams with message-id deduplication windows,
//!   durable pull consumers with explicit ack/nak/term semantics
//! - **Bounded connect**: connection establishment with a fixed number of
//!   attempts before failing fatally
//! - **Publisher seam**: the `Publisher` trait lets handlers depend on an
//!   interface, so tests run against an in-memory mock
//! - **Health endpoints**: K8s-ready liveness/readiness probes plus
//!   Prometheus metrics rendering
//!
//! All transport failures are returned as values (`TransportError`); nothing
//! in this crate panics on I/O errors.

mod error;
mod health;
pub mod nats;
mod publisher;

pub use error::{ErrorCategory, ProcessingError, TransportError};
pub use health::{HealthChecks, HealthServer, HealthSnapshot, HealthState};
pub use nats::{
    DeliveredMessage, JetStreamSubscription, JetStreamTransport, StreamSpec, SubscribeOptions,
    TransportConfig,
};
pub use publisher::{PublishAck, Publisher};
