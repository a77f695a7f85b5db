//! Publisher trait for emitting events to the bus.

use crate::error::TransportError;
use async_trait::async_trait;
use serde::Serialize;

/// Acknowledgment returned by the bus for a published message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishAck {
    /// Stream sequence assigned to the message.
    pub sequence: u64,
    /// True when the message id fell inside the stream's dedup window and
    /// the publish was a no-op.
    pub duplicate: bool,
}

/// Abstract publisher interface.
///
/// Handlers and reporters depend on this trait rather than on the concrete
/// JetStream transport, so tests can swap in an in-memory implementation.
///
/// `message_id` becomes the bus-level dedup key (`Nats-Msg-Id`): publishing
/// the same id twice within the stream's duplicate window is a no-op.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish a JSON payload to a subject with custom headers.
    ///
    /// All failures are returned as values; implementations never panic.
    async fn publish<T: Serialize + Send + Sync>(
        &self,
        subject: &str,
        message_id: &str,
        headers: &[(&str, String)],
        payload: &T,
    ) -> Result<PublishAck, TransportError>;
}
