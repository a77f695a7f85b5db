//! NATS JetStream implementation of the transport.

mod config;
mod transport;

pub use config::{StreamSpec, SubscribeOptions, TransportConfig};
pub use transport::{DeliveredMessage, JetStreamSubscription, JetStreamTransport};
