//! JetStream transport: bounded connect, dedup-windowed streams, durable
//! pull consumers with explicit ack/nak/term.

use crate::error::TransportError;
use crate::nats::config::{StreamSpec, SubscribeOptions, TransportConfig};
use crate::publisher::{PublishAck, Publisher};
use async_nats::jetstream::consumer::pull::Config as ConsumerConfig;
use async_nats::jetstream::consumer::{AckPolicy, Consumer};
use async_nats::jetstream::stream::Config as JsStreamConfig;
use async_nats::jetstream::Context;
use async_trait::async_trait;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Durable transport over NATS JetStream.
pub struct JetStreamTransport {
    client: async_nats::Client,
    jetstream: Context,
}

impl JetStreamTransport {
    /// Establish a connection with bounded attempts and a fixed wait
    /// between them. Fails fatally after exhausting the attempts.
    pub async fn connect(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut last_error = String::new();

        for attempt in 1..=config.connect_attempts {
            match async_nats::ConnectOptions::new()
                .name(&config.name)
                .connect(&config.url)
                .await
            {
                Ok(client) => {
                    info!(url = %config.url, attempt = attempt, "Connected to NATS");
                    let jetstream = async_nats::jetstream::new(client.clone());
                    return Ok(Self { client, jetstream });
                }
                Err(e) => {
                    warn!(
                        url = %config.url,
                        attempt = attempt,
                        max_attempts = config.connect_attempts,
                        error = %e,
                        "NATS connection attempt failed"
                    );
                    last_error = e.to_string();

                    if attempt < config.connect_attempts {
                        tokio::time::sleep(config.connect_retry_wait).await;
                    }
                }
            }
        }

        Err(TransportError::ConnectExhausted {
            attempts: config.connect_attempts,
            last_error,
        })
    }

    /// True while the underlying client connection is up.
    pub fn is_connected(&self) -> bool {
        self.client.connection_state() == async_nats::connection::State::Connected
    }

    /// Get the JetStream context for advanced operations.
    pub fn jetstream(&self) -> &Context {
        &self.jetstream
    }

    /// Ensure the stream exists, creating it if necessary.
    ///
    /// The created stream carries the spec's `duplicate_window`, so the bus
    /// suppresses republished message ids without any consumer involvement.
    pub async fn ensure_stream(&self, spec: &StreamSpec) -> Result<(), TransportError> {
        match self.jetstream.get_stream(&spec.name).await {
            Ok(_) => {
                debug!(stream = %spec.name, "Stream already exists");
                Ok(())
            }
            Err(_) => {
                info!(
                    stream = %spec.name,
                    subjects = ?spec.subjects,
                    dedup_window_secs = spec.duplicate_window.as_secs(),
                    "Creating stream"
                );

                self.jetstream
                    .create_stream(JsStreamConfig {
                        name: spec.name.clone(),
                        subjects: spec.subjects.clone(),
                        max_messages: spec.max_messages,
                        max_age: spec.max_age,
                        duplicate_window: spec.duplicate_window,
                        ..Default::default()
                    })
                    .await
                    .map_err(TransportError::from_jetstream_error)?;

                info!(stream = %spec.name, "Stream created");
                Ok(())
            }
        }
    }

    /// Bind (creating if absent) a durable pull consumer.
    pub async fn subscribe(
        &self,
        opts: SubscribeOptions,
    ) -> Result<JetStreamSubscription, TransportError> {
        let stream = self
            .jetstream
            .get_stream(&opts.stream)
            .await
            .map_err(TransportError::from_jetstream_error)?;

        let consumer = match stream
            .get_consumer::<ConsumerConfig>(&opts.durable_name)
            .await
        {
            Ok(consumer) => {
                debug!(consumer = %opts.durable_name, "Consumer already exists");
                consumer
            }
            Err(_) => {
                info!(
                    consumer = %opts.durable_name,
                    stream = %opts.stream,
                    subject = %opts.subject,
                    max_deliver = opts.max_deliver,
                    "Creating durable consumer"
                );

                stream
                    .create_consumer(ConsumerConfig {
                        durable_name: Some(opts.durable_name.clone()),
                        name: Some(opts.durable_name.clone()),
                        ack_policy: AckPolicy::Explicit,
                        ack_wait: opts.ack_wait,
                        max_deliver: opts.max_deliver,
                        filter_subject: opts.subject.clone(),
                        ..Default::default()
                    })
                    .await
                    .map_err(TransportError::from_jetstream_error)?
            }
        };

        Ok(JetStreamSubscription { consumer, opts })
    }
}

#[async_trait]
impl Publisher for JetStreamTransport {
    async fn publish<T: Serialize + Send + Sync>(
        &self,
        subject: &str,
        message_id: &str,
        headers: &[(&str, String)],
        payload: &T,
    ) -> Result<PublishAck, TransportError> {
        let body = serde_json::to_vec(payload)?;

        let mut header_map = async_nats::HeaderMap::new();
        // Nats-Msg-Id drives the stream's dedup window
        header_map.insert("Nats-Msg-Id", message_id);
        for (key, value) in headers {
            header_map.insert(*key, value.as_str());
        }

        let ack = self
            .jetstream
            .publish_with_headers(subject.to_string(), header_map, body.into())
            .await
            .map_err(|e| TransportError::publish_error(e.to_string()))?
            .await
            .map_err(|e| TransportError::publish_error(e.to_string()))?;

        debug!(
            subject = %subject,
            message_id = %message_id,
            sequence = ack.sequence,
            duplicate = ack.duplicate,
            "Published message"
        );

        Ok(PublishAck {
            sequence: ack.sequence,
            duplicate: ack.duplicate,
        })
    }
}

/// A durable pull-consumer subscription.
pub struct JetStreamSubscription {
    consumer: Consumer<ConsumerConfig>,
    opts: SubscribeOptions,
}

impl JetStreamSubscription {
    /// Fetch a batch of deliveries.
    ///
    /// Returns after `fetch_timeout` with whatever arrived (possibly
    /// nothing). Messages that fail to be received from the stream are
    /// logged and skipped.
    pub async fn fetch(&self) -> Result<Vec<DeliveredMessage>, TransportError> {
        let mut messages = self
            .consumer
            .fetch()
            .max_messages(self.opts.batch_size)
            .expires(self.opts.fetch_timeout)
            .messages()
            .await
            .map_err(TransportError::from_jetstream_error)?;

        let mut result = Vec::new();

        while let Some(msg) = messages.next().await {
            match msg {
                Ok(message) => {
                    let delivery_count = match message.info() {
                        Ok(info) => info.delivered as u32,
                        Err(e) => {
                            warn!(error = %e, "Failed to read message info, assuming first delivery");
                            1
                        }
                    };
                    result.push(DeliveredMessage {
                        message,
                        delivery_count,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Error receiving message");
                }
            }
        }

        Ok(result)
    }

    /// The subject this subscription filters on.
    pub fn subject(&self) -> &str {
        &self.opts.subject
    }

    /// The durable consumer name.
    pub fn durable_name(&self) -> &str {
        &self.opts.durable_name
    }
}

/// A message delivered from a durable consumer.
///
/// Must be resolved exactly once: `ack` after successful handling,
/// `nak_with_delay` to request bus-level redelivery (bounded by the
/// consumer's max_deliver), or `term` to drop it permanently.
pub struct DeliveredMessage {
    message: async_nats::jetstream::Message,
    /// Number of delivery attempts, starting at 1.
    pub delivery_count: u32,
}

impl DeliveredMessage {
    /// Deserialize the payload.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.message.payload)
    }

    /// Raw payload size in bytes.
    pub fn payload_size(&self) -> usize {
        self.message.payload.len()
    }

    /// Check if this is a redelivery.
    pub fn is_redelivery(&self) -> bool {
        self.delivery_count > 1
    }

    /// Acknowledge the message (successful processing).
    pub async fn ack(self) -> Result<(), TransportError> {
        self.message
            .ack()
            .await
            .map_err(|e| TransportError::consumer_error(e.to_string()))
    }

    /// Negative acknowledge with delay (request redelivery).
    pub async fn nak_with_delay(self, delay: Duration) -> Result<(), TransportError> {
        self.message
            .ack_with(async_nats::jetstream::AckKind::Nak(Some(delay)))
            .await
            .map_err(|e| TransportError::consumer_error(e.to_string()))
    }

    /// Mark as permanently failed (won't be redelivered).
    pub async fn term(self) -> Result<(), TransportError> {
        self.message
            .ack_with(async_nats::jetstream::AckKind::Term)
            .await
            .map_err(|e| TransportError::consumer_error(e.to_string()))
    }
}

// Note: real tests require a NATS server with JetStream enabled; config and
// error mapping are covered by unit tests in the sibling modules.
