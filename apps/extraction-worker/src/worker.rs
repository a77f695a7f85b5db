//! Bus consumption loop: fetch batches from the durable consumer, spawn a
//! task per delivery, and resolve each delivery (ack / nak / term) from the
//! orchestrator's verdict.

use crate::metrics::WorkerMetrics;
use crate::orchestrator::JobOrchestrator;
use domain_extraction::{ModelClient, SubmissionEvent};
use messaging::{
    ErrorCategory, HealthState, JetStreamSubscription, JetStreamTransport, TransportError,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Consumes `job.jd.submitted` and drives the orchestrator.
///
/// Concurrency is bounded by the orchestrator's admission check, not a
/// semaphore: deliveries beyond the in-flight ceiling are naked back to the
/// bus with a delay.
pub struct SubmissionWorker<C: ModelClient + 'static> {
    transport: Arc<JetStreamTransport>,
    subscription: JetStreamSubscription,
    orchestrator: Arc<JobOrchestrator<JetStreamTransport, C>>,
    health: HealthState,
    metrics: WorkerMetrics,
}

impl<C: ModelClient + 'static> SubmissionWorker<C> {
    pub fn new(
        transport: Arc<JetStreamTransport>,
        subscription: JetStreamSubscription,
        orchestrator: Arc<JobOrchestrator<JetStreamTransport, C>>,
        health: HealthState,
        metrics: WorkerMetrics,
    ) -> Self {
        Self {
            transport,
            subscription,
            orchestrator,
            health,
            metrics,
        }
    }

    /// Run the worker loop until the shutdown signal fires, then drain
    /// in-flight handler tasks.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), TransportError> {
        info!(
            subject = %self.subscription.subject(),
            durable = %self.subscription.durable_name(),
            "Starting submission worker"
        );

        let mut tasks: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping worker");
                        break;
                    }
                }

                result = self.process_batch(&mut tasks) => {
                    if let Err(e) = result {
                        error!(error = %e, "Error processing batch");
                        self.health
                            .set_transport_connected(self.transport.is_connected())
                            .await;
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        }

        info!(pending = tasks.len(), "Draining in-flight handler tasks");
        while tasks.join_next().await.is_some() {}

        info!("Submission worker stopped");
        Ok(())
    }

    /// Fetch one batch and spawn a handler task per delivery.
    async fn process_batch(&self, tasks: &mut JoinSet<()>) -> Result<(), TransportError> {
        // Reap finished handler tasks without blocking
        while tasks.try_join_next().is_some() {}

        let messages = self.subscription.fetch().await?;
        self.health
            .set_transport_connected(self.transport.is_connected())
            .await;

        for message in messages {
            self.metrics.job_received();

            if message.is_redelivery() {
                debug!(
                    delivery_count = message.delivery_count,
                    "Processing redelivered message"
                );
            }

            let event: SubmissionEvent = match message.parse() {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "Undeliverable submission payload, terminating message");
                    if let Err(term_err) = message.term().await {
                        error!(error = %term_err, "Failed to terminate bad message");
                    }
                    continue;
                }
            };

            let orchestrator = self.orchestrator.clone();
            let delivery_count = message.delivery_count;

            tasks.spawn(async move {
                let job_id = event.job_id.clone();

                match orchestrator.handle_submission(event).await {
                    Ok(()) => {
                        if let Err(e) = message.ack().await {
                            error!(job_id = %job_id, error = %e, "Failed to ACK message");
                        }
                    }
                    Err(err) => match err.category() {
                        ErrorCategory::Permanent => {
                            warn!(job_id = %job_id, error = %err, "Terminating delivery");
                            if let Err(e) = message.term().await {
                                error!(job_id = %job_id, error = %e, "Failed to terminate message");
                            }
                        }
                        ErrorCategory::Transient | ErrorCategory::RateLimited => {
                            let delay =
                                Duration::from_millis(err.backoff_delay_ms(delivery_count));
                            debug!(
                                job_id = %job_id,
                                delay_ms = delay.as_millis() as u64,
                                error = %err,
                                "Requeueing delivery with delay"
                            );
                            if let Err(e) = message.nak_with_delay(delay).await {
                                error!(job_id = %job_id, error = %e, "Failed to NAK message");
                            }
                        }
                    },
                }
            });
        }

        Ok(())
    }
}
