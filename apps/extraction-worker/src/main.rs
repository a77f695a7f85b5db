//! Job-description extraction worker.
//!
//! Consumes `job.jd.submitted` from NATS JetStream, extracts structured
//! requirements through the external model (with rule-based fallback), and
//! publishes `analysis.jd.extracted` or `job.jd.failed`.

mod config;
mod metrics;
mod orchestrator;
mod reporter;
mod worker;

use crate::config::{Config, JD_ANALYSIS_STREAM, JD_JOBS_STREAM, SOURCE_NAME};
use crate::metrics::WorkerMetrics;
use crate::orchestrator::{JobOrchestrator, OrchestratorConfig};
use crate::worker::SubmissionWorker;
use core_config::Environment;
use domain_extraction::{subjects, ExtractionAdapter, HttpModelClient};
use eyre::{Result, WrapErr};
use messaging::{
    HealthServer, JetStreamTransport, StreamSpec, SubscribeOptions, TransportConfig,
};
use resilience::{retry_with_backoff, CircuitBreaker, CircuitBreakerConfig, RetryPolicy};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    let metrics_handle = metrics::init_metrics();

    info!(
        name = SOURCE_NAME,
        version = env!("CARGO_PKG_VERSION"),
        environment = ?environment,
        "Starting extraction worker"
    );

    let config = Config::from_env();

    // Connect to NATS with bounded attempts
    let transport_config = TransportConfig::new(&config.nats_url)
        .with_name(SOURCE_NAME)
        .with_connect_attempts(config.connect_attempts)
        .with_connect_retry_wait(config.connect_retry_wait);

    let transport = Arc::new(
        JetStreamTransport::connect(&transport_config)
            .await
            .wrap_err_with(|| format!("Failed to connect to NATS at {}", config.nats_url))?,
    );

    // Ensure streams exist with message-id dedup windows. Provisioning can
    // race a server that just came up, so it gets a short backoff retry.
    let provision_policy = RetryPolicy::new()
        .with_max_attempts(3)
        .with_base_delay(500)
        .with_max_delay(2000);

    let jobs_spec = StreamSpec::new(JD_JOBS_STREAM, vec!["job.jd.>".to_string()]);
    retry_with_backoff(|| transport.ensure_stream(&jobs_spec), &provision_policy)
        .await
        .wrap_err("Failed to ensure jobs stream")?;

    let analysis_spec = StreamSpec::new(JD_ANALYSIS_STREAM, vec!["analysis.jd.>".to_string()]);
    retry_with_backoff(|| transport.ensure_stream(&analysis_spec), &provision_policy)
        .await
        .wrap_err("Failed to ensure analysis stream")?;

    // Assemble the dependency graph explicitly: transport, model client,
    // breaker, adapter, orchestrator
    let model_client = Arc::new(
        HttpModelClient::new(
            &config.model_url,
            config.model_api_key.clone(),
            config.model_timeout,
        )
        .map_err(|e| eyre::eyre!("Failed to build model client: {}", e))?,
    );

    let breaker = Arc::new(CircuitBreaker::new(
        CircuitBreakerConfig::new()
            .with_failure_threshold(config.breaker_failure_threshold)
            .with_cooldown(config.breaker_cooldown),
    ));

    let adapter = ExtractionAdapter::new(model_client, breaker);

    let retry_policy = RetryPolicy::new()
        .with_max_attempts(config.max_job_attempts)
        .with_base_delay(config.retry_base_delay_ms)
        .with_max_delay(config.retry_max_delay_ms)
        .with_jitter(config.retry_jitter_ms);

    let orchestrator_config = OrchestratorConfig {
        max_in_flight: config.max_in_flight,
        max_job_attempts: config.max_job_attempts,
        job_timeout: config.job_timeout,
        requeue_delay: config.requeue_delay,
        source_name: SOURCE_NAME.to_string(),
    };

    // Health server and shared health state
    let health_server = HealthServer::new(config.health_port).with_metrics(metrics_handle);
    let health = health_server.state();

    tokio::spawn(async move {
        if let Err(e) = health_server.run().await {
            error!(error = %e, "Health server failed");
        }
    });

    let worker_metrics = WorkerMetrics::new(subjects::JD_SUBMITTED);

    let orchestrator = Arc::new(JobOrchestrator::new(
        transport.clone(),
        adapter,
        retry_policy,
        orchestrator_config,
        health.clone(),
        worker_metrics.clone(),
    ));

    // Durable consumer: fixed name per deployment so replicas load-balance
    let subscription = transport
        .subscribe(
            SubscribeOptions::new(JD_JOBS_STREAM, subjects::JD_SUBMITTED, &config.durable_name)
                .with_max_deliver(config.max_deliver)
                .with_ack_wait(config.ack_wait)
                .with_batch_size(config.batch_size)
                .with_fetch_timeout(config.fetch_timeout),
        )
        .await
        .wrap_err("Failed to create durable consumer")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if let Err(e) = shutdown_signal().await {
            error!(error = %e, "Error waiting for shutdown signal");
        }
        let _ = shutdown_tx.send(true);
    });

    let worker = SubmissionWorker::new(
        transport,
        subscription,
        orchestrator,
        health,
        worker_metrics,
    );

    worker
        .run(shutdown_rx)
        .await
        .map_err(|e| eyre::eyre!("{}", e))?;

    info!("Extraction worker stopped");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        },
    }

    Ok(())
}
