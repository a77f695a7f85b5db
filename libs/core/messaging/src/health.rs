//! Health endpoints for K8s probes and operational monitoring.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Point-in-time health report.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub status: String,
    pub checks: HealthChecks,
}

/// Individual dependency checks.
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub transport: String,
    pub model: String,
}

/// Shared health state, updated by the worker as conditions change.
#[derive(Clone)]
pub struct HealthState {
    inner: Arc<RwLock<HealthStateInner>>,
}

struct HealthStateInner {
    transport_connected: bool,
    model_available: bool,
}

impl HealthState {
    /// Create new health state (optimistic defaults).
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HealthStateInner {
                transport_connected: true,
                model_available: true,
            })),
        }
    }

    /// Mark the transport as connected or disconnected.
    pub async fn set_transport_connected(&self, connected: bool) {
        let mut inner = self.inner.write().await;
        inner.transport_connected = connected;
    }

    /// Mark the extraction model as available or unavailable.
    pub async fn set_model_available(&self, available: bool) {
        let mut inner = self.inner.write().await;
        inner.model_available = available;
    }

    /// True when the transport connection is up.
    pub async fn transport_connected(&self) -> bool {
        self.inner.read().await.transport_connected
    }

    /// True when the model dependency is considered available.
    pub async fn model_available(&self) -> bool {
        self.inner.read().await.model_available
    }

    /// Aggregate verdict: transport down is unhealthy, model down degrades.
    pub async fn snapshot(&self) -> HealthSnapshot {
        let inner = self.inner.read().await;

        let status = if !inner.transport_connected {
            "unhealthy"
        } else if !inner.model_available {
            "degraded"
        } else {
            "healthy"
        };

        HealthSnapshot {
            status: status.to_string(),
            checks: HealthChecks {
                transport: if inner.transport_connected {
                    "ok".to_string()
                } else {
                    "disconnected".to_string()
                },
                model: if inner.model_available {
                    "ok".to_string()
                } else {
                    "unavailable".to_string()
                },
            },
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health server for K8s probes.
pub struct HealthServer {
    port: u16,
    state: HealthState,
    metrics_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
}

impl HealthServer {
    /// Create a new health server.
    pub fn new(port: u16) -> Self {
        Self {
            port,
            state: HealthState::new(),
            metrics_handle: None,
        }
    }

    /// Set the metrics handle for the /metrics endpoint.
    pub fn with_metrics(mut self, handle: metrics_exporter_prometheus::PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// Get the health state for updates.
    pub fn state(&self) -> HealthState {
        self.state.clone()
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let state = self.state.clone();
        let metrics_handle = self.metrics_handle.clone();

        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/healthz", get(health_handler))
            .route("/ready", get(ready_handler))
            .route("/readyz", get(ready_handler))
            .with_state(state);

        if let Some(handle) = metrics_handle {
            router = router.route(
                "/metrics",
                get(move || {
                    let handle = handle.clone();
                    async move { handle.render() }
                }),
            );
        }

        router
    }

    /// Run the health server.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let router = self.router();
        let addr = format!("0.0.0.0:{}", self.port);

        info!(addr = %addr, "Starting health server");

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

/// Liveness probe handler.
///
/// The process responding is enough for liveness; a transient NATS
/// disconnection should not trigger a pod restart. The snapshot still
/// carries the per-dependency checks for operators.
async fn health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.snapshot().await))
}

/// Readiness probe handler.
///
/// Not ready while the transport is disconnected.
async fn ready_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let snapshot = state.snapshot().await;
    if state.transport_connected().await {
        (StatusCode::OK, Json(snapshot))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(snapshot))
    }
}
