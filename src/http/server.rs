//! Webhook server setup and handlers.
//!
//! # Responsibilities
//! - Create Axum Router for the event-delivery endpoint
//! - Answer the preflight probe before any payload parsing
//! - Decode delivered event batches and run the consumer per event
//! - Wire up middleware (tracing, timeout)
//!
//! # Design Decisions
//! - Preflight returns 200 + the trusted-origin header with an empty body and
//!   touches no payload; the consumer hook only supplies the origin value
//! - Delivery always answers 200 for well-formed JSON: linking failures are
//!   invisible to the event source, which must not redeliver over them
//! - Each delivered event runs under its own fresh consumer operation

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header::HeaderName, StatusCode},
    response::IntoResponse,
    routing::options,
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::channel::{self, TraceChannel};
use crate::config::AppConfig;
use crate::consumer;
use crate::events::EventEnvelope;
use crate::telemetry::LocalOperation;

/// Header carrying the trusted event origin on preflight responses.
static WEBHOOK_ALLOWED_ORIGIN: HeaderName = HeaderName::from_static("webhook-allowed-origin");

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub channel: Arc<dyn TraceChannel>,
}

/// HTTP server receiving event deliveries.
pub struct WebhookServer {
    router: Router,
    config: AppConfig,
}

impl WebhookServer {
    /// Create a new server with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        let state = AppState {
            channel: Arc::from(channel::from_mode(config.channel.mode)),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route(
                &config.webhook.path,
                options(preflight_handler).post(deliver_handler),
            )
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.webhook.timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            path = %self.config.webhook.path,
            channel = ?self.config.channel.mode,
            "Webhook server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Webhook server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Preflight probe: success status, trusted-origin header, empty body.
/// No payload is read, let alone parsed.
async fn preflight_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(WEBHOOK_ALLOWED_ORIGIN.clone(), consumer::preflight())],
        "",
    )
}

/// Event delivery: a JSON array of envelopes, each processed under its own
/// consumer operation.
async fn deliver_handler(
    State(state): State<AppState>,
    Json(events): Json<Vec<EventEnvelope>>,
) -> StatusCode {
    for envelope in &events {
        let op = LocalOperation::start();
        let linked = consumer::process_envelope(envelope, state.channel.as_ref(), &op);
        tracing::info!(
            event_id = %envelope.id,
            event_type = %envelope.event_type,
            subject = %envelope.subject,
            linked,
            "Processed upload event"
        );
    }
    StatusCode::OK
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
