//! HTTP server implementation using Axum.

use axum::{
    Router,
    routing::{get, post},
};
use minibot_core::config::{GatewayConfig, MiniBotConfig};
use minibot_history::HistorySink;
use minibot_knowledge::Responder;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state for the gateway server.
#[derive(Clone)]
pub struct AppState {
    pub gateway_config: GatewayConfig,
    pub start_time: std::time::Instant,
    /// Corpus + matcher, built once at startup. Read-only.
    pub responder: Arc<Responder>,
    /// Conversation history sink — serializes its own writers.
    pub history: Arc<dyn HistorySink>,
}

impl AppState {
    pub fn new(
        gateway_config: GatewayConfig,
        responder: Responder,
        history: Arc<dyn HistorySink>,
    ) -> Self {
        Self {
            gateway_config,
            start_time: std::time::Instant::now(),
            responder: Arc::new(responder),
            history,
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    build_router_from_arc(Arc::new(state))
}

pub fn build_router_from_arc(shared: Arc<AppState>) -> Router {
    let cors = cors_layer(&shared.gateway_config);

    Router::new()
        .route("/ask", post(super::routes::ask))
        .route("/health", get(super::routes::health_check))
        .route("/api/v1/info", get(super::routes::system_info))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

/// CORS for browser clients on other origins.
///
/// `MINIBOT_CORS_ORIGINS` (comma-separated) wins over `gateway.cors_origins`;
/// with neither set, any origin is allowed.
fn cors_layer(config: &GatewayConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    let configured: Vec<String> = match std::env::var("MINIBOT_CORS_ORIGINS") {
        Ok(origins_str) => origins_str.split(',').map(|s| s.trim().to_string()).collect(),
        Err(_) => config.cors_origins.clone(),
    };

    let origins: Vec<axum::http::HeaderValue> = configured
        .iter()
        .filter(|s| !s.is_empty() && s.as_str() != "*")
        .filter_map(|s| s.parse().ok())
        .collect();

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

/// Start the HTTP server.
pub async fn start(
    config: &MiniBotConfig,
    responder: Responder,
    history: Arc<dyn HistorySink>,
) -> anyhow::Result<()> {
    tracing::info!(
        "📚 Knowledge base ready ({} questions, threshold > {})",
        responder.corpus().len(),
        responder.acceptance_threshold()
    );
    if responder.corpus().is_empty() {
        tracing::warn!("⚠️ Knowledge base is empty, every question gets the fallback answer");
    }

    let state = AppState::new(config.gateway.clone(), responder, history);
    let app = build_router(state);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🌐 Gateway server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
