//! REST API and WebSocket server for the monitoring hub
//!
//! This module provides HTTP endpoints for draining alerts, synthesizing
//! readings and controlling location generators, plus a WebSocket stream that
//! pushes every generated sample to connected clients.
//!
//! ## Endpoints
//!
//! - `GET /` / `GET /about` - Plain-text banners
//! - `GET /api/health` - Health check
//! - `GET /api/alerts` - Pending alerts (drains them)
//! - `GET /api/readings` - Freshly synthesized readings for every location
//! - `GET /api/metrics` - Metric catalog
//! - `GET /api/stats` - Hub statistics
//! - `GET /api/locations` - Generator state per location
//! - `POST /api/locations/:location/start` - Start a location's generator
//! - `POST /api/locations/:location/stop` - Stop a location's generator
//! - `WS /api/stream` - Real-time `disaster_data` events

pub mod error;
pub mod routes;
pub mod state;
pub mod types;
pub mod websocket;

pub use error::{ApiError, ApiResult};
pub use state::ApiState;
pub use types::{
    AlertsResponse, HealthResponse, LocationsResponse, ReadingsResponse, StatsResponse,
    StreamEvent,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use tracing::info;

use crate::config::ApiSettings;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:5000")
    pub bind_addr: SocketAddr,

    /// Allow cross-origin requests from browser dashboards
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiSettings::default().into()
    }
}

impl From<ApiSettings> for ApiConfig {
    fn from(settings: ApiSettings) -> Self {
        Self {
            bind_addr: crate::util::resolve_bind_addr(settings.bind_addr),
            enable_cors: settings.enable_cors,
        }
    }
}

/// Build the router with all routes
pub fn router(state: ApiState, enable_cors: bool) -> Router {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    let mut app = Router::new()
        .route("/", get(routes::health::home))
        .route("/about", get(routes::health::about))
        .route("/api/health", get(routes::health::health_check))
        .route("/api/alerts", get(routes::alerts::get_alerts))
        .route("/api/readings", get(routes::readings::get_readings))
        .route("/api/metrics", get(routes::readings::list_metrics))
        .route("/api/stats", get(routes::stats::get_stats))
        .route("/api/locations", get(routes::locations::list_locations))
        .route(
            "/api/locations/:location/start",
            post(routes::locations::start_location),
        )
        .route(
            "/api/locations/:location/stop",
            post(routes::locations::stop_location),
        )
        .route("/api/stream", get(websocket::websocket_handler))
        .method_not_allowed_fallback(routes::method_not_allowed)
        .fallback(routes::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Spawn the API server
///
/// This starts an Axum HTTP server in a background task.
/// Returns the server's local address.
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    info!("starting API server on {}", config.bind_addr);

    let app = router(state, config.enable_cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(addr)
}
