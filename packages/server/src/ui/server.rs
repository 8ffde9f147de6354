//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{config::ServerConfig, infrastructure::Hub};

use super::{
    handler::{
        http::{get_room_detail, get_rooms, health_check},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Room broadcast server
///
/// # Example
///
/// ```ignore
/// let config = ServerConfig::default();
/// let hub = Hub::spawn(&config);
/// Server::new(hub, config).run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    hub: Hub,
    config: ServerConfig,
}

impl Server {
    pub fn new(hub: Hub, config: ServerConfig) -> Self {
        Self { hub, config }
    }

    /// Router serving `/ws` and the HTTP API
    pub fn router(&self) -> Router {
        build_router(Arc::new(AppState {
            hub: self.hub.clone(),
            config: self.config.clone(),
        }))
    }

    /// Run the server until Ctrl+C / SIGTERM
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Room broadcast server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Build the application router around shared state
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{name}", get(get_room_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
