//! Axum application builder.
//!
//! Configures routes, middleware, and state for the server.
//!
//! # Routes
//!
//! - `GET /ws` - WebSocket endpoint for game clients
//! - `GET /health` - Liveness probe
//! - `GET /api/stats` - Table size, exploration rate, counters
//! - `POST /api/save` - Persist the table now
//! - `GET /api/states/{key}` - One state's action values

use axum::Router;
use axum::routing::{get, post};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes::{api, health, ws};
use crate::state::ServerState;

/// Create the Axum application with all routes.
pub fn create_app(state: ServerState) -> Router {
    // Inspection endpoints are read from browser dashboards
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(ws::ws_handler))
        // Health endpoint
        .route("/health", get(health::health))
        // Inspection API
        .route("/api/stats", get(api::get_stats))
        .route("/api/save", post(api::post_save))
        .route("/api/states/{key}", get(api::get_state))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // State
        .with_state(state)
}

/// Server listen configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host to bind to.
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".into(),
        }
    }
}

impl ServerConfig {
    /// Get bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::Coordinator;
    use learning::{LearningConfig, MemoryStore};
    use std::sync::Arc;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_create_app() {
        let coordinator = Coordinator::new(LearningConfig::default(), Arc::new(MemoryStore::new()));
        let state = ServerState::new(Arc::new(coordinator));

        let _app = create_app(state);
        // App created successfully
    }
}
