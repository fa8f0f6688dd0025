//! Web layer module
//!
//! HTTP interface for sysdash: thin handlers over the shared sampler and
//! sample log, plus the WebSocket upgrade that owns each viewer session.
//! Errors are mapped to responses in `responses`; handlers stay free of
//! domain logic.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::repositories::SampleStore;
use crate::sampler::MetricSource;

pub mod api;
pub mod responses;
pub mod ws;

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(
        config: Config,
        sampler: Arc<dyn MetricSource>,
        sample_log: Arc<dyn SampleStore>,
    ) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        let app = Self::create_router(AppState {
            config,
            sampler,
            sample_log,
        });

        Ok(Self { app, addr })
    }

    /// Create the router with all routes and middleware. Public so tests can
    /// drive the routes without binding a socket.
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            // Health check endpoint
            .route("/health", get(api::health))
            // On-demand query and history
            .route("/api/system/stats", get(api::get_system_stats))
            .route("/api/system/logs", get(api::get_system_logs))
            // Streaming channel, one session loop per connection
            .route("/ws", get(ws::ws_handler))
            // Middleware (applied in reverse order)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            // Shared state
            .with_state(state)
    }

    /// Start the web server
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sampler: Arc<dyn MetricSource>,
    pub sample_log: Arc<dyn SampleStore>,
}
