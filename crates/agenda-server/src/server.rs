//! `Server` — Axum HTTP server for the task API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use agenda_tasks::ConnectionPool;

use crate::config::ServerConfig;
use crate::health::{self, HealthResponse};
use crate::routes;
use crate::shutdown::ShutdownCoordinator;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// `SQLite` connection pool.
    pub pool: ConnectionPool,
    /// When the server started.
    pub start_time: Instant,
}

/// The task API server.
pub struct Server {
    config: ServerConfig,
    pool: ConnectionPool,
    shutdown: Arc<ShutdownCoordinator>,
    start_time: Instant,
}

impl Server {
    /// Create a new server over an already-migrated pool.
    pub fn new(config: ServerConfig, pool: ConnectionPool) -> Self {
        Self {
            config,
            pool,
            shutdown: Arc::new(ShutdownCoordinator::new()),
            start_time: Instant::now(),
        }
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        let state = AppState {
            pool: self.pool.clone(),
            start_time: self.start_time,
        };

        Router::new()
            .route("/health", get(health_handler))
            .route(
                "/api/v1/tasks",
                get(routes::list_tasks).post(routes::create_task),
            )
            .route(
                "/api/v1/tasks/{id}",
                get(routes::get_task)
                    .patch(routes::patch_task)
                    .delete(routes::delete_task),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Bind the configured address and start serving in a background task.
    ///
    /// Returns the bound address (useful with port 0) and the join handle
    /// of the serve loop. The loop exits when [`Self::shutdown`] fires.
    pub async fn listen(&self) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;

        let app = self.router();
        let token = self.shutdown.token();
        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await;
            if let Err(err) = result {
                tracing::error!(error = %err, "server error");
            }
        });

        Ok((local_addr, handle))
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(state.start_time))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
