//! # agenda-server
//!
//! Axum HTTP server exposing the versioned task API.
//!
//! - REST endpoints under `/api/v1/tasks`: list (filtered, sorted,
//!   paginated), create, fetch, patch, delete
//! - Request schemas re-validate payloads before they reach the store
//! - Error translation: not-found → 404, validation → 422, the rest → 500
//! - `/health` endpoint and graceful shutdown via `CancellationToken`
//!
//! Handlers bridge to the blocking `SQLite` store through
//! `tokio::task::spawn_blocking`, one pooled connection per request.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod health;
pub mod routes;
pub mod schemas;
pub mod server;
pub mod shutdown;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server::{AppState, Server};
pub use shutdown::ShutdownCoordinator;
