//! API error type and its translation to HTTP responses.
//!
//! Store errors map onto three client-visible shapes: not-found (404),
//! validation failure (422, with the `"Validation Failed"` envelope the
//! clients expect), and an opaque 500 for everything else. Internal
//! details never leak into 500 bodies; they are logged instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use agenda_tasks::TaskError;

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Requested task does not exist or is soft-deleted.
    #[error("task not found")]
    NotFound,

    /// Request payload or parameters failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unexpected store failure.
    #[error(transparent)]
    Store(TaskError),
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::TaskNotFound(_) => Self::NotFound,
            TaskError::InvalidArgument(message) => Self::Validation(message),
            other => Self::Store(other),
        }
    }
}

impl ApiError {
    /// Wrap a `spawn_blocking` join failure.
    pub(crate) fn blocking_task(err: tokio::task::JoinError) -> Self {
        Self::Store(TaskError::Internal(format!("blocking task failed: {err}")))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": "Task not found" })),
            )
                .into_response(),
            Self::Validation(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": "Validation Failed", "detail": detail })),
            )
                .into_response(),
            Self::Store(err) => {
                tracing::error!(error = %err, "task store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
