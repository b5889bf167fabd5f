//! REST handlers for `/api/v1/tasks`.
//!
//! Each handler validates its input, takes a pooled connection inside
//! `spawn_blocking`, and runs one store call. Store errors convert into
//! [`ApiError`] via `From`, so the `?` operator carries the status
//! mapping.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tokio::task::spawn_blocking;

use agenda_tasks::{Task, TaskError, TaskPage, TaskService};

use crate::error::ApiError;
use crate::schemas::{ListParams, PaginatedTasks, TaskCreate, TaskUpdate};
use crate::server::AppState;

/// `GET /api/v1/tasks`
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedTasks>, ApiError> {
    let query = params.into_query().map_err(ApiError::Validation)?;
    let (limit, offset) = (query.limit, query.offset);

    let pool = state.pool.clone();
    let page = spawn_blocking(move || -> Result<TaskPage, TaskError> {
        let conn = pool.get()?;
        TaskService::list(&conn, &query)
    })
    .await
    .map_err(ApiError::blocking_task)??;

    Ok(Json(PaginatedTasks {
        total: page.total,
        limit,
        offset,
        items: page.items,
    }))
}

/// `POST /api/v1/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskCreate>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let new_task = payload.into_new_task();

    let pool = state.pool.clone();
    let task = spawn_blocking(move || -> Result<Task, TaskError> {
        let mut conn = pool.get()?;
        TaskService::create(&mut conn, &new_task)
    })
    .await
    .map_err(ApiError::blocking_task)??;

    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /api/v1/tasks/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    let pool = state.pool.clone();
    let task = spawn_blocking(move || -> Result<Task, TaskError> {
        let conn = pool.get()?;
        TaskService::get(&conn, id)
    })
    .await
    .map_err(ApiError::blocking_task)??;

    Ok(Json(task))
}

/// `PATCH /api/v1/tasks/{id}`
pub async fn patch_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TaskUpdate>,
) -> Result<Json<Task>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let patch = payload.into_patch();

    let pool = state.pool.clone();
    let task = spawn_blocking(move || -> Result<Task, TaskError> {
        let mut conn = pool.get()?;
        TaskService::update(&mut conn, id, &patch)
    })
    .await
    .map_err(ApiError::blocking_task)??;

    Ok(Json(task))
}

/// `DELETE /api/v1/tasks/{id}`
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let pool = state.pool.clone();
    spawn_blocking(move || -> Result<(), TaskError> {
        let mut conn = pool.get()?;
        TaskService::delete(&mut conn, id)
    })
    .await
    .map_err(ApiError::blocking_task)??;

    Ok(StatusCode::NO_CONTENT)
}
