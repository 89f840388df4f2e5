//! Background task handlers.

use super::ProgressResponse;
use crate::api::AppState;
use crate::error::Error;
use crate::types::{TaskId, TaskStatus};
use axum::{
    Json,
    extract::{Path, State},
};

/// GET /tasks/:id/progress - Last recorded progress
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}/progress",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Progress 0-100; unknown tasks report 0", body = ProgressResponse)
    )
)]
pub async fn task_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ProgressResponse> {
    let progress = state.library.poll_progress(&TaskId(id)).await;
    Json(ProgressResponse { progress })
}

/// GET /tasks/:id - Progress, state and timing of a task
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task status", body = TaskStatus),
        (status = 404, description = "Unknown or pruned task", body = crate::error::ApiError)
    )
)]
pub async fn task_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskStatus>, Error> {
    let task_id = TaskId(id);
    state
        .library
        .task_status(&task_id)
        .await
        .map(Json)
        .ok_or_else(|| Error::NotFound(format!("task {}", task_id)))
}
