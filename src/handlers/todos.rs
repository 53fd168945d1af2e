// Todo handlers
// HTTP handlers for todo CRUD operations

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    error::ApiError,
    models::{TodoList, TodoRequest},
    AppState,
};

/// Validate a create/update body against the configured status set
/// and return the normalized `(title, status)` pair.
fn accept_request(
    state: &AppState,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<(String, String), ApiError> {
    let Json(request) = payload?;
    request.validate(&state.statuses).map_err(ApiError::validation)?;
    Ok((request.get_normalized_title(), request.get_normalized_status()))
}

/// List every todo
/// GET /todos
pub async fn list_todos(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching all todos");

    let todos = state.store.list_todos().await?;

    info!("Retrieved {} todos", todos.len());
    Ok((StatusCode::OK, Json(TodoList { todos })))
}

/// Create a todo
/// POST /todos
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let (title, status) = accept_request(&state, payload)?;
    info!("Creating todo with title: {} and status: {}", title, status);

    let todo = state.store.create_todo(&title, &status).await?;

    info!("Successfully created todo with id: {}", todo.id);
    Ok((StatusCode::OK, Json(todo)))
}

/// Replace title and status of an existing todo
/// PUT /todos/:id
pub async fn update_todo(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;
    let (title, status) = accept_request(&state, payload)?;
    info!("Updating todo with id: {}", id);

    let todo = state.store.update_todo(id, &title, &status).await?;

    info!("Successfully updated todo with id: {}", id);
    Ok((StatusCode::OK, Json(todo)))
}

/// Delete a todo and return what it held
/// DELETE /todos/:id
pub async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;
    info!("Deleting todo with id: {}", id);

    let todo = state.store.delete_todo(id).await?;

    info!("Successfully deleted todo with id: {}", id);
    Ok((StatusCode::OK, Json(todo)))
}
