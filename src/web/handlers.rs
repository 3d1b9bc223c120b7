//! HTTP request handlers

use super::error::ApiError;
use super::state::AppState;
use crate::search::TagQuery;
use crate::todos::Todo;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

/// Query parameters for tag search
#[derive(Debug, Deserialize)]
pub struct TagSearchParams {
    /// Tags (comma-separated)
    pub q: Option<String>,
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "storage": state.backend(),
    }))
}

/// List every todo
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let all = state
        .todos
        .list_all()
        .await
        .map_err(|e| ApiError::from_todo_error(e, "error listing todos"))?;
    Ok(Json(all))
}

/// Create a todo; the response carries the assigned id
pub async fn create_todo(
    State(state): State<AppState>,
    Json(todo): Json<Todo>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .todos
        .add(todo)
        .await
        .map_err(|e| ApiError::from_todo_error(e, "todo not saved"))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Fetch a todo by id
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state
        .todos
        .find_by_id(&id)
        .await
        .map_err(|e| ApiError::from_todo_error(e, "error fetching todo"))?;
    Ok(Json(todo))
}

/// Replace a todo's title, tags and completion time
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(todo): Json<Todo>,
) -> Result<Json<Todo>, ApiError> {
    let updated = state
        .todos
        .update(&id, todo)
        .await
        .map_err(|e| ApiError::from_todo_error(e, "todo not updated"))?;
    Ok(Json(updated))
}

/// Delete a todo
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .todos
        .delete(&id)
        .await
        .map_err(|e| ApiError::from_todo_error(e, "todo not deleted"))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a todo as completed
pub async fn complete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let completed = state
        .todos
        .complete(&id)
        .await
        .map_err(|e| ApiError::from_todo_error(e, "todo not completed"))?;
    Ok(Json(completed))
}

/// Search todos by a comma separated list of tags in `q`
pub async fn search_by_tags(
    State(state): State<AppState>,
    Query(params): Query<TagSearchParams>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let query = params
        .q
        .as_deref()
        .map(TagQuery::from_param)
        .ok_or_else(|| ApiError::bad_request("provide a list of tags in the q query parameter"))?;

    let found = state
        .todos
        .find_by_tags(query.tags.as_slice())
        .await
        .map_err(|e| ApiError::from_todo_error(e, "error searching by tags"))?;
    Ok(Json(found))
}
