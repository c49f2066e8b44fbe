use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::api::ApiJson;
use crate::database::models::Todo;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::UpdateTodoRequest;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeleteConfirmation {
    pub message: &'static str,
    pub id: Uuid,
}

/// Ids that are not UUIDs cannot match any record; report them as the usual 404.
fn parse_todo_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::todo_not_found())
}

/// PUT /api/todos/:id - Apply a partial update to one of the caller's todos
pub async fn todo_put(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_todo_id(&id)?;
    let todo = state.todos.update(&caller, id, request).await?;
    Ok(Json(todo))
}

/// DELETE /api/todos/:id - Permanently remove one of the caller's todos
pub async fn todo_delete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteConfirmation>, ApiError> {
    let id = parse_todo_id(&id)?;
    state.todos.delete(&caller, id).await?;
    Ok(Json(DeleteConfirmation {
        message: "Todo deleted",
        id,
    }))
}
