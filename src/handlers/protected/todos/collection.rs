use axum::{extract::State, http::StatusCode, Extension, Json};

use crate::api::ApiJson;
use crate::database::models::Todo;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::CreateTodoRequest;
use crate::state::AppState;

/// GET /api/todos - All of the caller's todos, newest first
pub async fn todos_get(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.todos.list(&caller).await?;
    Ok(Json(todos))
}

/// POST /api/todos - Create a todo owned by the caller
///
/// Input: `{ "text": "Buy milk", "category": "shopping", "priority": "low" }`;
/// `category` and `priority` are optional. Any `owner` in the body is ignored.
pub async fn todos_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    ApiJson(request): ApiJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = state.todos.create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}
