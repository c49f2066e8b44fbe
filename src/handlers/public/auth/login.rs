// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{extract::State, Json};

use crate::api::ApiJson;
use crate::error::ApiError;
use crate::services::{Credentials, TokenResponse};
use crate::state::AppState;

/// POST /api/auth/login - Authenticate and receive a JWT
///
/// Input: `{ "username": "alice", "password": "..." }`
///
/// Output: `{ "token": "eyJ...", "user": { "id", "username" }, "expires_in": 604800 }`
///
/// Unknown usernames and wrong passwords both yield the same 401.
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    let response = state.auth.login(credentials).await?;
    tracing::info!("User {} logged in", response.user.username);
    Ok(Json(response))
}
