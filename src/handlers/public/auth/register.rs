// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::{extract::State, http::StatusCode, Json};

use crate::api::ApiJson;
use crate::error::ApiError;
use crate::services::{Credentials, TokenResponse};
use crate::state::AppState;

/// POST /api/auth/register - Create an account and receive a JWT
///
/// Input: `{ "username": "alice", "password": "..." }`
///
/// Errors:
/// - 400 username/password rules not met
/// - 403 registration disabled by configuration
/// - 409 username already taken
pub async fn register_post(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let response = state.auth.register(credentials).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
