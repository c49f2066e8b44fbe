use axum::{Extension, Json};

use crate::middleware::AuthUser;

/// GET /api/auth/me - Current authenticated user
pub async fn whoami_get(Extension(caller): Extension<AuthUser>) -> Json<AuthUser> {
    Json(caller)
}
