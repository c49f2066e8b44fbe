use std::any::Any;

use axum::{
    http::{HeaderValue, Method, header},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{catch_panic::CatchPanicLayer, cors::{AllowOrigin, CorsLayer}, trace::TraceLayer};

use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full application router with state applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", api_routes(state.clone()))
        .fallback(fallback)
        .with_state(state)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(auth_public_routes())
        .merge(protected_routes(state))
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, todos};

    Router::new()
        .route("/auth/me", get(auth::whoami_get))
        .route("/todos", get(todos::todos_get).post(todos::todos_post))
        .route("/todos/:id", put(todos::todo_put).delete(todos::todo_delete))
        // route_layer so unknown paths still 404 instead of 401
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

/// CORS for the browser client. A `*` entry allows any origin; origins that are
/// not valid header values are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Todo Tracker API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "public_auth": "/api/auth/register, /api/auth/login (public - token acquisition)",
            "auth": "/api/auth/me (protected)",
            "todos": "/api/todos[/:id] (protected)",
            "health": "/health (public)",
        }
    }))
}

async fn health(axum::extract::State(state): axum::extract::State<AppState>) -> Response {
    let now = chrono::Utc::now();

    match state.health_check().await {
        Ok(_) => Json(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
                .into_response()
        }
    }
}

async fn fallback() -> ApiError {
    ApiError::not_found("Route not found")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!("Handler panicked: {}", detail);
    ApiError::internal_server_error("Something went wrong!").into_response()
}
