// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here sits behind `jwt_auth_middleware`, which attaches an
// `AuthUser` to the request. Handlers take it as `Extension<AuthUser>` and hand
// it to the service layer explicitly.
pub mod auth;  // GET /api/auth/me
pub mod todos; // /api/todos, /api/todos/:id
