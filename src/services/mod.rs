pub mod auth_service;
pub mod todo_service;

pub use auth_service::{AuthService, Credentials, TokenResponse};
pub use todo_service::{CreateTodoRequest, TodoService, UpdateTodoRequest};
