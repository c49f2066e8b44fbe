// handlers/protected/todos/mod.rs - Owner-scoped todo CRUD
pub mod collection; // GET, POST /api/todos
pub mod record;     // PUT, DELETE /api/todos/:id

pub use collection::{todos_get, todos_post};
pub use record::{todo_delete, todo_put};
