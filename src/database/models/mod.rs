pub mod todo;
pub mod user;

pub use todo::{Category, InvalidEnumValue, NewTodo, Priority, Todo, TodoPatch};
pub use user::{NewUser, User, UserInfo};
