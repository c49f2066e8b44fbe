use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewTodo, NewUser, Todo, TodoPatch, User};

/// Persistence contract for todos. Every method that touches a single record
/// is keyed by `(id, owner)` together, so a record owned by someone else is
/// indistinguishable from a missing one.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos for `owner`, newest created first.
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError>;

    async fn insert(&self, owner: Uuid, todo: NewTodo) -> Result<Todo, DatabaseError>;

    /// Atomic find-and-modify matching `id AND owner`. `None` when nothing matched.
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: TodoPatch,
    ) -> Result<Option<Todo>, DatabaseError>;

    /// Atomic find-and-delete matching `id AND owner`. `false` when nothing matched.
    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `DatabaseError::Conflict` when the username is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
}
