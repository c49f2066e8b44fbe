use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewTodo, NewUser, Todo, TodoPatch, User};
use crate::database::repository::{TodoStore, UserStore};

/// In-process store for tests and database-less development runs.
///
/// Each mutation takes the write lock for its whole find-and-modify, which
/// gives the same single-record atomicity as the Postgres statements.
#[derive(Default)]
pub struct MemoryStore {
    todos: RwLock<HashMap<Uuid, Todo>>,
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a user record (used to exercise tokens whose subject is gone).
    pub async fn remove_user(&self, id: Uuid) -> bool {
        self.users.write().await.remove(&id).is_some()
    }

    pub async fn todo_count(&self) -> usize {
        self.todos.read().await.len()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError> {
        let todos = self.todos.read().await;
        let mut owned: Vec<Todo> = todos.values().filter(|t| t.owner == owner).cloned().collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn insert(&self, owner: Uuid, todo: NewTodo) -> Result<Todo, DatabaseError> {
        let now = Utc::now();
        let record = Todo {
            id: Uuid::new_v4(),
            text: todo.text,
            completed: false,
            category: todo.category,
            priority: todo.priority,
            owner,
            created_at: now,
            updated_at: now,
        };
        self.todos.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: TodoPatch,
    ) -> Result<Option<Todo>, DatabaseError> {
        let mut todos = self.todos.write().await;
        match todos.get_mut(&id) {
            Some(todo) if todo.owner == owner => {
                patch.apply_to(todo);
                todo.updated_at = Utc::now();
                Ok(Some(todo.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError> {
        let mut todos = self.todos.write().await;
        match todos.get(&id) {
            Some(todo) if todo.owner == owner => {
                todos.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(DatabaseError::Conflict(format!(
                "username '{}' is already taken",
                user.username
            )));
        }
        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Category, Priority};

    fn new_todo(text: &str) -> NewTodo {
        NewTodo {
            text: text.to_string(),
            category: Category::default(),
            priority: Priority::default(),
        }
    }

    #[tokio::test]
    async fn update_is_scoped_to_owner() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let todo = store.insert(alice, new_todo("a")).await.unwrap();

        let patch = TodoPatch { completed: Some(true), ..Default::default() };
        assert!(store.update_owned(todo.id, bob, patch.clone()).await.unwrap().is_none());

        let updated = store.update_owned(todo.id, alice, patch).await.unwrap().unwrap();
        assert!(updated.completed);
        assert_eq!(updated.owner, alice);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn delete_twice_reports_missing() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let todo = store.insert(owner, new_todo("a")).await.unwrap();
        store.insert(owner, new_todo("b")).await.unwrap();

        assert!(store.delete_owned(todo.id, owner).await.unwrap());
        assert_eq!(store.todo_count().await, 1);
        assert!(!store.delete_owned(todo.id, owner).await.unwrap());
        assert_eq!(store.todo_count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryStore::new();
        let user = NewUser { username: "alice".into(), password_hash: "x".into() };
        store.create_user(user.clone()).await.unwrap();
        let err = store.create_user(user).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }
}
