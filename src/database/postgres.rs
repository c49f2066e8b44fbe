use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{NewTodo, NewUser, Todo, TodoPatch, User};
use crate::database::repository::{TodoStore, UserStore};

const TODO_COLUMNS: &str =
    "id, owner_id, text, completed, category, priority, created_at, updated_at";

/// Row shape of the `todos` table; enum columns come back as text.
#[derive(Debug, FromRow)]
struct TodoRow {
    id: Uuid,
    owner_id: Uuid,
    text: String,
    completed: bool,
    category: String,
    priority: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = DatabaseError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse()
            .map_err(|e| DatabaseError::Corrupt(format!("todo {}: {}", row.id, e)))?;
        let priority = row
            .priority
            .parse()
            .map_err(|e| DatabaseError::Corrupt(format!("todo {}: {}", row.id, e)))?;

        Ok(Todo {
            id: row.id,
            text: row.text,
            completed: row.completed,
            category,
            priority,
            owner: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Postgres-backed store for todos and users.
#[derive(Clone)]
pub struct PgStore {
    db: DatabaseManager,
}

impl PgStore {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError> {
        let query = format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, TodoRow>(&query)
            .bind(owner)
            .fetch_all(self.db.pool())
            .await?;
        rows.into_iter().map(Todo::try_from).collect()
    }

    async fn insert(&self, owner: Uuid, todo: NewTodo) -> Result<Todo, DatabaseError> {
        let query = format!(
            "INSERT INTO todos (id, owner_id, text, category, priority) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TODO_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TodoRow>(&query)
            .bind(Uuid::new_v4())
            .bind(owner)
            .bind(&todo.text)
            .bind(todo.category.as_str())
            .bind(todo.priority.as_str())
            .fetch_one(self.db.pool())
            .await?;
        row.try_into()
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: TodoPatch,
    ) -> Result<Option<Todo>, DatabaseError> {
        // Single conditional write: ownership, existence and mutation in one statement.
        let query = format!(
            "UPDATE todos SET \
                text = COALESCE($3, text), \
                completed = COALESCE($4, completed), \
                category = COALESCE($5, category), \
                priority = COALESCE($6, priority), \
                updated_at = now() \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {TODO_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TodoRow>(&query)
            .bind(id)
            .bind(owner)
            .bind(patch.text.as_deref())
            .bind(patch.completed)
            .bind(patch.category.map(|c| c.as_str()))
            .bind(patch.priority.map(|p| p.as_str()))
            .fetch_optional(self.db.pool())
            .await?;
        row.map(Todo::try_from).transpose()
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError> {
        let deleted = sqlx::query_scalar::<_, Uuid>(
            "DELETE FROM todos WHERE id = $1 AND owner_id = $2 RETURNING id",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(deleted.is_some())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, username, password_hash, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(self.db.pool())
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                DatabaseError::Conflict(format!("username '{}' is already taken", user.username)),
            ),
            Err(other) => Err(other.into()),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at, updated_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(user)
    }
}
