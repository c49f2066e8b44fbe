use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{Category, InvalidEnumValue, NewTodo, Priority, Todo, TodoPatch};
use crate::database::repository::TodoStore;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Body of `POST /api/todos`. Unknown fields such as `owner` are ignored.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// Body of `PUT /api/todos/:id`. Absent (or null) fields are left untouched.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateTodoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

fn validate_text(text: &str) -> Result<String, ApiError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ApiError::invalid_field("text", "Text cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn parse_category(raw: &str) -> Result<Category, ApiError> {
    raw.parse()
        .map_err(|e: InvalidEnumValue| ApiError::invalid_field("category", e.to_string()))
}

fn parse_priority(raw: &str) -> Result<Priority, ApiError> {
    raw.parse()
        .map_err(|e: InvalidEnumValue| ApiError::invalid_field("priority", e.to_string()))
}

impl CreateTodoRequest {
    pub fn validate(self) -> Result<NewTodo, ApiError> {
        let text = match self.text.as_deref() {
            Some(text) => validate_text(text)?,
            None => return Err(ApiError::invalid_field("text", "Text is required")),
        };
        let category = self.category.as_deref().map(parse_category).transpose()?;
        let priority = self.priority.as_deref().map(parse_priority).transpose()?;

        Ok(NewTodo {
            text,
            category: category.unwrap_or_default(),
            priority: priority.unwrap_or_default(),
        })
    }
}

impl UpdateTodoRequest {
    pub fn validate(self) -> Result<TodoPatch, ApiError> {
        Ok(TodoPatch {
            text: self.text.as_deref().map(validate_text).transpose()?,
            completed: self.completed,
            category: self.category.as_deref().map(parse_category).transpose()?,
            priority: self.priority.as_deref().map(parse_priority).transpose()?,
        })
    }
}

/// Owner-scoped todo operations. The caller is always passed in explicitly.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, caller: &AuthUser) -> Result<Vec<Todo>, ApiError> {
        Ok(self.store.list_for_owner(caller.id).await?)
    }

    pub async fn create(&self, caller: &AuthUser, request: CreateTodoRequest) -> Result<Todo, ApiError> {
        let new_todo = request.validate()?;
        let todo = self.store.insert(caller.id, new_todo).await?;
        tracing::debug!("User {} created todo {}", caller.id, todo.id);
        Ok(todo)
    }

    pub async fn update(
        &self,
        caller: &AuthUser,
        id: Uuid,
        request: UpdateTodoRequest,
    ) -> Result<Todo, ApiError> {
        let patch = request.validate()?;
        self.store
            .update_owned(id, caller.id, patch)
            .await?
            .ok_or_else(ApiError::todo_not_found)
    }

    pub async fn delete(&self, caller: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        if self.store.delete_owned(id, caller.id).await? {
            tracing::debug!("User {} deleted todo {}", caller.id, id);
            Ok(())
        } else {
            Err(ApiError::todo_not_found())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use axum::http::StatusCode;

    fn caller(name: &str) -> AuthUser {
        AuthUser { id: Uuid::new_v4(), username: name.to_string() }
    }

    fn service() -> (TodoService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (TodoService::new(store.clone()), store)
    }

    fn create_req(text: &str) -> CreateTodoRequest {
        CreateTodoRequest { text: Some(text.to_string()), ..Default::default() }
    }

    #[tokio::test]
    async fn create_applies_defaults_and_owner() {
        let (service, _) = service();
        let alice = caller("alice");
        let todo = service.create(&alice, create_req("  Buy milk  ")).await.unwrap();
        assert_eq!(todo.text, "Buy milk");
        assert_eq!(todo.category, Category::Other);
        assert_eq!(todo.priority, Priority::Medium);
        assert!(!todo.completed);
        assert_eq!(todo.owner, alice.id);
    }

    #[tokio::test]
    async fn create_rejects_blank_text_and_bad_enums() {
        let (service, store) = service();
        let alice = caller("alice");

        for request in [
            create_req("   "),
            CreateTodoRequest::default(),
            CreateTodoRequest { priority: Some("urgent".into()), ..create_req("x") },
            CreateTodoRequest { category: Some("chores".into()), ..create_req("x") },
        ] {
            let err = service.create(&alice, request).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
        assert_eq!(store.todo_count().await, 0);
    }

    #[tokio::test]
    async fn foreign_and_missing_ids_look_the_same() {
        let (service, _) = service();
        let alice = caller("alice");
        let bob = caller("bob");
        let todo = service.create(&alice, create_req("mine")).await.unwrap();

        let foreign = service
            .update(&bob, todo.id, UpdateTodoRequest { completed: Some(true), ..Default::default() })
            .await
            .unwrap_err();
        let missing = service
            .update(&bob, Uuid::new_v4(), UpdateTodoRequest { completed: Some(true), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(foreign.to_json(), missing.to_json());
        assert_eq!(foreign.status_code(), StatusCode::NOT_FOUND);

        let foreign = service.delete(&bob, todo.id).await.unwrap_err();
        let missing = service.delete(&bob, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(foreign.to_json(), missing.to_json());

        // Alice's todo is untouched
        let list = service.list(&alice).await.unwrap();
        assert_eq!(list.len(), 1);
        assert!(!list[0].completed);
    }

    #[tokio::test]
    async fn update_touches_only_present_fields() {
        let (service, _) = service();
        let alice = caller("alice");
        let todo = service
            .create(&alice, CreateTodoRequest { category: Some("work".into()), ..create_req("a") })
            .await
            .unwrap();

        let updated = service
            .update(&alice, todo.id, UpdateTodoRequest { priority: Some("high".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.category, Category::Work);
        assert_eq!(updated.text, "a");
        assert_eq!(updated.id, todo.id);
        assert_eq!(updated.created_at, todo.created_at);

        // Same update again: mutable fields unchanged
        let again = service
            .update(&alice, todo.id, UpdateTodoRequest { priority: Some("high".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(again.text, updated.text);
        assert_eq!(again.completed, updated.completed);
        assert_eq!(again.category, updated.category);
        assert_eq!(again.priority, updated.priority);
        assert_eq!(again.owner, updated.owner);

        let err = service
            .update(&alice, todo.id, UpdateTodoRequest { text: Some(" ".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_owner_only() {
        let (service, _) = service();
        let alice = caller("alice");
        let bob = caller("bob");
        for text in ["first", "second", "third"] {
            service.create(&alice, create_req(text)).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        service.create(&bob, create_req("bob's")).await.unwrap();

        let texts: Vec<String> = service.list(&alice).await.unwrap().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
        assert_eq!(service.list(&bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let (service, store) = service();
        let alice = caller("alice");
        let todo = service.create(&alice, create_req("a")).await.unwrap();
        service.delete(&alice, todo.id).await.unwrap();
        assert_eq!(store.todo_count().await, 0);
        let err = service.delete(&alice, todo.id).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
