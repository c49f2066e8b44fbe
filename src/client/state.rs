use uuid::Uuid;

use super::api::{ClientError, TodoClient};
use super::view::{derive_view, ViewFilter};
use crate::database::models::{Category, Priority, Todo};
use crate::services::CreateTodoRequest;

/// Pending new-todo fields. Defaults differ from the server's (personal, not other).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub text: String,
    pub category: Category,
    pub priority: Priority,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: Category::Personal,
            priority: Priority::Medium,
        }
    }
}

impl Draft {
    /// Request body for this draft, or `None` when the text is blank.
    pub fn to_request(&self) -> Option<CreateTodoRequest> {
        let text = self.text.trim();
        if text.is_empty() {
            return None;
        }
        Some(CreateTodoRequest {
            text: Some(text.to_string()),
            category: Some(self.category.to_string()),
            priority: Some(self.priority.to_string()),
        })
    }
}

/// Local copy of the caller's todos plus draft and filter selectors.
///
/// Every mutation is applied from the record the server returned, so ids,
/// timestamps and server-side defaults are always the server's.
#[derive(Debug, Clone, Default)]
pub struct TodoListState {
    pub todos: Vec<Todo>,
    pub draft: Draft,
    pub filter: ViewFilter,
}

impl TodoListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> Vec<&Todo> {
        derive_view(&self.todos, &self.filter)
    }

    pub fn get(&self, id: Uuid) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
    }

    pub fn apply_created(&mut self, todo: Todo) {
        self.todos.insert(0, todo);
        self.draft.text.clear();
    }

    pub fn apply_updated(&mut self, todo: Todo) {
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == todo.id) {
            *slot = todo;
        }
    }

    pub fn apply_deleted(&mut self, id: Uuid) {
        self.todos.retain(|todo| todo.id != id);
    }

    pub async fn refresh(&mut self, client: &TodoClient) -> Result<(), ClientError> {
        let todos = client.list().await?;
        self.replace_all(todos);
        Ok(())
    }

    /// Create from the draft. A blank draft issues no request and returns `None`.
    pub async fn submit_draft(&mut self, client: &TodoClient) -> Result<Option<Todo>, ClientError> {
        let Some(request) = self.draft.to_request() else {
            return Ok(None);
        };
        let created = client.create(&request).await?;
        self.apply_created(created.clone());
        Ok(Some(created))
    }

    /// Flip `completed` on a todo already in the local list.
    pub async fn toggle(&mut self, client: &TodoClient, id: Uuid) -> Result<Todo, ClientError> {
        let completed = self.get(id).ok_or(ClientError::UnknownTodo(id))?.completed;
        let updated = client.set_completed(id, !completed).await?;
        self.apply_updated(updated.clone());
        Ok(updated)
    }

    pub async fn delete(&mut self, client: &TodoClient, id: Uuid) -> Result<(), ClientError> {
        client.delete(id).await?;
        self.apply_deleted(id);
        Ok(())
    }
}
