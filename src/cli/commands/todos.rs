use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::{format_todo_line, output_success, output_todos};
use crate::cli::{handle_client_error, session_client, OutputFormat};
use crate::client::{ClientError, Session, TodoClient, TodoListState, ViewFilter};

fn parse_id(raw: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| anyhow::anyhow!("'{}' is not a valid todo id", raw))
}

/// Load the session and fetch the caller's list, clearing the token on 401.
async fn load_state() -> anyhow::Result<(Session, TodoClient, TodoListState)> {
    let mut session = Session::load()?;
    let client = session_client(&session)?;
    let mut state = TodoListState::new();

    if let Err(e) = state.refresh(&client).await {
        return Err(handle_client_error(&mut session, e));
    }
    Ok((session, client, state))
}

fn finish<T>(session: &mut Session, result: Result<T, ClientError>) -> anyhow::Result<T> {
    result.map_err(|e| handle_client_error(session, e))
}

pub async fn list(category: &str, priority: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let filter = ViewFilter {
        category: category.parse()?,
        priority: priority.parse()?,
    };

    let (_, _, mut state) = load_state().await?;
    state.filter = filter;
    output_todos(&output_format, &state.view())
}

pub async fn add(
    text: String,
    category: &str,
    priority: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mut session = Session::load()?;
    let client = session_client(&session)?;
    let mut state = TodoListState::new();
    state.draft.text = text;
    state.draft.category = category.parse()?;
    state.draft.priority = priority.parse()?;

    match finish(&mut session, state.submit_draft(&client).await)? {
        Some(todo) => output_success(
            &output_format,
            &format!("Added {}", format_todo_line(&todo)),
            Some(json!({ "todo": todo })),
        ),
        None => anyhow::bail!("Todo text cannot be empty"),
    }
}

pub async fn toggle(id: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let (mut session, client, mut state) = load_state().await?;

    let todo = finish(&mut session, state.toggle(&client, id).await)?;
    let status = if todo.completed { "completed" } else { "reopened" };
    output_success(
        &output_format,
        &format!("Marked {} {}", todo.text, status),
        Some(json!({ "todo": todo })),
    )
}

pub async fn delete(id: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let mut session = Session::load()?;
    let client = session_client(&session)?;

    let confirmation = finish(&mut session, client.delete(id).await)?;
    output_success(
        &output_format,
        &format!("{} ({})", confirmation.message, confirmation.id),
        Some(json!({ "id": confirmation.id })),
    )
}
