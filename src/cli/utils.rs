use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::Todo;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": false,
                "error": message
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// One line per todo: status box, priority, category, text, id
pub fn format_todo_line(todo: &Todo) -> String {
    format!(
        "[{}] {:<6} {:<8} {}  ({})",
        if todo.completed { "x" } else { " " },
        todo.priority,
        todo.category,
        todo.text,
        todo.id
    )
}

/// Output a list of todos, already in display order
pub fn output_todos(output_format: &OutputFormat, todos: &[&Todo]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "todos": todos }))?);
        }
        OutputFormat::Text => {
            if todos.is_empty() {
                println!("No todos found");
            }
            for todo in todos {
                println!("{}", format_todo_line(todo));
            }
        }
    }
    Ok(())
}
