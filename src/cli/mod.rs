pub mod commands;
pub mod utils;

use std::path::Path;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::session::config_dir;
use crate::client::{ClientError, Session, TodoClient};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Todo CLI - Command-line client for the Todo Tracker API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Select the API server")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Registration, login and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "List your todos, highest priority first")]
    List {
        #[arg(long, default_value = "all", help = "Category filter (personal, work, shopping, health, other, all)")]
        category: String,
        #[arg(long, default_value = "all", help = "Priority filter (low, medium, high, all)")]
        priority: String,
    },

    #[command(about = "Add a new todo")]
    Add {
        #[arg(help = "Todo text")]
        text: String,
        #[arg(long, default_value = "personal", help = "Category")]
        category: String,
        #[arg(long, default_value = "medium", help = "Priority")]
        priority: String,
    },

    #[command(about = "Toggle a todo between open and completed")]
    Toggle {
        #[arg(help = "Todo id")]
        id: String,
    },

    #[command(about = "Delete a todo")]
    Delete {
        #[arg(help = "Todo id")]
        id: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Client for the saved server, carrying the saved token if any.
pub fn session_client(session: &Session) -> anyhow::Result<TodoClient> {
    Ok(TodoClient::new(&session.server_url)?.with_token(session.token.clone()))
}

/// On a rejected credential, forget the stored token before reporting.
pub fn handle_client_error(session: &mut Session, err: ClientError) -> anyhow::Error {
    match config_dir() {
        Ok(dir) => clear_on_unauthenticated(session, &dir, err).into(),
        Err(dir_err) => {
            tracing::warn!("Failed to locate session directory: {}", dir_err);
            err.into()
        }
    }
}

/// Clear and persist the session in `dir` when `err` is a 401; returns `err` unchanged.
pub fn clear_on_unauthenticated(session: &mut Session, dir: &Path, err: ClientError) -> ClientError {
    if err.is_unauthenticated() && session.is_logged_in() {
        session.clear_token();
        if let Err(save_err) = session.save_to(dir) {
            tracing::warn!("Failed to clear stored token: {}", save_err);
        }
    }
    err
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::List { category, priority } => {
            commands::todos::list(&category, &priority, output_format).await
        }
        Commands::Add { text, category, priority } => {
            commands::todos::add(text, &category, &priority, output_format).await
        }
        Commands::Toggle { id } => commands::todos::toggle(&id, output_format).await,
        Commands::Delete { id } => commands::todos::delete(&id, output_format).await,
    }
}
