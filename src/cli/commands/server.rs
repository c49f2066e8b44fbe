use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::client::{Session, TodoClient};

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Point the CLI at a server (clears any saved token)")]
    Set {
        #[arg(help = "Server URL, e.g. http://localhost:5000")]
        url: String,
    },

    #[command(about = "Show the selected server and whether it is reachable")]
    Current,
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut session = Session::load()?;

    match cmd {
        ServerCommands::Set { url } => {
            // Validate before persisting
            TodoClient::new(&url)?;

            if session.server_url != url {
                session.clear_token();
            }
            session.server_url = url.clone();
            session.save()?;

            output_success(
                &output_format,
                &format!("Using server {}", url),
                Some(json!({ "server_url": url })),
            )
        }
        ServerCommands::Current => {
            let client = TodoClient::new(&session.server_url)?;
            let up = client.ping().await;
            let status = if up { "up" } else { "down" };

            output_success(
                &output_format,
                &format!("Server {} is {}", session.server_url, status),
                Some(json!({ "server_url": session.server_url, "status": status })),
            )
        }
    }
}
