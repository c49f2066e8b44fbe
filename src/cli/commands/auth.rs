use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::{handle_client_error, session_client, OutputFormat};
use crate::client::Session;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create an account and log in")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the saved token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

fn read_password(provided: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }

    print!("Password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut session = Session::load()?;

    match cmd {
        AuthCommands::Register { username, password } => {
            let password = read_password(password)?;
            let mut client = session_client(&session)?;
            let response = client.register(&username, &password).await?;

            session.set_login(&response.user.username, response.token);
            session.save()?;

            output_success(
                &output_format,
                &format!("Registered and logged in as {}", response.user.username),
                Some(json!({ "user": response.user, "expires_in": response.expires_in })),
            )
        }
        AuthCommands::Login { username, password } => {
            let password = read_password(password)?;
            let mut client = session_client(&session)?;
            let response = client.login(&username, &password).await?;

            session.set_login(&response.user.username, response.token);
            session.save()?;

            output_success(
                &output_format,
                &format!("Logged in as {}", response.user.username),
                Some(json!({ "user": response.user, "expires_in": response.expires_in })),
            )
        }
        AuthCommands::Logout => {
            session.clear_token();
            session.save()?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            if !session.is_logged_in() {
                return output_success(
                    &output_format,
                    "Not logged in",
                    Some(json!({ "logged_in": false, "server_url": session.server_url })),
                );
            }

            let client = session_client(&session)?;
            match client.me().await {
                Ok(user) => output_success(
                    &output_format,
                    &format!("Logged in as {} on {}", user.username, session.server_url),
                    Some(json!({ "logged_in": true, "user": user, "server_url": session.server_url })),
                ),
                Err(e) => Err(handle_client_error(&mut session, e)),
            }
        }
    }
}
