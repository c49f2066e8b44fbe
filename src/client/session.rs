use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
const SESSION_FILE: &str = "session.json";

/// Persisted CLI session: which server to talk to and the current token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub server_url: String,
    pub token: Option<String>,
    pub username: Option<String>,
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            token: None,
            username: None,
            logged_in_at: None,
        }
    }
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn set_login(&mut self, username: &str, token: String) {
        self.username = Some(username.to_string());
        self.token = Some(token);
        self.logged_in_at = Some(Utc::now());
    }

    /// Drop the credential but keep the server selection.
    pub fn clear_token(&mut self) {
        self.token = None;
        self.username = None;
        self.logged_in_at = None;
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_dir()?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&config_dir()?)
    }

    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let file = dir.join(SESSION_FILE);
        if !file.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(file)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, dir: &Path) -> anyhow::Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(SESSION_FILE), content)?;
        Ok(())
    }
}

/// `$TODO_CLI_CONFIG_DIR`, else `~/.config/todo`
pub fn config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(custom_dir) = std::env::var("TODO_CLI_CONFIG_DIR") {
        return Ok(PathBuf::from(custom_dir));
    }
    let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
    Ok(PathBuf::from(home).join(".config").join("todo"))
}
