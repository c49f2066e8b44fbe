use std::sync::Arc;

use anyhow::Context;

use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, MemoryStore, PgStore, TodoStore, UserStore};
use crate::services::{AuthService, TodoService};

/// Everything the handlers need, built once at startup and injected into the
/// router. Tests build it around a `MemoryStore`.
#[derive(Clone)]
pub struct AppState {
    pub todos: TodoService,
    pub auth: AuthService,
    store: Arc<dyn TodoStore>,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, keys: TokenKeys, allow_registration: bool) -> Self
    where
        S: TodoStore + UserStore + 'static,
    {
        Self {
            todos: TodoService::new(store.clone()),
            auth: AuthService::new(store.clone(), keys, allow_registration),
            store,
        }
    }

    /// Fresh in-memory state, mainly for tests.
    pub fn in_memory(keys: TokenKeys) -> Self {
        Self::new(Arc::new(MemoryStore::new()), keys, true)
    }

    /// Build state from configuration: Postgres when `DATABASE_URL` is set,
    /// otherwise the in-memory store.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let keys = TokenKeys::from_config(&config.security).context("invalid JWT configuration")?;
        let allow_registration = config.security.allow_registration;

        if config.database.url.is_some() {
            let db = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to Postgres")?;
            Ok(Self::new(Arc::new(PgStore::new(db)), keys, allow_registration))
        } else {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
            Ok(Self::new(Arc::new(MemoryStore::new()), keys, allow_registration))
        }
    }

    pub async fn health_check(&self) -> Result<(), crate::database::DatabaseError> {
        self.store.health_check().await
    }
}
