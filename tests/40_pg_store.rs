//! Postgres-backed store tests. Skipped unless TEST_DATABASE_URL is set.

use anyhow::Result;
use uuid::Uuid;

use todo_tracker_api::config::DatabaseConfig;
use todo_tracker_api::database::models::{Category, NewTodo, NewUser, Priority, TodoPatch};
use todo_tracker_api::database::{DatabaseError, DatabaseManager, PgStore, TodoStore, UserStore};

async fn store() -> Result<Option<PgStore>> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping Postgres store test");
        return Ok(None);
    };
    let config = DatabaseConfig {
        url: Some(url),
        max_connections: 2,
        connection_timeout: 10,
    };
    Ok(Some(PgStore::new(DatabaseManager::connect(&config).await?)))
}

async fn user(store: &PgStore) -> Result<Uuid> {
    let created = store
        .create_user(NewUser {
            username: format!("pg_{}", &Uuid::new_v4().simple().to_string()[..12]),
            password_hash: "not-a-real-hash".to_string(),
        })
        .await?;
    Ok(created.id)
}

fn new_todo(text: &str) -> NewTodo {
    NewTodo {
        text: text.to_string(),
        category: Category::Work,
        priority: Priority::High,
    }
}

#[tokio::test]
async fn owner_scoped_update_and_delete() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let alice = user(&store).await?;
    let bob = user(&store).await?;

    let todo = store.insert(alice, new_todo("pg todo")).await?;
    assert_eq!(todo.owner, alice);

    let patch = TodoPatch {
        completed: Some(true),
        ..Default::default()
    };
    assert!(store.update_owned(todo.id, bob, patch.clone()).await?.is_none());
    let updated = store.update_owned(todo.id, alice, patch).await?.expect("owner can update");
    assert!(updated.completed);
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.created_at, todo.created_at);

    assert!(store.list_for_owner(bob).await?.is_empty());
    assert_eq!(store.list_for_owner(alice).await?.len(), 1);

    assert!(!store.delete_owned(todo.id, bob).await?);
    assert!(store.delete_owned(todo.id, alice).await?);
    assert!(!store.delete_owned(todo.id, alice).await?);
    Ok(())
}

#[tokio::test]
async fn duplicate_username_is_conflict() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let username = format!("dup_{}", &Uuid::new_v4().simple().to_string()[..12]);

    let new_user = || NewUser {
        username: username.clone(),
        password_hash: "hash".to_string(),
    };
    store.create_user(new_user()).await?;
    let err = store.create_user(new_user()).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)));
    assert!(store.find_by_username(&username).await?.is_some());
    Ok(())
}
