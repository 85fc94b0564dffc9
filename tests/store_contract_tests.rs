//! Contract tests run against both task store implementations.
//!
//! Every scenario takes a `&dyn TaskStore` so the SQLite store and the
//! in-memory fake are held to the same behavior.

use tasklist::db::Database;
use tasklist::error::StoreError;
use tasklist::store::{InMemoryTaskStore, TaskStore};
use tasklist::types::{NewTask, TaskPatch};

/// Helper to create a fresh in-memory database for testing.
fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

fn stores() -> Vec<(&'static str, Box<dyn TaskStore>)> {
    vec![
        ("sqlite", Box::new(setup_db())),
        ("memory", Box::new(InMemoryTaskStore::new())),
    ]
}

async fn create_applies_defaults(store: &dyn TaskStore) {
    let task = store.create(NewTask::new("Buy milk")).await.unwrap();

    assert!(task.id > 0);
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description, "");
    assert!(!task.completed);
    assert_eq!(task.priority, "medium");
    assert_eq!(task.created_at, task.updated_at);

    let empty_priority = store
        .create(NewTask::new("Call mom").with_priority(""))
        .await
        .unwrap();
    assert_eq!(empty_priority.priority, "medium");
    assert!(empty_priority.id > task.id);
}

async fn blank_title_is_rejected(store: &dyn TaskStore) {
    for title in ["", "   "] {
        let err = store.create(NewTask::new(title)).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "title", .. }));
    }
    assert!(store.list().await.unwrap().is_empty());
}

async fn list_is_newest_first(store: &dyn TaskStore) {
    let first = store.create(NewTask::new("first")).await.unwrap();
    let second = store.create(NewTask::new("second")).await.unwrap();
    let third = store.create(NewTask::new("third")).await.unwrap();

    // Updating an older task must not move it.
    store
        .update(first.id, TaskPatch::completed(true))
        .await
        .unwrap();

    let ids: Vec<_> = store.list().await.unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

async fn update_coalesces_and_advances(store: &dyn TaskStore) {
    let created = store
        .create(
            NewTask::new("Write report")
                .with_description("quarterly")
                .with_priority("high"),
        )
        .await
        .unwrap();

    let updated = store
        .update(created.id, TaskPatch::completed(true))
        .await
        .unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, "Write report");
    assert_eq!(updated.description, "quarterly");
    assert_eq!(updated.priority, "high");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    // An empty patch still refreshes updated_at.
    let touched = store
        .update(created.id, TaskPatch::default())
        .await
        .unwrap();
    assert!(touched.updated_at > updated.updated_at);
    assert!(touched.completed);

    let cleared = store
        .update(
            created.id,
            TaskPatch {
                description: Some(String::new()),
                ..TaskPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.description, "");
    assert_eq!(cleared.title, "Write report");
}

async fn update_errors(store: &dyn TaskStore) {
    let err = store
        .update(999, TaskPatch::completed(true))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(999)));

    let task = store.create(NewTask::new("keep me")).await.unwrap();
    let err = store
        .update(
            task.id,
            TaskPatch {
                title: Some("  ".to_string()),
                ..TaskPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));

    let list = store.list().await.unwrap();
    assert_eq!(list[0].title, "keep me");
}

async fn delete_removes_exactly_one(store: &dyn TaskStore) {
    let a = store.create(NewTask::new("a")).await.unwrap();
    let b = store.create(NewTask::new("b")).await.unwrap();

    let err = store.delete(b.id + 100).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(store.list().await.unwrap().len(), 2);

    store.delete(a.id).await.unwrap();
    let remaining = store.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, b.id);

    let err = store.delete(a.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == a.id));

    // Ids are never reused.
    let c = store.create(NewTask::new("c")).await.unwrap();
    assert!(c.id > b.id);
}

mod contract_tests {
    use super::*;

    #[tokio::test]
    async fn create_applies_defaults_for_every_store() {
        for (name, store) in stores() {
            println!("store: {}", name);
            create_applies_defaults(store.as_ref()).await;
        }
    }

    #[tokio::test]
    async fn blank_title_is_rejected_for_every_store() {
        for (name, store) in stores() {
            println!("store: {}", name);
            blank_title_is_rejected(store.as_ref()).await;
        }
    }

    #[tokio::test]
    async fn list_is_newest_first_for_every_store() {
        for (name, store) in stores() {
            println!("store: {}", name);
            list_is_newest_first(store.as_ref()).await;
        }
    }

    #[tokio::test]
    async fn update_coalesces_and_advances_for_every_store() {
        for (name, store) in stores() {
            println!("store: {}", name);
            update_coalesces_and_advances(store.as_ref()).await;
        }
    }

    #[tokio::test]
    async fn update_errors_for_every_store() {
        for (name, store) in stores() {
            println!("store: {}", name);
            update_errors(store.as_ref()).await;
        }
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_for_every_store() {
        for (name, store) in stores() {
            println!("store: {}", name);
            delete_removes_exactly_one(store.as_ref()).await;
        }
    }
}

mod persistence_tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reopening_keeps_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.db");

        let id = {
            let db = Database::open(&path).unwrap();
            let task = db.create_task(&NewTask::new("survives restart")).unwrap();
            task.id
        };

        let db = Database::open(&path).unwrap();
        let tasks = db.list_tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, id);
        assert_eq!(tasks[0].title, "survives restart");
    }

    #[test]
    fn connect_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data").join("todos.db");
        let url = format!("sqlite://{}", path.display());

        let db = Database::connect(&url).unwrap();
        db.create_task(&NewTask::new("nested")).unwrap();

        assert!(path.exists());
        assert_eq!(db.count_tasks().unwrap(), 1);
    }
}
