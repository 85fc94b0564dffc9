//! Persistence port for todos.
//!
//! The server only sees `Arc<dyn TaskStore>`; [`Database`] is the SQLite
//! implementation and [`InMemoryTaskStore`] the fake used in tests.

pub mod memory;

use async_trait::async_trait;

use crate::db::Database;
use crate::error::{StoreError, StoreResult};
use crate::types::{NewTask, Task, TaskId, TaskPatch};

pub use memory::InMemoryTaskStore;

/// Message for a create or update that lacks a usable title.
pub const TITLE_REQUIRED: &str = "Title is required";

/// Todo persistence contract.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task and returns it with its id and timestamps.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] when the title is empty.
    async fn create(&self, input: NewTask) -> StoreResult<Task>;

    /// Returns every task, newest first.
    async fn list(&self) -> StoreResult<Vec<Task>>;

    /// Applies a coalescing update and returns the stored task.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no task has `id`;
    /// [`StoreError::Validation`] when the patch sets an empty title.
    async fn update(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task>;

    /// Removes a task permanently.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no task has `id`.
    async fn delete(&self, id: TaskId) -> StoreResult<()>;
}

/// Reject a create without a title.
pub fn validate_new_task(input: &NewTask) -> StoreResult<()> {
    if input.title.trim().is_empty() {
        return Err(StoreError::missing_field("title", TITLE_REQUIRED));
    }
    Ok(())
}

/// Reject a patch that would blank the title.
pub fn validate_patch(patch: &TaskPatch) -> StoreResult<()> {
    match &patch.title {
        Some(title) if title.trim().is_empty() => {
            Err(StoreError::missing_field("title", TITLE_REQUIRED))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl TaskStore for Database {
    async fn create(&self, input: NewTask) -> StoreResult<Task> {
        self.create_task(&input)
    }

    async fn list(&self) -> StoreResult<Vec<Task>> {
        self.list_tasks()
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        self.update_task(id, &patch)
    }

    async fn delete(&self, id: TaskId) -> StoreResult<()> {
        self.delete_task(id)
    }
}
