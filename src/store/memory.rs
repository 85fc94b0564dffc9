//! In-memory task store for tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use super::{TaskStore, validate_new_task, validate_patch};
use crate::error::{StoreError, StoreResult};
use crate::types::{NewTask, Task, TaskId, TaskPatch, advance_timestamp, now};

/// Thread-safe in-memory todo store with the same semantics as the SQLite
/// table: ids start at 1 and are never reused.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    last_id: TaskId,
    tasks: BTreeMap<TaskId, Task>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks.
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.tasks.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, input: NewTask) -> StoreResult<Task> {
        validate_new_task(&input)?;
        let mut state = self.state.write().map_err(StoreError::unavailable)?;

        state.last_id += 1;
        let ts = now();
        let task = Task {
            id: state.last_id,
            title: input.title.clone(),
            description: input.description_or_default().to_string(),
            completed: false,
            priority: input.priority_or_default().to_string(),
            created_at: ts,
            updated_at: ts,
        };
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn list(&self) -> StoreResult<Vec<Task>> {
        let state = self.state.read().map_err(StoreError::unavailable)?;
        let mut tasks: Vec<Task> = state.tasks.values().cloned().collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        validate_patch(&patch)?;
        let mut state = self.state.write().map_err(StoreError::unavailable)?;

        let task = state.tasks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply_to(task);
        task.updated_at = advance_timestamp(task.updated_at, now());
        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId) -> StoreResult<()> {
        let mut state = self.state.write().map_err(StoreError::unavailable)?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
