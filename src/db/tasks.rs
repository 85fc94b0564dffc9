//! Todo CRUD statements.
//!
//! Every operation is a single statement; `RETURNING *` hands back the
//! persisted row so callers never need a second query.

use super::Database;
use crate::error::{StoreError, StoreResult};
use crate::store::{validate_new_task, validate_patch};
use crate::types::{NewTask, Task, TaskId, TaskPatch, from_millis, now};
use rusqlite::{Row, params};

fn timestamp_column(row: &Row, name: &str) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    let idx = row.as_ref().column_index(name)?;
    let ms: i64 = row.get(idx)?;
    from_millis(ms).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, ms))
}

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        completed: row.get("completed")?,
        priority: row.get("priority")?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

impl Database {
    /// Insert a new todo and return the stored row.
    pub fn create_task(&self, input: &NewTask) -> StoreResult<Task> {
        validate_new_task(input)?;

        self.with_conn(|conn| {
            let created_at = now().timestamp_millis();
            let task = conn.query_row(
                "INSERT INTO todos (title, description, priority, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 RETURNING *",
                params![
                    input.title,
                    input.description_or_default(),
                    input.priority_or_default(),
                    created_at,
                ],
                parse_task_row,
            )?;
            Ok(task)
        })
    }

    /// All todos, newest first.
    pub fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM todos ORDER BY created_at DESC, id DESC")?;
            let tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    /// Apply a coalescing update.
    ///
    /// `updated_at` moves to now, or one millisecond past its previous value
    /// when the clock has not moved on.
    pub fn update_task(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<Task> {
        validate_patch(patch)?;

        self.with_conn(|conn| {
            let updated_at = now().timestamp_millis();
            let result = conn.query_row(
                "UPDATE todos
                 SET title = COALESCE(?1, title),
                     description = COALESCE(?2, description),
                     completed = COALESCE(?3, completed),
                     priority = COALESCE(?4, priority),
                     updated_at = MAX(?5, updated_at + 1)
                 WHERE id = ?6
                 RETURNING *",
                params![
                    patch.title,
                    patch.description,
                    patch.completed,
                    patch.priority,
                    updated_at,
                    id,
                ],
                parse_task_row,
            );

            match result {
                Ok(task) => Ok(task),
                Err(rusqlite::Error::QueryReturnedNoRows) => Err(StoreError::NotFound(id)),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Remove a todo permanently.
    pub fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM todos WHERE id = ?1", params![id])?;
            if deleted == 0 {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        })
    }

    /// Number of stored todos.
    pub fn count_tasks(&self) -> StoreResult<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))?)
        })
    }
}
