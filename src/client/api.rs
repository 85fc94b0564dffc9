//! HTTP client for the todo API and the controller that feeds the board.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use super::board::TodoBoard;
use crate::types::{Filter, NewTask, Task, TaskId, TaskPatch, is_known_priority};

/// Errors from talking to the server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// The task is not in the local cache.
    #[error("task #{0} is not on the board")]
    UnknownTask(TaskId),
}

/// Error body the server sends with non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin wrapper over the four `/api/todos` calls.
#[derive(Debug, Clone)]
pub struct TodoClient {
    http: reqwest::Client,
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn todos_url(&self) -> String {
        format!("{}/api/todos", self.base_url)
    }

    fn todo_url(&self, id: TaskId) -> String {
        format!("{}/api/todos/{}", self.base_url, id)
    }

    /// Any non-2xx status becomes [`ClientError::Status`].
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        Err(ClientError::Status { status, message })
    }

    pub async fn list(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.http.get(self.todos_url()).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn create(&self, input: &NewTask) -> Result<Task, ClientError> {
        let response = self.http.post(self.todos_url()).json(input).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ClientError> {
        let response = self.http.put(self.todo_url(id)).json(patch).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn delete(&self, id: TaskId) -> Result<(), ClientError> {
        let response = self.http.delete(self.todo_url(id)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

/// Owns a [`TodoBoard`] and keeps it in step with the server.
///
/// Mutations are applied to the board only after the server confirms them;
/// a failed call is logged and leaves the board as it was.
#[derive(Debug)]
pub struct BoardController {
    client: TodoClient,
    board: TodoBoard,
}

fn report<T>(result: Result<T, ClientError>, action: &str) -> Result<T, ClientError> {
    if let Err(ref e) = result {
        tracing::error!(error = %e, "Failed to {}", action);
    }
    result
}

impl BoardController {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            board: TodoBoard::new(),
        }
    }

    pub fn board(&self) -> &TodoBoard {
        &self.board
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.board.set_filter(filter);
    }

    /// Replace the cache with the server's listing.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let tasks = report(self.client.list().await, "fetch todos")?;
        self.board.replace_all(tasks);
        Ok(())
    }

    /// Create a task. A blank title sends nothing and returns `None`.
    pub async fn add(
        &mut self,
        title: &str,
        description: Option<&str>,
        priority: Option<&str>,
    ) -> Result<Option<Task>, ClientError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let mut input = NewTask::new(title);
        if let Some(description) = description.map(str::trim) {
            input = input.with_description(description);
        }
        if let Some(priority) = priority {
            if !priority.is_empty() && !is_known_priority(priority) {
                tracing::warn!(priority, "Unknown priority, storing it as given");
            }
            input = input.with_priority(priority);
        }

        let task = report(self.client.create(&input).await, "add todo")?;
        self.board.insert_created(task.clone());
        Ok(Some(task))
    }

    pub async fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<Task, ClientError> {
        let patch = TaskPatch::completed(completed);
        let task = report(self.client.update(id, &patch).await, "update todo")?;
        self.board.apply_updated(task.clone());
        Ok(task)
    }

    /// Flip the completion flag of a cached task.
    pub async fn toggle(&mut self, id: TaskId) -> Result<Task, ClientError> {
        let completed = match self.board.get(id) {
            Some(task) => task.completed,
            None => return report(Err(ClientError::UnknownTask(id)), "update todo"),
        };
        self.set_completed(id, !completed).await
    }

    pub async fn remove(&mut self, id: TaskId) -> Result<(), ClientError> {
        report(self.client.delete(id).await, "delete todo")?;
        self.board.remove(id);
        Ok(())
    }
}
