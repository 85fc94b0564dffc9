//! HTTP server: the todo REST API and the client page.

use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{Method, StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use super::templates;
use crate::client::{LOAD_FAILURE_HTML, TodoBoard};
use crate::error::ApiError;
use crate::store::TaskStore;
use crate::types::{NewTask, Task, TaskId, TaskPatch};

/// State shared by all handlers.
#[derive(Clone)]
pub struct TodoServer {
    store: Arc<dyn TaskStore>,
}

impl TodoServer {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }
}

/// POST /api/todos body. Every field is optional on the wire so a missing
/// title reaches validation instead of failing deserialization.
#[derive(Debug, Deserialize)]
struct CreateTodoBody {
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
}

impl From<CreateTodoBody> for NewTask {
    fn from(body: CreateTodoBody) -> Self {
        NewTask {
            title: body.title.unwrap_or_default(),
            description: body.description,
            priority: body.priority,
        }
    }
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Path ids that are not integers cannot match a row.
fn parse_id(raw: &str) -> Result<TaskId, ApiError> {
    raw.parse().map_err(|_| ApiError::not_found())
}

async fn list_todos(State(state): State<TodoServer>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state
        .store()
        .list()
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to fetch todos"))?;
    Ok(Json(tasks))
}

async fn create_todo(
    State(state): State<TodoServer>,
    payload: Result<Json<CreateTodoBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::invalid_body(e.body_text()))?;

    let task = state
        .store()
        .create(body.into())
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to create todo"))?;

    info!(id = task.id, "Created todo");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_todo(
    State(state): State<TodoServer>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    let Json(patch) = payload.map_err(|e| ApiError::invalid_body(e.body_text()))?;
    if patch.is_empty() {
        debug!(id, "Empty update only refreshes updated_at");
    }

    let task = state
        .store()
        .update(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to update todo"))?;

    info!(id, "Updated todo");
    Ok(Json(task))
}

async fn delete_todo(
    State(state): State<TodoServer>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;

    state
        .store()
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to delete todo"))?;

    info!(id, "Deleted todo");
    Ok(Json(MessageResponse {
        message: "Todo deleted successfully",
    }))
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// The client page, with the current list rendered in so it shows before
/// the script loads.
async fn client_page(state: &TodoServer) -> Html<String> {
    let list_html = match state.store().list().await {
        Ok(tasks) => TodoBoard::with_tasks(tasks).render_html(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch todos for the client page");
            LOAD_FAILURE_HTML.to_string()
        }
    };
    Html(templates::render_index(&list_html))
}

/// Any other GET serves the client page.
async fn fallback(State(state): State<TodoServer>, method: Method) -> Response {
    if method == Method::GET || method == Method::HEAD {
        client_page(&state).await.into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Not found" })),
        )
            .into_response()
    }
}

async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        templates::APP_JS,
    )
}

async fn style_css() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        templates::STYLE_CSS,
    )
}

/// Build the router with all routes.
pub fn build_router(store: Arc<dyn TaskStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", put(update_todo).delete(delete_todo))
        .route("/api/health", get(health))
        .route("/app.js", get(app_js))
        .route("/style.css", get(style_css))
        .fallback(fallback)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(TodoServer::new(store))
}

/// Handle for a running server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL for clients, e.g. `http://127.0.0.1:3000`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::error!("Server task failed: {}", e);
        }
    }
}

/// Bind `addr` and serve in a background task.
///
/// Port 0 picks a free port; see [`ServerHandle::local_addr`].
pub async fn start_server(store: Arc<dyn TaskStore>, addr: SocketAddr) -> anyhow::Result<ServerHandle> {
    let app = build_router(store);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("Server listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Server shutting down");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr: bound_addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_ids_are_not_found() {
        assert_eq!(parse_id("12").unwrap(), 12);
        let err = parse_id("abc").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn create_body_without_title_becomes_empty_title() {
        let body: CreateTodoBody = serde_json::from_str(r#"{"priority": "high"}"#).unwrap();
        let input: NewTask = body.into();
        assert_eq!(input.title, "");
        assert_eq!(input.priority.as_deref(), Some("high"));
    }
}
