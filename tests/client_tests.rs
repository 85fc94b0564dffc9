//! Client tests against a real server on an ephemeral port.

use axum::{Router, routing::get};
use reqwest::StatusCode;
use std::net::SocketAddr;
use std::sync::Arc;
use tasklist::client::{BoardController, ClientError, TodoClient};
use tasklist::store::InMemoryTaskStore;
use tasklist::types::Filter;
use tasklist::web::{ServerHandle, start_server};

async fn spawn_server() -> ServerHandle {
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    start_server(Arc::new(InMemoryTaskStore::new()), addr)
        .await
        .expect("Failed to start server")
}

fn controller(server: &ServerHandle) -> BoardController {
    BoardController::new(TodoClient::new(server.url()).unwrap())
}

#[tokio::test]
async fn server_binds_an_ephemeral_port() {
    let server = spawn_server().await;
    let addr = server.local_addr();

    assert!(addr.ip().is_loopback());
    assert_ne!(addr.port(), 0);
    assert_eq!(server.url(), format!("http://{}", addr));

    let ctl = controller(&server);
    assert_eq!(ctl.client().base_url(), server.url());

    server.shutdown().await;
}

#[tokio::test]
async fn non_json_error_bodies_become_the_message() {
    let app = Router::new().route(
        "/api/todos",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream unavailable") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = TodoClient::new(format!("http://{}", addr)).unwrap();
    match client.list().await.unwrap_err() {
        ClientError::Status { status, message } => {
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(message, "upstream unavailable");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn controller_round_trip() {
    let server = spawn_server().await;
    let mut ctl = controller(&server);

    ctl.refresh().await.unwrap();
    assert!(ctl.board().tasks().is_empty());

    let milk = ctl
        .add("  Buy milk  ", None, Some("low"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(milk.title, "Buy milk");
    assert_eq!(milk.priority, "low");

    let rent = ctl
        .add("Pay rent", Some("before the 5th"), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ctl.board().tasks()[0].id, rent.id);

    let toggled = ctl.toggle(milk.id).await.unwrap();
    assert!(toggled.completed);
    assert_eq!(toggled.priority, "low");

    ctl.set_filter(Filter::Completed);
    let visible: Vec<_> = ctl.board().visible().iter().map(|t| t.id).collect();
    assert_eq!(visible, vec![milk.id]);

    ctl.set_filter(Filter::Active);
    let visible: Vec<_> = ctl.board().visible().iter().map(|t| t.id).collect();
    assert_eq!(visible, vec![rent.id]);

    ctl.remove(milk.id).await.unwrap();
    ctl.refresh().await.unwrap();
    assert_eq!(ctl.board().tasks().len(), 1);
    assert_eq!(ctl.board().tasks()[0].id, rent.id);

    server.shutdown().await;
}

#[tokio::test]
async fn blank_title_sends_no_request() {
    let server = spawn_server().await;
    let mut ctl = controller(&server);

    assert!(ctl.add("   ", None, None).await.unwrap().is_none());

    let listed = TodoClient::new(server.url()).unwrap().list().await.unwrap();
    assert!(listed.is_empty());

    server.shutdown().await;
}

#[tokio::test]
async fn failures_leave_the_board_unchanged() {
    let server = spawn_server().await;
    let mut ctl = controller(&server);
    ctl.add("keep", None, None).await.unwrap();
    let before = ctl.board().tasks().to_vec();

    let err = ctl.remove(9999).await.unwrap_err();
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "Todo not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let err = ctl.set_completed(9999, true).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status, .. } if status == StatusCode::NOT_FOUND));

    assert_eq!(ctl.board().tasks(), before.as_slice());

    server.shutdown().await;
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    let server = spawn_server().await;
    let url = server.url();
    server.shutdown().await;

    let mut ctl = BoardController::new(TodoClient::new(url).unwrap());
    let err = ctl.refresh().await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert!(ctl.board().tasks().is_empty());
}
