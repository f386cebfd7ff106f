//! End-to-end tests through the axum router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use kday_storage::{DayStore, StorageConfig};
use kday_sync_server::{ServerConfig, SyncServer};
use tempfile::TempDir;
use tower::ServiceExt;

const T: i64 = 1_718_000_000;

fn server(max_body: usize) -> (TempDir, SyncServer) {
    let temp = tempfile::tempdir().unwrap();
    let config = StorageConfig::new(temp.path().join("data"))
        .tmp_dir(temp.path().join("tmp"))
        .host("server");
    let store = DayStore::open(config).unwrap();
    let server = SyncServer::new(ServerConfig::default().with_max_body_bytes(max_body), store);
    (temp, server)
}

async fn send(router: &Router, method: &str, uri: &str, body: &[u8]) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_vec()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn ping_answers_pong() {
    let (_temp, server) = server(1024);
    let (status, body) = send(&server.router(), "GET", "/ping", b"").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"pong");
}

#[tokio::test]
async fn upload_then_download() {
    let (_temp, server) = server(1024);
    let router = server.router();
    let uri = format!("/day?t={T}");

    let (status, body) = send(&router, "GET", &uri, b"").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let first = b"#>> Note opened at 7:00 am on laptop\nfirst\n";
    let (status, body) = send(&router, "POST", &uri, first).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, first);

    let second = b"#>> Note opened at 7:30 am on phone\nsecond\n";
    let (_, body) = send(&router, "POST", &uri, second).await;
    assert_eq!(body, [&second[..], &first[..]].concat());

    let (_, body) = send(&router, "GET", &uri, b"").await;
    assert_eq!(body, [&second[..], &first[..]].concat());
}

#[tokio::test]
async fn unknown_method_is_rejected() {
    let (_temp, server) = server(1024);
    let (status, body) = send(&server.router(), "DELETE", &format!("/day?t={T}"), b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"unknown method: DELETE");
}

#[tokio::test]
async fn missing_time_is_rejected() {
    let (_temp, server) = server(1024);
    let (status, body) = send(&server.router(), "GET", "/day", b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8_lossy(&body).starts_with("failed to parse time:"));
}

#[tokio::test]
async fn oversized_upload_is_refused() {
    let (_temp, server) = server(16);
    let router = server.router();
    let uri = format!("/day?t={T}");

    let big = b"#>> Note opened at 7:00 am on laptop\nway more than sixteen bytes\n";
    let (status, _) = send(&router, "POST", &uri, big).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let (_, body) = send(&router, "GET", &uri, b"").await;
    assert!(body.is_empty());
}

#[tokio::test]
async fn serves_over_tcp_until_shutdown() {
    let (_temp, server) = server(1024);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let task = tokio::spawn(server.serve_on(listener, async {
        let _ = rx.await;
    }));

    tx.send(()).unwrap();
    task.await.unwrap().unwrap();
}
