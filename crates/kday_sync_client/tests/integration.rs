//! Client and server working together.

use chrono::{FixedOffset, TimeZone};
use kday_codec::{split_segments, Segment};
use kday_storage::{DayStore, StorageConfig, Timestamp};
use kday_sync_client::{
    ClientConfig, HttpResponse, LoopbackClient, LoopbackServer, SyncClient, SyncError,
};
use kday_sync_server::{RequestHandler, ServerConfig, SyncServer};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct InProcess(RequestHandler);

impl LoopbackServer for InProcess {
    fn handle(&self, method: &str, path_and_query: &str, body: &[u8]) -> HttpResponse {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path_and_query, None),
        };
        match path {
            "/ping" => HttpResponse {
                status: 200,
                body: b"pong".to_vec(),
            },
            "/day" => {
                let response = self.0.handle(method, query, body);
                HttpResponse {
                    status: response.status,
                    body: response.body,
                }
            }
            _ => HttpResponse {
                status: 404,
                body: Vec::new(),
            },
        }
    }
}

fn store(temp: &TempDir, name: &str) -> DayStore {
    let config = StorageConfig::new(temp.path().join(name).join("data"))
        .tmp_dir(temp.path().join(name).join("tmp"))
        .host(name);
    DayStore::open(config).unwrap()
}

fn at(h: u32, m: u32) -> Timestamp {
    // Server and clients see the same instant; the server buckets it in
    // its own local zone, so keep the test clear of midnight.
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 6, 12, h, m, 0)
        .unwrap()
}

/// Writes a segment the way the CLI does: snapshot, edit, read back.
fn author(store: &DayStore, t: &Timestamp, text: &str) -> Vec<u8> {
    let snapshot = store.new_segment_file(t).unwrap();
    let mut content = std::fs::read(&snapshot.path).unwrap();
    let header_end = content.iter().position(|&b| b == b'\n').unwrap() + 1;
    content.splice(header_end..header_end, text.bytes());
    std::fs::write(&snapshot.path, &content).unwrap();
    let segment = snapshot.read().unwrap();
    snapshot.remove().unwrap();
    segment
}

#[test]
fn two_hosts_converge_through_the_server() {
    let temp = tempfile::tempdir().unwrap();
    let server = Arc::new(InProcess(RequestHandler::new(Arc::new(store(
        &temp, "server",
    )))));

    let laptop = SyncClient::new(
        LoopbackClient::new(Arc::clone(&server)),
        "http://sync",
        store(&temp, "laptop"),
    );
    let phone = SyncClient::new(
        LoopbackClient::new(Arc::clone(&server)),
        "http://sync",
        store(&temp, "phone"),
    );
    laptop.check().unwrap();

    let t = at(12, 0);

    let first = author(laptop.store(), &t, "from the laptop\n");
    laptop.upload_segment(&t, &first).unwrap();

    phone.download_day(&t).unwrap();
    let second = author(phone.store(), &t, "from the phone\n");
    let merged = phone.upload_segment(&t, &second).unwrap();

    let segments = split_segments(&merged).unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(Segment::parse(&segments[0]).unwrap().header.host, "phone");
    assert_eq!(Segment::parse(&segments[1]).unwrap().header.host, "laptop");

    let laptop_day = laptop.download_day(&t).unwrap();
    assert_eq!(laptop_day, merged);
    assert_eq!(laptop.store().read(&t).unwrap(), merged);
    assert_eq!(phone.store().read(&t).unwrap(), merged);
}

#[test]
fn server_rejection_surfaces_message() {
    struct Refuse;
    impl LoopbackServer for Refuse {
        fn handle(&self, method: &str, _: &str, _: &[u8]) -> HttpResponse {
            HttpResponse {
                status: 400,
                body: format!("unknown method: {method}").into_bytes(),
            }
        }
    }

    let temp = tempfile::tempdir().unwrap();
    let client = SyncClient::new(LoopbackClient::new(Refuse), "http://sync", store(&temp, "x"));
    match client.download_day(&at(9, 0)) {
        Err(SyncError::Server { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "unknown method: GET");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn ureq_client_against_running_server() {
    let temp = tempfile::tempdir().unwrap();
    let server = SyncServer::new(ServerConfig::default(), store(&temp, "server"));

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let listener = runtime
        .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
    let serving = runtime.spawn(server.serve_on(listener, async {
        let _ = stopped.await;
    }));

    let config = ClientConfig::new(addr.to_string()).with_timeout(Duration::from_secs(10));
    let client = SyncClient::connect(&config, store(&temp, "laptop"));
    client.check().unwrap();

    let t = at(15, 30);
    let segment = author(client.store(), &t, "over the wire\n");
    let day = client.upload_segment(&t, &segment).unwrap();
    assert_eq!(day, segment);
    assert_eq!(client.download_day(&t).unwrap(), segment);

    stop.send(()).unwrap();
    runtime.block_on(serving).unwrap().unwrap();
}
