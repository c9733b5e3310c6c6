use std::net::SocketAddr;

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use website::config::Config;
use website::state::AppState;
use website::web::build_router;

fn test_state(dir: &TempDir) -> AppState {
    let config = Config {
        data_dir: dir.path().join("data"),
        uploads_dir: dir.path().join("uploads"),
        static_dir: dir.path().join("static"),
        ..Config::default()
    };
    AppState::new(config)
}

async fn spawn_app(state: AppState) -> SocketAddr {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve app");
    });
    addr
}

async fn send_raw(
    method: &str,
    addr: SocketAddr,
    path: &str,
    headers: &[(&str, &str)],
    body: &[u8],
) -> (u16, String, Vec<u8>) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    req.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request head");
    if !body.is_empty() {
        stream.write_all(body).await.expect("write request body");
    }
    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .expect("read response");
    let split = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("http response separator");
    let head = String::from_utf8(response[..split].to_vec()).expect("response head utf8");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head, response[split + 4..].to_vec())
}

async fn post_rsvp(addr: SocketAddr, ip: &str, payload: &Value) -> (u16, String, Vec<u8>) {
    send_raw(
        "POST",
        addr,
        "/api/rsvp",
        &[("content-type", "application/json"), ("x-forwarded-for", ip)],
        payload.to_string().as_bytes(),
    )
    .await
}

fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("json body")
}

#[tokio::test]
async fn submit_then_summary_reflects_counts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = spawn_app(test_state(&dir)).await;

    let (status, _, body) = post_rsvp(
        addr,
        "203.0.113.10",
        &json!({
            "name": "Guðrún Jónsdóttir",
            "email": "gudrun@example.is",
            "attending": true,
            "guestCount": 2
        }),
    )
    .await;
    assert_eq!(status, 200);
    let reply = json_body(&body);
    assert_eq!(reply["success"], json!(true));
    assert!(reply["id"].is_string());

    let (status, _, _) = post_rsvp(
        addr,
        "203.0.113.11",
        &json!({
            "name": "Árni Sigurðsson",
            "attending": false,
            "message": "Hugur minn er hjá ykkur"
        }),
    )
    .await;
    assert_eq!(status, 200);

    let (status, _, body) = send_raw("GET", addr, "/api/rsvp", &[], b"").await;
    assert_eq!(status, 200);
    let summary = json_body(&body);
    assert_eq!(summary["total"], json!(2));
    assert_eq!(summary["attending"], json!(1));
    assert_eq!(summary["notAttending"], json!(1));
    assert_eq!(summary["totalGuests"], json!(2));
}

#[tokio::test]
async fn invalid_submissions_are_rejected_before_anything_is_stored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = spawn_app(test_state(&dir)).await;

    let (status, _, body) = send_raw(
        "POST",
        addr,
        "/api/rsvp",
        &[
            ("content-type", "application/json"),
            ("x-forwarded-for", "203.0.113.20"),
        ],
        b"this is not json",
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json_body(&body)["error"], json!("Invalid data"));

    let (status, _, body) = post_rsvp(addr, "203.0.113.21", &json!({ "name": "Jón" })).await;
    assert_eq!(status, 400);
    assert_eq!(json_body(&body)["error"], json!("Invalid data"));

    // 101 identical characters would also trip the spam filter; the
    // length check answers first.
    let long_name = "a".repeat(101);
    let (status, _, body) = post_rsvp(
        addr,
        "203.0.113.22",
        &json!({ "name": long_name, "attending": true }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json_body(&body)["error"], json!("Content too long"));

    let (status, _, body) = post_rsvp(
        addr,
        "203.0.113.23",
        &json!({
            "name": "Jón",
            "attending": true,
            "message": "Win big at the casino www.example-spam.com"
        }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json_body(&body)["error"], json!("Content not allowed"));

    let (status, _, body) = send_raw("GET", addr, "/api/rsvp", &[], b"").await;
    assert_eq!(status, 200);
    assert_eq!(json_body(&body)["total"], json!(0));
    assert!(!dir.path().join("data").join("rsvps.json").exists());
}

#[tokio::test]
async fn rate_limit_throttles_a_single_client() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = spawn_app(test_state(&dir)).await;

    for n in 0..3 {
        let (status, _, _) = post_rsvp(
            addr,
            "198.51.100.7",
            &json!({ "name": format!("Gestur {n}"), "attending": true }),
        )
        .await;
        assert_eq!(status, 200);
    }

    let (status, _, body) = post_rsvp(
        addr,
        "198.51.100.7",
        &json!({ "name": "Gestur 4", "attending": true }),
    )
    .await;
    assert_eq!(status, 429);
    assert_eq!(json_body(&body)["error"], json!("Too many requests"));

    // A different client is unaffected.
    let (status, _, _) = post_rsvp(
        addr,
        "198.51.100.8",
        &json!({ "name": "Hanna", "attending": false }),
    )
    .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn admin_delete_removes_rsvp_and_missing_ids_answer_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = spawn_app(test_state(&dir)).await;

    let (status, _, body) = post_rsvp(
        addr,
        "203.0.113.30",
        &json!({ "name": "Ragnheiður", "attending": true }),
    )
    .await;
    assert_eq!(status, 200);
    let id = json_body(&body)["id"].as_str().expect("rsvp id").to_string();

    let (status, _, body) = send_raw("GET", addr, "/api/admin/rsvps", &[], b"").await;
    assert_eq!(status, 200);
    let listing = json_body(&body);
    assert_eq!(listing["rsvps"].as_array().map(Vec::len), Some(1));
    assert_eq!(listing["rsvps"][0]["id"], json!(id));
    assert_eq!(listing["rsvps"][0]["name"], json!("Ragnheiður"));

    let (status, _, body) =
        send_raw("DELETE", addr, &format!("/api/admin/rsvps/{id}"), &[], b"").await;
    assert_eq!(status, 200);
    assert_eq!(json_body(&body)["success"], json!(true));

    let (status, _, body) =
        send_raw("DELETE", addr, &format!("/api/admin/rsvps/{id}"), &[], b"").await;
    assert_eq!(status, 404);
    assert_eq!(json_body(&body)["error"], json!("RSVP not found"));

    let (status, _, body) = send_raw("GET", addr, "/api/rsvp", &[], b"").await;
    assert_eq!(status, 200);
    assert_eq!(json_body(&body)["total"], json!(0));
}
