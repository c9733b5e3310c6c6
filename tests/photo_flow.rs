use std::net::SocketAddr;

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use website::config::Config;
use website::services::photo_service::PHOTO_MAX_BYTES;
use website::state::AppState;
use website::web::build_router;

const BOUNDARY: &str = "x-photo-test-boundary";

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

fn header_value(head: &str, name: &str) -> Option<String> {
    let prefix = format!("{}:", name.to_ascii_lowercase());
    head.lines()
        .find(|line| line.to_ascii_lowercase().starts_with(&prefix))
        .map(|line| line.split_once(':').map_or("", |(_, v)| v).trim().to_string())
}

fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("json body")
}

fn upload_body(
    filename: &str,
    content_type: &str,
    bytes: &[u8],
    uploaded_by: Option<&str>,
    caption: Option<&str>,
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"photo\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
    for (name, value) in [("uploadedBy", uploaded_by), ("caption", caption)] {
        if let Some(value) = value {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                    .as_bytes(),
            );
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn post_upload(addr: SocketAddr, ip: &str, body: &[u8]) -> (u16, String, Vec<u8>) {
    let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
    send_raw(
        "POST",
        addr,
        "/api/photos",
        &[
            ("content-type", content_type.as_str()),
            ("x-forwarded-for", ip),
        ],
        body,
    )
    .await
}

#[tokio::test]
async fn upload_then_list_then_serve() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = spawn_app(test_state(&dir)).await;

    let image = b"\xFF\xD8\xFF\xE0 not really a jpeg but close enough".to_vec();
    let body = upload_body(
        "minning.jpg",
        "image/jpeg",
        &image,
        Some("Helga"),
        Some("Sumarið 2019"),
    );
    let (status, _, reply) = post_upload(addr, "203.0.113.100", &body).await;
    assert_eq!(status, 200);
    let reply = json_body(&reply);
    assert_eq!(reply["success"], json!(true));
    let id = reply["id"].as_str().expect("photo id").to_string();

    let (status, _, body) = send_raw("GET", addr, "/api/photos", &[], b"").await;
    assert_eq!(status, 200);
    let listing = json_body(&body);
    assert_eq!(listing["photos"].as_array().map(Vec::len), Some(1));
    let photo = &listing["photos"][0];
    assert_eq!(photo["id"], json!(id));
    assert_eq!(photo["filename"], json!(format!("{id}.jpg")));
    assert_eq!(photo["originalName"], json!("minning.jpg"));
    assert_eq!(photo["uploadedBy"], json!("Helga"));
    assert_eq!(photo["caption"], json!("Sumarið 2019"));

    let filename = photo["filename"].as_str().expect("filename").to_string();
    assert!(dir.path().join("uploads").join(&filename).exists());

    let (status, head, served) =
        send_raw("GET", addr, &format!("/api/photos/{filename}"), &[], b"").await;
    assert_eq!(status, 200);
    assert_eq!(
        header_value(&head, "content-type").as_deref(),
        Some("image/jpeg")
    );
    assert_eq!(
        header_value(&head, "cache-control").as_deref(),
        Some("public, max-age=31536000")
    );
    assert_eq!(served, image);
}

#[tokio::test]
async fn upload_guards_reject_bad_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = spawn_app(test_state(&dir)).await;

    let image = b"\xFF\xD8\xFF\xE0 tiny".to_vec();

    let body = upload_body("minning.jpg", "image/jpeg", &image, None, None);
    let (status, _, reply) = post_upload(addr, "203.0.113.110", &body).await;
    assert_eq!(status, 400);
    assert_eq!(json_body(&reply)["error"], json!("Missing required fields"));

    let body = upload_body("virus.exe", "application/octet-stream", &image, Some("Helga"), None);
    let (status, _, reply) = post_upload(addr, "203.0.113.111", &body).await;
    assert_eq!(status, 400);
    assert_eq!(
        json_body(&reply)["error"],
        json!("Only image files are allowed")
    );

    let body = upload_body(
        "minning.jpg",
        "image/jpeg",
        &image,
        Some("Helga"),
        Some("FREE MONEY at www.example-spam.com"),
    );
    let (status, _, reply) = post_upload(addr, "203.0.113.112", &body).await;
    assert_eq!(status, 400);
    assert_eq!(json_body(&reply)["error"], json!("Content not allowed"));

    let oversized = vec![0u8; PHOTO_MAX_BYTES + 1];
    let body = upload_body("stor.jpg", "image/jpeg", &oversized, Some("Helga"), None);
    let (status, _, reply) = post_upload(addr, "203.0.113.113", &body).await;
    assert_eq!(status, 400);
    assert_eq!(
        json_body(&reply)["error"],
        json!("File size too large (max 5MB)")
    );

    let (status, _, body) = send_raw("GET", addr, "/api/photos", &[], b"").await;
    assert_eq!(status, 200);
    assert_eq!(json_body(&body)["photos"], json!([]));
}

#[tokio::test]
async fn admin_delete_removes_both_metadata_and_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = spawn_app(test_state(&dir)).await;

    let image = b"\xFF\xD8\xFF\xE0 farewell".to_vec();
    let body = upload_body("kistulagning.jpg", "image/jpeg", &image, Some("Helga"), None);
    let (status, _, reply) = post_upload(addr, "203.0.113.120", &body).await;
    assert_eq!(status, 200);
    let id = json_body(&reply)["id"].as_str().expect("photo id").to_string();
    let filename = format!("{id}.jpg");
    assert!(dir.path().join("uploads").join(&filename).exists());

    let (status, _, body) = send_raw("GET", addr, "/api/admin/photos", &[], b"").await;
    assert_eq!(status, 200);
    assert_eq!(json_body(&body)["photos"].as_array().map(Vec::len), Some(1));

    let (status, _, body) =
        send_raw("DELETE", addr, &format!("/api/admin/photos/{id}"), &[], b"").await;
    assert_eq!(status, 200);
    assert_eq!(json_body(&body)["success"], json!(true));
    assert!(!dir.path().join("uploads").join(&filename).exists());

    let (status, _, body) = send_raw("GET", addr, "/api/photos", &[], b"").await;
    assert_eq!(status, 200);
    assert_eq!(json_body(&body)["photos"], json!([]));

    let (status, _, body) =
        send_raw("GET", addr, &format!("/api/photos/{filename}"), &[], b"").await;
    assert_eq!(status, 404);
    assert_eq!(json_body(&body)["error"], json!("File not found"));

    let (status, _, body) =
        send_raw("DELETE", addr, &format!("/api/admin/photos/{id}"), &[], b"").await;
    assert_eq!(status, 404);
    assert_eq!(json_body(&body)["error"], json!("Photo not found"));
}

#[tokio::test]
async fn path_shaped_filenames_are_refused() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = spawn_app(test_state(&dir)).await;

    let (status, _, body) = send_raw(
        "GET",
        addr,
        "/api/photos/..%2Fdata%2Frsvps.json",
        &[],
        b"",
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(json_body(&body)["error"], json!("File not found"));

    let (status, _, body) = send_raw("GET", addr, "/api/photos/nonexistent.jpg", &[], b"").await;
    assert_eq!(status, 404);
    assert_eq!(json_body(&body)["error"], json!("File not found"));
}
