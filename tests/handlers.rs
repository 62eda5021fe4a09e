//! Request handling tests: routing, the four file operations and their
//! error statuses, driven straight through `handle_request`.

mod common;

use common::{multipart_body, TestApp, BOUNDARY};
use globd::handler::static_files::INDEX_PAGE;
use hyper::body::Bytes;
use hyper::{Method, StatusCode};

#[tokio::test]
async fn test_body_upload_round_trip() {
    let app = TestApp::new();
    let content = b"\x00\x01binary\xffpayload".to_vec();

    let resp = app.send(Method::PUT, "/blob.bin", &[], content.clone()).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert_eq!(app.stored("blob.bin").unwrap(), content);

    let resp = app.get("/blob.bin").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, Bytes::from(content));
}

#[tokio::test]
async fn test_post_behaves_like_put() {
    let app = TestApp::new();
    let resp = app.send(Method::POST, "/notes.txt", &[], "hello").await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert_eq!(app.stored("notes.txt").unwrap(), b"hello");
}

#[tokio::test]
async fn test_form_upload_round_trip() {
    let app = TestApp::new();

    let resp = app.upload_form(Method::POST, "photo.jpg", b"\xff\xd8\xffjpeg").await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT, "{}", resp.text());

    let resp = app.get("/photo.jpg").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(&resp.body[..], b"\xff\xd8\xffjpeg");
    assert_eq!(resp.headers["content-type"], "image/jpeg");
}

#[tokio::test]
async fn test_form_upload_with_put() {
    let app = TestApp::new();
    let resp = app.upload_form(Method::PUT, "a.txt", b"via put").await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert_eq!(app.stored("a.txt").unwrap(), b"via put");
}

#[tokio::test]
async fn test_overwrite_replaces_content() {
    let app = TestApp::new();
    app.send(Method::PUT, "/f.txt", &[], "first version, quite long").await;
    app.send(Method::PUT, "/f.txt", &[], "second").await;
    assert_eq!(app.get("/f.txt").await.text(), "second");

    // And through the form path
    app.upload_form(Method::POST, "f.txt", b"third").await;
    assert_eq!(app.get("/f.txt").await.text(), "third");
}

#[tokio::test]
async fn test_empty_body_is_rejected() {
    let app = TestApp::new();
    let resp = app.send(Method::PUT, "/empty.txt", &[], Bytes::new()).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.text().starts_with("Bad Request: Empty body"));
    assert!(app.stored("empty.txt").is_none());
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = TestApp::with_limit_mb(1);
    let content = vec![b'x'; (1 << 20) + 1];

    let resp = app.send(Method::PUT, "/big.bin", &[], content).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(app.stored("big.bin").is_none());
}

#[tokio::test]
async fn test_oversized_content_length_is_rejected_up_front() {
    let app = TestApp::with_limit_mb(1);
    let resp = app
        .send(Method::PUT, "/big.bin", &[("content-length", "2097152")], "small")
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.text().contains("too large"));
}

#[tokio::test]
async fn test_oversized_body_keeps_previous_file() {
    let app = TestApp::with_limit_mb(1);
    app.put_file("keep.txt", b"original");

    let resp = app
        .send(Method::PUT, "/keep.txt", &[], vec![0u8; (1 << 20) + 10])
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.stored("keep.txt").unwrap(), b"original");
}

#[tokio::test]
async fn test_limit_is_inclusive() {
    let app = TestApp::with_limit_mb(1);
    let content = vec![b'y'; 1 << 20];
    let resp = app.send(Method::PUT, "/exact.bin", &[], content).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_oversized_form_is_rejected() {
    let app = TestApp::with_limit_mb(1);
    let resp = app
        .upload_form(Method::POST, "big.bin", &vec![b'z'; (1 << 20) + 1])
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.text().contains("too large"));
    assert!(app.stored("big.bin").is_none());
}

#[tokio::test]
async fn test_form_limit_is_inclusive() {
    let app = TestApp::with_limit_mb(1);
    let content = vec![b'q'; 1 << 20];
    let resp = app.upload_form(Method::POST, "exact.bin", &content).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT, "{}", resp.text());
    assert_eq!(app.stored("exact.bin").unwrap().len(), 1 << 20);
}

#[tokio::test]
async fn test_form_limit_counts_file_not_envelope() {
    let app = TestApp::with_limit_mb(1);
    let body = multipart_body("file", Some("under.bin"), &vec![b'q'; (1 << 20) - 100]);
    // The request as a whole is larger than the limit
    assert!(body.len() > 1 << 20);

    let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
    let content_length = body.len().to_string();
    let resp = app
        .send(
            Method::POST,
            "/",
            &[
                ("content-type", content_type.as_str()),
                ("content-length", content_length.as_str()),
            ],
            body,
        )
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT, "{}", resp.text());
    assert_eq!(app.stored("under.bin").unwrap().len(), (1 << 20) - 100);
}

#[tokio::test]
async fn test_form_content_length_beyond_overhead_is_rejected() {
    let app = TestApp::with_limit_mb(1);
    let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
    let content_length = ((1 << 20) + globd::handler::upload::FORM_OVERHEAD + 1).to_string();
    let resp = app
        .send(
            Method::POST,
            "/",
            &[
                ("content-type", content_type.as_str()),
                ("content-length", content_length.as_str()),
            ],
            multipart_body("file", Some("a.txt"), b"small"),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(app.stored("a.txt").is_none());
}

#[tokio::test]
async fn test_form_without_file_field() {
    let app = TestApp::new();
    let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
    let resp = app
        .send(
            Method::POST,
            "/",
            &[("content-type", content_type.as_str())],
            multipart_body("other", Some("a.txt"), b"data"),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.text().contains("no such file"));
}

#[tokio::test]
async fn test_form_field_without_filename() {
    let app = TestApp::new();
    let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
    let resp = app
        .send(
            Method::POST,
            "/",
            &[("content-type", content_type.as_str())],
            multipart_body("file", None, b"data"),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_form_requires_multipart_content_type() {
    let app = TestApp::new();
    let resp = app
        .send(Method::POST, "/", &[("content-type", "text/plain")], "data")
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.text().contains("multipart/form-data"));
}

#[tokio::test]
async fn test_malformed_form_is_rejected() {
    let app = TestApp::new();
    let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
    let resp = app
        .send(
            Method::POST,
            "/",
            &[("content-type", content_type.as_str())],
            "this is not a multipart body",
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete() {
    let app = TestApp::new();
    app.put_file("bye.txt", b"x");

    let resp = app.send(Method::DELETE, "/bye.txt", &[], Bytes::new()).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert!(app.stored("bye.txt").is_none());
    assert_eq!(app.get("/bye.txt").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_is_success() {
    let app = TestApp::new();
    let resp = app.send(Method::DELETE, "/never-existed", &[], Bytes::new()).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let app = TestApp::new();
    assert_eq!(app.get("/missing.txt").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_json() {
    let app = TestApp::new();
    app.put_file("a.txt", b"a");
    app.put_file("b.txt", b"b");

    let resp = app
        .send(Method::GET, "/", &[("accept", "application/json")], Bytes::new())
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.headers["content-type"], "application/json");

    let mut names: Vec<String> = serde_json::from_slice(&resp.body).unwrap();
    names.sort();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
}

#[tokio::test]
async fn test_list_json_empty_is_array() {
    let app = TestApp::new();
    let resp = app
        .send(Method::GET, "/", &[("accept", "text/json")], Bytes::new())
        .await;
    assert_eq!(resp.text(), "[]");
}

#[tokio::test]
async fn test_list_plain_text() {
    let app = TestApp::new();
    app.put_file("a.txt", b"a");
    app.put_file("b.txt", b"b");

    let resp = app.send(Method::GET, "/", &[("accept", "*/*")], Bytes::new()).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.headers["content-type"].to_str().unwrap().starts_with("text/plain"));

    let body = resp.text();
    assert!(body.ends_with('\n'));
    let mut names: Vec<&str> = body.lines().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["a.txt", "b.txt"]);

    // No Accept header at all
    assert_eq!(app.get("/").await.text().lines().count(), 2);
}

#[tokio::test]
async fn test_list_html() {
    let app = TestApp::new();
    app.put_file("b.txt", b"b");
    app.put_file("a.txt", b"a");

    let resp = app
        .send(
            Method::GET,
            "/",
            &[("accept", "text/html,application/xhtml+xml;q=0.9")],
            Bytes::new(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let html = resp.text();
    assert!(html.contains("<a href=\"a.txt\">a.txt</a>"));
    assert!(html.find("a.txt").unwrap() < html.find("b.txt").unwrap());
}

#[tokio::test]
async fn test_list_fails_when_root_is_gone() {
    let app = TestApp::new();
    std::fs::remove_dir_all(app.root()).unwrap();

    let resp = app.get("/").await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.text().starts_with("Internal Server Error: reading directory"));
}

#[tokio::test]
async fn test_index_page_override() {
    let app = TestApp::new();
    app.put_file("index.html", b"<p>stored copy</p>");

    let resp = app.get("/index.html").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.text(), INDEX_PAGE);
    assert_eq!(resp.headers["content-type"], "text/html; charset=utf-8");
}

#[tokio::test]
async fn test_index_page_without_stored_file() {
    let app = TestApp::new();
    assert_eq!(app.get("/index.html").await.text(), INDEX_PAGE);
}

#[tokio::test]
async fn test_traversal_is_contained() {
    let app = TestApp::new();
    let outside = app.dir.path().join("secret.txt");
    std::fs::write(&outside, b"do not touch").unwrap();

    let resp = app.send(Method::PUT, "/..%2Fsecret.txt", &[], "pwned").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app.get("/..%2Fsecret.txt").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app.send(Method::DELETE, "/..", &[], Bytes::new()).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    // Form filenames are reduced to their last segment
    let resp = app.upload_form(Method::POST, "../secret.txt", b"pwned").await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert_eq!(app.stored("secret.txt").unwrap(), b"pwned");

    assert_eq!(std::fs::read(&outside).unwrap(), b"do not touch");
    assert!(app.root().exists());
}

#[tokio::test]
async fn test_nested_path_not_found() {
    let app = TestApp::new();
    let resp = app.send(Method::PUT, "/dir/file.txt", &[], "x").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_method_not_allowed() {
    let app = TestApp::new();

    let resp = app.send(Method::DELETE, "/", &[], Bytes::new()).await;
    assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers["allow"], "GET, HEAD, PUT, POST");

    let resp = app.send(Method::PATCH, "/a.txt", &[], Bytes::new()).await;
    assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_percent_encoded_names() {
    let app = TestApp::new();
    let resp = app.send(Method::PUT, "/my%20notes.md", &[], "# notes").await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert_eq!(app.stored("my notes.md").unwrap(), b"# notes");
}

#[tokio::test]
async fn test_head_has_headers_only() {
    let app = TestApp::new();
    app.put_file("h.txt", b"hello");

    let resp = app.send(Method::HEAD, "/h.txt", &[], Bytes::new()).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.headers["content-length"], "5");
    assert!(resp.body.is_empty());
}

#[tokio::test]
async fn test_conditional_get() {
    let app = TestApp::new();
    app.put_file("c.txt", b"cached");

    let first = app.get("/c.txt").await;
    let etag = first.headers["etag"].to_str().unwrap().to_string();
    let last_modified = first.headers["last-modified"].to_str().unwrap().to_string();

    let resp = app
        .send(Method::GET, "/c.txt", &[("if-none-match", etag.as_str())], Bytes::new())
        .await;
    assert_eq!(resp.status, StatusCode::NOT_MODIFIED);

    let resp = app
        .send(Method::GET, "/c.txt", &[("if-modified-since", last_modified.as_str())], Bytes::new())
        .await;
    assert_eq!(resp.status, StatusCode::NOT_MODIFIED);

    let resp = app
        .send(Method::GET, "/c.txt", &[("if-none-match", "\"stale\"")], Bytes::new())
        .await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_range_request() {
    let app = TestApp::new();
    app.put_file("r.txt", b"0123456789");

    let resp = app
        .send(Method::GET, "/r.txt", &[("range", "bytes=2-5")], Bytes::new())
        .await;
    assert_eq!(resp.status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(resp.text(), "2345");
    assert_eq!(resp.headers["content-range"], "bytes 2-5/10");

    let resp = app
        .send(Method::GET, "/r.txt", &[("range", "bytes=50-")], Bytes::new())
        .await;
    assert_eq!(resp.status, StatusCode::RANGE_NOT_SATISFIABLE);
}

#[tokio::test]
async fn test_requests_are_logged_with_fields() {
    let app = TestApp::new();
    app.get("/missing.txt").await;
    app.send(Method::PUT, "/e.txt", &[], Bytes::new()).await;

    let logs = app.logs.lock().unwrap();
    let records: Vec<serde_json::Value> = logs
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert!(records
        .iter()
        .any(|r| r["msg"] == "Request received" && r["path"] == "/missing.txt"));
    assert!(records
        .iter()
        .any(|r| r["msg"] == "Response served" && r["status"] == 404));
    assert!(records
        .iter()
        .any(|r| r["level"] == "ERROR" && r["method"] == "PUT" && r["status"] == 400));
}
