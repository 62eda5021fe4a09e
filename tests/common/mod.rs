//! Shared helpers for globd integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use globd::config::{AppState, Config};
use globd::handler::handle_request;
use globd::logger::{Level, LogBuffer, LogFormat, LogWriter, Logger};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{HeaderMap, Method, Request, StatusCode};
use tempfile::TempDir;

pub const BOUNDARY: &str = "globd-test-boundary";

/// Storage root in a temp dir plus the state handlers run against
pub struct TestApp {
    pub dir: TempDir,
    pub state: Arc<AppState>,
    pub logs: LogBuffer,
}

/// Response pieces worth asserting on
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_limit_mb(10)
    }

    pub fn with_limit_mb(size_limit_mb: u64) -> Self {
        let dir = TempDir::new().unwrap();
        let config = Config {
            path: dir.path().join("globs"),
            size_limit_mb,
            ..Config::default()
        };
        std::fs::create_dir_all(&config.path).unwrap();

        let (writer, logs) = LogWriter::buffer();
        let logger = Logger::new(Level::Debug, LogFormat::Json, writer);
        let state = Arc::new(AppState::new(config, logger));
        Self { dir, state, logs }
    }

    pub fn root(&self) -> &Path {
        self.state.storage.root()
    }

    pub fn put_file(&self, name: &str, content: &[u8]) {
        std::fs::write(self.root().join(name), content).unwrap();
    }

    pub fn stored(&self, name: &str) -> Option<Vec<u8>> {
        std::fs::read(self.root().join(name)).ok()
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        headers: &[(&str, &str)],
        body: impl Into<Bytes>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let req = builder.body(Full::new(body.into())).unwrap();

        let resp = handle_request(req, Arc::clone(&self.state)).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(Method::GET, path, &[], Bytes::new()).await
    }

    pub async fn upload_form(&self, method: Method, filename: &str, content: &[u8]) -> TestResponse {
        let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
        self.send(
            method,
            "/",
            &[("content-type", content_type.as_str())],
            multipart_body("file", Some(filename), content),
        )
        .await
    }
}

/// Single-part `multipart/form-data` body
pub fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {disposition}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}
