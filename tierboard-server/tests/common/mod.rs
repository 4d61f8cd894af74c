//! Shared helpers for tierboard-server integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tierboard_common::config::{DataLayout, TomlConfig};
use tierboard_server::{build_router, AppState};
use tower::util::ServiceExt; // for `oneshot` method

pub const BOUNDARY: &str = "tierboard-test-boundary";

/// Scratch data directory plus a router over it
pub struct TestApp {
    pub dir: TempDir,
    pub layout: DataLayout,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(TomlConfig::default())
    }

    pub fn with_config(config: TomlConfig) -> Self {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let layout = DataLayout::new(dir.path());
        layout.ensure_directories().expect("Should create data layout");
        let state = AppState::from_config(&layout, &config);
        let router = build_router(state.clone());
        Self {
            dir,
            layout,
            state,
            router,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router should not fail")
    }

    pub fn stored_images(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.layout.images_dir)
            .expect("Should read images dir")
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Multipart upload of `(field name, file name, bytes)` parts
pub fn post_multipart(uri: &str, parts: &[(&str, &str, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (field, filename, bytes) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Images named `img<n>.png`, as upload parts
pub fn images(n: usize) -> Vec<(String, Vec<u8>)> {
    (0..n)
        .map(|i| (format!("img{}.png", i), format!("png-bytes-{}", i).into_bytes()))
        .collect()
}

pub fn as_parts(files: &[(String, Vec<u8>)]) -> Vec<(&str, &str, &[u8])> {
    files
        .iter()
        .map(|(name, bytes)| ("tierImage", name.as_str(), bytes.as_slice()))
        .collect()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Should parse JSON")
}
