//! Shared helpers for tds530-axum integration tests.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use tds530_axum::AxumContext;
use tds530_runtime::{LatestSample, StatusTracker};
use tokio_util::sync::CancellationToken;

/// Marker text in the test `index.html`.
pub const INDEX_MARKER: &str = "tds530-test-index";

/// Handles kept by a test after the context moved into a router.
pub struct Stores {
    pub latest: Arc<LatestSample>,
    pub status: Arc<StatusTracker>,
    pub sse: Arc<tds530_axum::SseBroadcaster>,
    pub shutdown: CancellationToken,
}

pub fn context() -> (AxumContext, Stores) {
    let shutdown = CancellationToken::new();
    let ctx = AxumContext::new(shutdown.clone());
    let stores = Stores {
        latest: Arc::clone(&ctx.latest),
        status: Arc::clone(&ctx.status),
        sse: Arc::clone(&ctx.sse),
        shutdown,
    };
    (ctx, stores)
}

/// Write a minimal UI into `dir`.
pub fn write_www(dir: &Path) {
    std::fs::write(
        dir.join("index.html"),
        format!("<!doctype html><title>{INDEX_MARKER}</title>"),
    )
    .unwrap();
    std::fs::write(dir.join("app.js"), "console.log('tds530');").unwrap();
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
