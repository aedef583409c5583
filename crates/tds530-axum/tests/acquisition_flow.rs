//! End-to-end: fake instrument -> acquisition loop -> HTTP.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use tds530_axum::{CorsConfig, create_router};
use tds530_core::{EmitterFanout, SinkFanout};
use tds530_runtime::testing::{FakeInstrument, frame};
use tds530_runtime::{AcquisitionConfig, ClientOptions, spawn_acquisition};
use tempfile::tempdir;
use tower::ServiceExt;

use common::{body_json, context, get};

#[tokio::test]
async fn samples_from_instrument_are_served_and_recorded() {
    let fake = FakeInstrument::repeating(frame("2024/03/09 07:05:01", &["+1.0E+00", "-OVER", "2.5"]))
        .await
        .unwrap();
    let dir = tempdir().unwrap();
    let tsv = dir.path().join("run.tsv");

    let (ctx, stores) = context();
    let recorder = Arc::new(tds530_runtime::TsvRecorder::new(&tsv).unwrap());
    let sink = Arc::new(
        SinkFanout::new()
            .with(stores.latest.clone())
            .with(recorder),
    );
    let emitter = Arc::new(
        EmitterFanout::new()
            .with(stores.status.clone())
            .with(stores.sse.clone()),
    );
    let config = AcquisitionConfig {
        address: fake.address(),
        client: ClientOptions {
            connect_timeout: Duration::from_secs(1),
            read_timeout: Duration::from_millis(20),
            response_timeout: Some(Duration::from_millis(500)),
        },
        poll_interval: Duration::from_millis(10),
        reconnect: true,
        reconnect_delay: Duration::from_millis(20),
    };
    let handle = spawn_acquisition(
        tds530_runtime::AcquisitionService::new(config, sink, emitter),
        stores.shutdown.child_token(),
    );

    tokio::time::timeout(Duration::from_secs(5), async {
        while stores.status.snapshot().samples_received < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    let app = create_router(ctx, &CorsConfig::AllowAll);
    let response = app.clone().oneshot(get("/v1/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"time": "2024/03/09 07:05:01", "data": [1.0, null, 2.5]})
    );

    let status = body_json(app.oneshot(get("/api/status")).await.unwrap()).await;
    assert_eq!(status["state"], "connected");

    stores.shutdown.cancel();
    handle.shutdown().await.unwrap();

    let contents = std::fs::read_to_string(&tsv).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("Time\tCH000\tCH001\tCH002"));
    assert_eq!(lines.next(), Some("2024/03/09 07:05:01\t1.0\t\t2.5"));
}
