//! Integration tests for the Axum web server.
//!
//! These tests verify that routes are correctly wired to handlers.

mod common;

use axum::http::{Request, StatusCode, header};
use axum::body::Body;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use tds530_axum::{CorsConfig, create_router, create_spa_router};
use tds530_core::{AcquisitionEvent, AcquisitionEventEmitter, Reading, Sample};
use tempfile::tempdir;
use tower::ServiceExt;

use common::{INDEX_MARKER, body_json, body_string, context, get, write_www};

fn sample(values: &[Option<f64>]) -> Sample {
    let time = NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(7, 5, 1)
        .unwrap();
    let readings = values
        .iter()
        .enumerate()
        .map(|(i, v)| Reading::new(format!("M{:03}", i + 1), *v))
        .collect();
    Sample::new(time, readings)
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let (ctx, _stores) = context();
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "OK");
}

#[tokio::test]
async fn latest_without_data_is_503() {
    let (ctx, _stores) = context();
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app.oneshot(get("/v1/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"error": "No data available"})
    );
}

#[tokio::test]
async fn latest_returns_time_and_data() {
    let (ctx, stores) = context();
    stores.latest.set(sample(&[Some(1.5), None, Some(-2.0)]));
    let app = create_router(ctx, &CorsConfig::AllowAll);

    for uri in ["/v1/", "/v1"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"time": "2024/03/09 07:05:01", "data": [1.5, null, -2.0]})
        );
    }
}

#[tokio::test]
async fn status_endpoint_reflects_events() {
    let (ctx, stores) = context();
    stores.status.emit(AcquisitionEvent::connected("10.0.0.1:4242"));
    stores.status.emit(AcquisitionEvent::sample(&sample(&[Some(1.0)])));
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app.oneshot(get("/api/status")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["state"], "connected");
    assert_eq!(json["address"], "10.0.0.1:4242");
    assert_eq!(json["samplesReceived"], 1);
    assert_eq!(json["lastSampleTime"], "2024/03/09 07:05:01");
}

#[tokio::test]
async fn unknown_api_path_is_json_404() {
    let dir = tempdir().unwrap();
    write_www(dir.path());
    let (ctx, _stores) = context();
    let app = create_spa_router(ctx, dir.path(), &CorsConfig::AllowAll);

    let response = app.oneshot(get("/api/nope")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn api_only_router_has_no_index() {
    let (ctx, _stores) = context();
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn spa_router_serves_index_and_assets() {
    let dir = tempdir().unwrap();
    write_www(dir.path());
    let (ctx, _stores) = context();
    let app = create_spa_router(ctx, dir.path(), &CorsConfig::AllowAll);

    let index = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(index.status(), StatusCode::OK);
    assert!(body_string(index).await.contains(INDEX_MARKER));

    let asset = app.clone().oneshot(get("/app.js")).await.unwrap();
    assert_eq!(asset.status(), StatusCode::OK);
    assert!(body_string(asset).await.contains("tds530"));

    let fallback = app.oneshot(get("/some/page")).await.unwrap();
    assert_eq!(fallback.status(), StatusCode::OK);
    assert!(body_string(fallback).await.contains(INDEX_MARKER));
}

#[tokio::test]
async fn spa_router_keeps_data_routes() {
    let dir = tempdir().unwrap();
    write_www(dir.path());
    let (ctx, stores) = context();
    stores.latest.set(sample(&[Some(3.0)]));
    let app = create_spa_router(ctx, dir.path(), &CorsConfig::AllowAll);

    let response = app.oneshot(get("/v1/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], serde_json::json!([3.0]));
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let (ctx, _stores) = context();
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let request = Request::builder()
        .uri("/v1/")
        .header(header::ORIGIN, "http://example.test")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn cors_respects_explicit_origins() {
    let (ctx, _stores) = context();
    let cors = CorsConfig::AllowOrigins(vec!["http://allowed.test".to_string()]);
    let app = create_router(ctx, &cors);

    let allowed = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://allowed.test")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(allowed).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://allowed.test"
    );

    let denied = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://other.test")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(denied).await.unwrap();
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn events_stream_delivers_acquisition_events() {
    let (ctx, stores) = context();
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app.oneshot(get("/api/events")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );
    assert_eq!(stores.sse.subscriber_count(), 1);

    stores.sse.emit(AcquisitionEvent::connecting("10.0.0.1:4242"));

    let mut body = response.into_body();
    let frame = tokio::time::timeout(std::time::Duration::from_secs(5), body.frame())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let text = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
    assert!(text.starts_with("data: "), "{text}");
    assert!(text.contains(r#""type":"connecting""#), "{text}");

    stores.shutdown.cancel();
    let end = tokio::time::timeout(std::time::Duration::from_secs(5), body.frame())
        .await
        .unwrap();
    assert!(end.is_none());
}
