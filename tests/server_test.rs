//! HTTP routes exercised through `tower::ServiceExt::oneshot`

mod common;

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::Router;
use common::service_stack;
use file_search_service::server::{self, AppState, ErrorBody};
use file_search_service::{HealthReporter, HealthSink, OVERALL_SERVICE, ServingStatus};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

fn app(dir: &TempDir) -> (Router, Arc<HealthReporter>) {
    let (service, _store) = service_stack(dir);
    let reporter = Arc::new(HealthReporter::new());
    let router = server::router(AppState::new(service, reporter.clone()));
    (router, reporter)
}

async fn call(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request builds");

    let response = app.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

#[tokio::test]
async fn test_rpc_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let (app, _reporter) = app(&dir);

    let (status, body) = call(
        &app,
        "POST",
        server::CREATE_FILE_PATH,
        Some(json!({"id": "f1", "name": "Invoice Q1", "ownerID": "u1", "size": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "f1"}));

    let (status, body) = call(&app, "POST", server::SEARCH_PATH, Some(json!({"term": "invoice"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ids": ["f1"]}));

    let (status, body) = call(
        &app,
        "POST",
        server::UPDATE_PATH,
        Some(json!({"id": "f1", "name": "Invoice Q1 Final"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "f1"}));

    let (status, body) = call(&app, "POST", server::DELETE_PATH, Some(json!({"id": "f1"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "f1"}));

    let (_, body) = call(&app, "POST", server::SEARCH_PATH, Some(json!({"term": "invoice"}))).await;
    assert_eq!(body, json!({"ids": []}));
}

#[tokio::test]
async fn test_missing_id_maps_to_invalid_argument() {
    let dir = TempDir::new().expect("temp dir");
    let (app, _reporter) = app(&dir);

    let (status, body) = call(&app, "POST", server::DELETE_PATH, Some(json!({"id": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: ErrorBody = serde_json::from_value(body).expect("error body");
    assert_eq!(error.code, "INVALID_ARGUMENT");
    assert_eq!(error.message, "file id is required");
}

#[tokio::test]
async fn test_unknown_id_maps_to_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let (app, _reporter) = app(&dir);

    let (status, body) = call(
        &app,
        "POST",
        server::UPDATE_PATH,
        Some(json!({"id": "ghost", "name": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_health_endpoint_reflects_published_status() {
    let dir = TempDir::new().expect("temp dir");
    let (app, reporter) = app(&dir);

    let (status, body) = call(&app, "GET", server::HEALTH_PATH, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"status": "UNKNOWN"}));

    reporter.set_serving_status(OVERALL_SERVICE, ServingStatus::Serving);
    let (status, body) = call(&app, "GET", server::HEALTH_PATH, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "SERVING"}));

    reporter.set_serving_status(OVERALL_SERVICE, ServingStatus::NotServing);
    let (status, body) = call(&app, "GET", server::HEALTH_PATH, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"status": "NOT_SERVING"}));
}
