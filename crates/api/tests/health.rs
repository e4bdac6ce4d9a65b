//! Integration tests for the liveness endpoints and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, test_config, StubBackend};

// ---------------------------------------------------------------------------
// Test: GET / answers with status and version
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_returns_ok_with_json() {
    let uploads = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(uploads.path()), StubBackend::new(None, None));

    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

// ---------------------------------------------------------------------------
// Test: GET /health mirrors GET /
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_ok() {
    let uploads = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(uploads.path()), StubBackend::new(None, None));

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let uploads = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(uploads.path()), StubBackend::new(None, None));

    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: GET on the upload route is not allowed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_on_upload_route_returns_405() {
    let uploads = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(uploads.path()), StubBackend::new(None, None));

    let response = get(app, "/video2glb").await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let uploads = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(uploads.path()), StubBackend::new(None, None));

    let response = get(app, "/").await;

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );
    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}
