//! `GradioBackend` against an in-process fake of the Gradio HTTP API.

use std::path::Path;
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::body::Bytes;
use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use video2glb_gradio::api::{GradioApi, GradioApiError};
use video2glb_gradio::backend::{GradioBackend, ReconstructionBackend, ReconstructionError};
use video2glb_gradio::config::ReconstructionParams;

const GLB_BYTES: &[u8] = b"glTF\x02\x00\x00\x00 pretend model";
const VIDEO_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42 not really a video";
const TARGET_DIR: &str = "/tmp/gradio/target_dir_1";

struct FakeGradio {
    base_url: String,
    /// Model served from `/files/scene.glb`; `None` answers 500.
    model: Option<&'static [u8]>,
}

/// Accepts the upload only if the streamed body carries the video bytes.
async fn upload(body: Bytes) -> Response {
    if !body.windows(VIDEO_BYTES.len()).any(|w| w == VIDEO_BYTES) {
        return (StatusCode::BAD_REQUEST, "video bytes missing").into_response();
    }
    Json(json!(["/tmp/gradio/uploads/fountain.mp4"])).into_response()
}

async fn submit(UrlPath(endpoint): UrlPath<String>) -> Json<Value> {
    Json(json!({ "event_id": format!("evt-{endpoint}") }))
}

async fn results(
    State(fake): State<Arc<FakeGradio>>,
    UrlPath((endpoint, _event_id)): UrlPath<(String, String)>,
) -> Response {
    let outputs = match endpoint.as_str() {
        "update_gallery_on_upload" => json!([null, TARGET_DIR, [], "Upload complete."]),
        "gradio_demo" => json!([
            {
                "path": "/tmp/gradio/scene.glb",
                "url": format!("{}/files/scene.glb", fake.base_url),
            },
            "Reconstruction done."
        ]),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    format!("event: generating\ndata: null\n\nevent: complete\ndata: {outputs}\n\n")
        .into_response()
}

async fn model_file(State(fake): State<Arc<FakeGradio>>) -> Response {
    match fake.model {
        Some(bytes) => bytes.into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "file store unavailable").into_response(),
    }
}

/// Serve the fake app on an ephemeral port and return its base URL.
async fn spawn_fake_gradio(model: Option<&'static [u8]>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let fake = Arc::new(FakeGradio {
        base_url: base_url.clone(),
        model,
    });

    let app = Router::new()
        .route("/gradio_api/upload", post(upload))
        .route("/gradio_api/call/{endpoint}", post(submit))
        .route("/gradio_api/call/{endpoint}/{event_id}", get(results))
        .route("/files/scene.glb", get(model_file))
        .with_state(fake);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base_url
}

fn entries(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

// ---------------------------------------------------------------------------
// Test: prepare streams the video and returns the target dir (output[1])
// ---------------------------------------------------------------------------

#[tokio::test]
async fn prepare_returns_target_dir() {
    let base_url = spawn_fake_gradio(Some(GLB_BYTES)).await;
    let downloads = tempfile::tempdir().unwrap();
    let backend = GradioBackend::with_api(GradioApi::new(base_url), downloads.path().into());

    let video = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
    std::fs::write(video.path(), VIDEO_BYTES).unwrap();

    let target = backend.prepare(video.path()).await.unwrap();

    assert_eq!(target.as_deref(), Some(TARGET_DIR));
}

// ---------------------------------------------------------------------------
// Test: reconstruct downloads the model into the download directory
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reconstruct_downloads_model() {
    let base_url = spawn_fake_gradio(Some(GLB_BYTES)).await;
    let downloads = tempfile::tempdir().unwrap();
    let backend = GradioBackend::with_api(GradioApi::new(base_url), downloads.path().into());

    let model = backend
        .reconstruct(TARGET_DIR, &ReconstructionParams::default())
        .await
        .unwrap()
        .unwrap();

    assert!(model.starts_with(downloads.path()));
    assert_eq!(std::fs::read(&model).unwrap(), GLB_BYTES);
    assert_eq!(entries(downloads.path()).len(), 1);
}

// ---------------------------------------------------------------------------
// Test: a failed download leaves no file behind
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_download_leaves_no_file() {
    let base_url = spawn_fake_gradio(None).await;
    let downloads = tempfile::tempdir().unwrap();
    let backend = GradioBackend::with_api(GradioApi::new(base_url), downloads.path().into());

    let err = backend
        .reconstruct(TARGET_DIR, &ReconstructionParams::default())
        .await
        .unwrap_err();

    assert_matches!(
        err,
        ReconstructionError::Api(GradioApiError::ApiError { status: 500, .. })
    );
    assert!(
        entries(downloads.path()).is_empty(),
        "leftover files: {:?}",
        entries(downloads.path())
    );
}
