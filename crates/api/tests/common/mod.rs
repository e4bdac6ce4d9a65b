#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use video2glb_api::config::ServerConfig;
use video2glb_api::router::build_app_router;
use video2glb_api::state::AppState;
use video2glb_gradio::backend::{ReconstructionBackend, ReconstructionError};
use video2glb_gradio::config::ReconstructionParams;

pub const BOUNDARY: &str = "video2glb-test-boundary";

/// Stand-in for the hosted reconstruction service.
///
/// Answers with fixed values and records what it was sent, including the
/// contents of the uploaded video as seen while the request was in flight.
pub struct StubBackend {
    pub target_dir: Option<String>,
    pub model: Option<PathBuf>,
    pub seen_videos: Mutex<Vec<(PathBuf, Vec<u8>)>>,
    pub seen_targets: Mutex<Vec<String>>,
    /// How long `prepare` takes before answering.
    pub delay: Option<Duration>,
}

impl StubBackend {
    pub fn new(target_dir: Option<&str>, model: Option<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            target_dir: target_dir.map(Into::into),
            model,
            seen_videos: Mutex::new(Vec::new()),
            seen_targets: Mutex::new(Vec::new()),
            delay: None,
        })
    }

    /// Stub whose `prepare` takes `delay` and then reports a target dir.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            target_dir: Some("/tmp/gradio/target_dir_1".into()),
            model: None,
            seen_videos: Mutex::new(Vec::new()),
            seen_targets: Mutex::new(Vec::new()),
            delay: Some(delay),
        })
    }

    /// Stub that succeeds, returning a model file with `contents` in `dir`.
    pub fn succeeding(dir: &Path, contents: &[u8]) -> Arc<Self> {
        let model = dir.join("scene.glb");
        std::fs::write(&model, contents).unwrap();
        Self::new(Some("/tmp/gradio/target_dir_1"), Some(model))
    }

    pub fn uploaded_paths(&self) -> Vec<PathBuf> {
        self.seen_videos
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }
}

#[async_trait]
impl ReconstructionBackend for StubBackend {
    async fn prepare(&self, video: &Path) -> Result<Option<String>, ReconstructionError> {
        let contents = std::fs::read(video)?;
        self.seen_videos
            .lock()
            .unwrap()
            .push((video.to_path_buf(), contents));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.target_dir.clone())
    }

    async fn reconstruct(
        &self,
        target_dir: &str,
        _params: &ReconstructionParams,
    ) -> Result<Option<PathBuf>, ReconstructionError> {
        self.seen_targets.lock().unwrap().push(target_dir.to_string());
        Ok(self.model.clone())
    }
}

/// Build a test `ServerConfig` that stores uploads in `upload_dir`.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        upload_dir: upload_dir.to_path_buf(),
        request_timeout_secs: 30,
        ..ServerConfig::default()
    }
}

/// Build the full application router around `backend`.
pub fn build_test_app(config: ServerConfig, backend: Arc<StubBackend>) -> Router {
    build_app_router(AppState::new(config, backend))
}

/// A multipart part for [`multipart_body`].
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub data: &'a [u8],
}

/// Encode `parts` as a `multipart/form-data` body using [`BOUNDARY`].
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\n",
                        part.name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: video/mp4\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Send a GET request to `uri`.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a multipart body to `/video2glb`.
pub async fn post_video(app: Router, parts: &[Part<'_>]) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri("/video2glb")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Number of entries in `dir`.
pub fn entry_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
