//! Handler for the video-to-GLB relay endpoint.

use std::time::Duration;

use axum::body::Body;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use futures::StreamExt;
use tokio::time::{timeout_at, Instant};
use tokio_util::io::ReaderStream;
use video2glb_gradio::backend::ReconstructionError;

use crate::error::{AppError, AppResult};
use crate::scratch::{ResultFile, TempUpload};
use crate::state::AppState;

/// Multipart field carrying the video.
pub const VIDEO_FIELD: &str = "video";

/// MIME type of the returned model.
pub const GLB_CONTENT_TYPE: &str = "model/gltf-binary";

/// File name offered to the client for the returned model.
pub const DOWNLOAD_FILENAME: &str = "output.glb";

/// POST /video2glb
///
/// Accepts a multipart form with a required `video` file field, runs the
/// reconstruction and streams the resulting GLB back as an attachment.
/// The uploaded video is stored in a temp file that is removed whatever
/// the outcome. Reconstruction must finish within `request_timeout_secs` of
/// the request arriving.
pub async fn video_to_glb(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Response> {
    let deadline = Instant::now() + Duration::from_secs(state.config.request_timeout_secs);
    let mut multipart = multipart?;
    let mut upload: Option<TempUpload> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(VIDEO_FIELD) {
            continue; // ignore unknown fields
        }

        // A part without a filename is a plain form field, not a file.
        let filename = match field.file_name() {
            None => continue,
            Some("") => return Err(AppError::BadRequest("No selected file".into())),
            Some(name) => name.to_string(),
        };

        let mut temp = TempUpload::create_in(&state.config.upload_dir)?;
        let bytes = temp.write_field(field).await?;
        tracing::info!(
            filename = %filename,
            bytes,
            path = %temp.path().display(),
            "Received video upload",
        );

        upload = Some(temp);
        break;
    }

    let upload =
        upload.ok_or_else(|| AppError::BadRequest("No video file provided".into()))?;

    let glb_path = timeout_at(deadline, state.reconstructor.run(upload.path()))
        .await
        .map_err(|_| AppError::Timeout(state.config.request_timeout_secs))??;
    let result = ResultFile::new(glb_path, state.config.delete_result_files);

    let file = tokio::fs::File::open(result.path()).await.map_err(|e| {
        ReconstructionError::Upstream(format!(
            "GLB file not found at {}: {e}",
            result.path().display()
        ))
    })?;
    let file_size = file.metadata().await?.len();

    // The result guard rides along with the body and is dropped with it.
    let stream = ReaderStream::new(file).map(move |chunk| {
        let _result = &result;
        chunk
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, GLB_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, file_size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{DOWNLOAD_FILENAME}\""),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::InternalError(e.to_string()))
}
