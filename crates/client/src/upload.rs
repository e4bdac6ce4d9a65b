use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use tokio_util::io::ReaderStream;

use crate::config::ClientConfig;
use crate::error::{error_message, ClientError};
use crate::readiness::wait_for_server;

/// Multipart field the relay expects the video under.
pub const VIDEO_FIELD: &str = "video";

/// A model that was received and written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub output_path: PathBuf,
    pub bytes: u64,
}

/// Upload the configured video and save the returned GLB.
///
/// Waits for the server first, so nothing is sent to a server that never
/// came up. The request timeout spans the whole reconstruction, so a
/// timeout here usually means the server is still working rather than down.
pub async fn upload_video(
    http: &reqwest::Client,
    config: &ClientConfig,
) -> Result<UploadOutcome, ClientError> {
    let video = &config.video_path;
    if !tokio::fs::try_exists(video).await.unwrap_or(false) {
        return Err(ClientError::VideoNotFound(video.display().to_string()));
    }

    wait_for_server(
        http,
        &config.health_url(),
        config.ready_timeout,
        config.poll_interval,
    )
    .await?;

    let form = Form::new().part(VIDEO_FIELD, video_part(video).await?);
    let url = config.upload_url();
    tracing::info!(url = %url, video = %video.display(), "Uploading video");

    let timeout_err = |e: reqwest::Error| {
        if e.is_timeout() {
            ClientError::RequestTimeout {
                after: config.request_timeout,
            }
        } else {
            ClientError::Transport(e)
        }
    };

    let resp = http
        .post(&url)
        .multipart(form)
        .timeout(config.request_timeout)
        .send()
        .await
        .map_err(timeout_err)?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Http {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    let body = resp.bytes().await.map_err(timeout_err)?;

    if let Some(parent) = config.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(&config.output_path, &body).await?;

    tracing::info!(
        output = %config.output_path.display(),
        bytes = body.len(),
        "Saved model"
    );

    Ok(UploadOutcome {
        output_path: config.output_path.clone(),
        bytes: body.len() as u64,
    })
}

/// Stream the video from disk as the `video` part.
async fn video_part(path: &Path) -> Result<Part, ClientError> {
    let file = tokio::fs::File::open(path).await?;
    let len = file.metadata().await?.len();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video.mp4".to_string());

    let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
    Ok(Part::stream_with_length(body, len)
        .file_name(file_name)
        .mime_str("video/mp4")?)
}
