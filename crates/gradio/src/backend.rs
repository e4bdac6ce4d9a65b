//! The reconstruction service as seen by the relay.
//!
//! [`ReconstructionBackend`] exposes exactly the two remote operations the
//! relay needs. [`GradioBackend`] implements them against the hosted demo;
//! tests substitute their own implementations.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api::{self, GradioApi, GradioApiError};
use crate::config::{GradioConfig, ReconstructionParams};

/// Endpoint that ingests a video and extracts its frames server-side.
pub const PREPARE_ENDPOINT: &str = "update_gallery_on_upload";

/// Endpoint that runs the model over a prepared target directory.
pub const RECONSTRUCT_ENDPOINT: &str = "gradio_demo";

/// Errors from the reconstruction flow.
#[derive(Debug, thiserror::Error)]
pub enum ReconstructionError {
    /// The service answered but did not produce what was asked for.
    #[error("{0}")]
    Upstream(String),

    /// Talking to the service failed.
    #[error(transparent)]
    Api(#[from] GradioApiError),

    #[error("Video file not found at: {0}")]
    VideoNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The two remote operations consumed by the relay.
#[async_trait]
pub trait ReconstructionBackend: Send + Sync {
    /// Upload `video` and prepare it for reconstruction.
    ///
    /// Returns the server-side target directory handle, or `None` if the
    /// service did not provide one.
    async fn prepare(&self, video: &Path) -> Result<Option<String>, ReconstructionError>;

    /// Reconstruct the scene prepared under `target_dir`.
    ///
    /// Returns the local path of the resulting GLB file, or `None` if the
    /// service did not produce one.
    async fn reconstruct(
        &self,
        target_dir: &str,
        params: &ReconstructionParams,
    ) -> Result<Option<PathBuf>, ReconstructionError>;
}

/// [`ReconstructionBackend`] backed by the hosted Gradio demo.
pub struct GradioBackend {
    api: GradioApi,
    download_dir: PathBuf,
}

impl GradioBackend {
    pub fn new(config: &GradioConfig) -> Self {
        Self::with_api(GradioApi::new(config.app_url.clone()), config.download_dir.clone())
    }

    pub fn with_api(api: GradioApi, download_dir: PathBuf) -> Self {
        Self { api, download_dir }
    }
}

/// Pull a non-empty string out of an output value.
fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl ReconstructionBackend for GradioBackend {
    async fn prepare(&self, video: &Path) -> Result<Option<String>, ReconstructionError> {
        let server_path = self.api.upload_file(video).await?;
        tracing::debug!(server_path = %server_path, "Uploaded video to Gradio");

        let input_video = json!({ "video": api::file_data(&server_path) });
        let outputs = self
            .api
            .call(PREPARE_ENDPOINT, vec![input_video, Value::Null])
            .await?;

        Ok(non_empty_str(outputs.get(1)))
    }

    async fn reconstruct(
        &self,
        target_dir: &str,
        params: &ReconstructionParams,
    ) -> Result<Option<PathBuf>, ReconstructionError> {
        let data = vec![
            json!(target_dir),
            json!(params.conf_thres),
            json!(params.frame_filter),
            json!(params.mask_black_bg),
            json!(params.mask_white_bg),
            json!(params.show_cam),
            json!(params.mask_sky),
            json!(params.prediction_mode.as_str()),
        ];
        let outputs = self.api.call(RECONSTRUCT_ENDPOINT, data).await?;

        let Some(url) = outputs.first().and_then(|v| self.api.file_url(v)) else {
            return Ok(None);
        };

        tokio::fs::create_dir_all(&self.download_dir).await?;
        // Removed on drop until the download has succeeded.
        let partial = tempfile::Builder::new()
            .prefix("result-")
            .suffix(".glb")
            .tempfile_in(&self.download_dir)?
            .into_temp_path();

        let bytes = self.api.download(&url, &partial).await?;
        let destination = partial
            .keep()
            .map_err(|e| ReconstructionError::Io(e.error))?;
        tracing::debug!(url = %url, bytes, path = %destination.display(), "Downloaded GLB");

        Ok(Some(destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_str_filters_blank_handles() {
        assert_eq!(non_empty_str(Some(&json!("/tmp/x"))), Some("/tmp/x".into()));
        assert_eq!(non_empty_str(Some(&json!(""))), None);
        assert_eq!(non_empty_str(Some(&Value::Null)), None);
        assert_eq!(non_empty_str(None), None);
    }
}
