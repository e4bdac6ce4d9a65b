//! Video-to-GLB reconstruction flow.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::backend::{ReconstructionBackend, ReconstructionError};
use crate::config::ReconstructionParams;

/// Runs the prepare-then-reconstruct sequence against a backend.
///
/// Cheap to share behind an `Arc`; holds no per-request state.
pub struct Reconstructor {
    backend: Arc<dyn ReconstructionBackend>,
    params: ReconstructionParams,
}

impl Reconstructor {
    pub fn new(backend: Arc<dyn ReconstructionBackend>, params: ReconstructionParams) -> Self {
        Self { backend, params }
    }

    /// Turn the video at `video_path` into a GLB model.
    ///
    /// Returns the local path of the model. Fails with
    /// [`ReconstructionError::Upstream`] if the service returns no target
    /// directory or no model path.
    pub async fn run(&self, video_path: &Path) -> Result<PathBuf, ReconstructionError> {
        if !video_path.exists() {
            return Err(ReconstructionError::VideoNotFound(
                video_path.to_string_lossy().to_string(),
            ));
        }

        tracing::info!("Step 1/2: Uploading video and preparing for processing");
        let target_dir = self.backend.prepare(video_path).await?.ok_or_else(|| {
            ReconstructionError::Upstream(
                "Failed to get target directory from reconstruction service after upload."
                    .to_string(),
            )
        })?;
        tracing::info!(target_dir = %target_dir, "Video processed into target directory");

        tracing::info!(params = ?self.params, "Step 2/2: Running 3D reconstruction");
        let glb_path = self
            .backend
            .reconstruct(&target_dir, &self.params)
            .await?
            .ok_or_else(|| {
                ReconstructionError::Upstream(
                    "Reconstruction failed, no GLB file path returned.".to_string(),
                )
            })?;
        tracing::info!(path = %glb_path.display(), "Reconstruction complete");

        Ok(glb_path)
    }
}
