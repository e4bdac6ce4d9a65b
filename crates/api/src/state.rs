use std::sync::Arc;

use video2glb_gradio::backend::ReconstructionBackend;
use video2glb_gradio::reconstruct::Reconstructor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Video-to-GLB flow against the configured reconstruction backend.
    pub reconstructor: Arc<Reconstructor>,
}

impl AppState {
    /// Build state around `backend`, using the reconstruction parameters
    /// from `config`.
    pub fn new(config: ServerConfig, backend: Arc<dyn ReconstructionBackend>) -> Self {
        let reconstructor = Reconstructor::new(backend, config.reconstruction.clone());
        Self {
            config: Arc::new(config),
            reconstructor: Arc::new(reconstructor),
        }
    }
}
