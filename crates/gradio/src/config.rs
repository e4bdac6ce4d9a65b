//! Connection settings and reconstruction parameters.

use std::path::PathBuf;

/// Default Gradio app URL. Public share links expire, so deployments are
/// expected to set `GRADIO_APP_URL`.
pub const DEFAULT_GRADIO_APP_URL: &str = "http://127.0.0.1:7860";

/// Connection settings for the Gradio app.
#[derive(Debug, Clone)]
pub struct GradioConfig {
    /// Base URL of the Gradio app.
    pub app_url: String,
    /// Directory where reconstructed models are downloaded.
    pub download_dir: PathBuf,
}

impl Default for GradioConfig {
    fn default() -> Self {
        Self {
            app_url: DEFAULT_GRADIO_APP_URL.to_string(),
            download_dir: std::env::temp_dir().join("video2glb"),
        }
    }
}

impl GradioConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `GRADIO_APP_URL`       | `http://127.0.0.1:7860`    |
    /// | `GRADIO_DOWNLOAD_DIR`  | `<system temp>/video2glb`  |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let app_url = std::env::var("GRADIO_APP_URL").unwrap_or(defaults.app_url);
        let download_dir = std::env::var("GRADIO_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.download_dir);

        Self {
            app_url,
            download_dir,
        }
    }
}

/// Which VGGT head produces the point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionMode {
    DepthmapAndCamera,
    Pointmap,
}

impl PredictionMode {
    /// Label the demo's radio button expects.
    pub fn as_str(self) -> &'static str {
        match self {
            PredictionMode::DepthmapAndCamera => "Depthmap and Camera Branch",
            PredictionMode::Pointmap => "Pointmap Branch",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "depthmap" | "depthmap and camera branch" => Some(PredictionMode::DepthmapAndCamera),
            "pointmap" | "pointmap branch" => Some(PredictionMode::Pointmap),
            _ => None,
        }
    }
}

/// Fixed settings sent with every reconstruction request.
#[derive(Debug, Clone)]
pub struct ReconstructionParams {
    /// Percentage of low-confidence points to drop.
    pub conf_thres: f64,
    /// `"All"` or a single-frame filter label.
    pub frame_filter: String,
    pub mask_black_bg: bool,
    pub mask_white_bg: bool,
    pub show_cam: bool,
    pub mask_sky: bool,
    pub prediction_mode: PredictionMode,
}

impl Default for ReconstructionParams {
    fn default() -> Self {
        Self {
            conf_thres: 30.0,
            frame_filter: "All".to_string(),
            mask_black_bg: false,
            mask_white_bg: false,
            show_cam: false,
            mask_sky: true,
            prediction_mode: PredictionMode::DepthmapAndCamera,
        }
    }
}

impl ReconstructionParams {
    /// Load parameters from environment variables with defaults.
    ///
    /// | Env Var                  | Default    |
    /// |--------------------------|------------|
    /// | `RECON_CONF_THRES`       | `30`       |
    /// | `RECON_MASK_SKY`         | `true`     |
    /// | `RECON_PREDICTION_MODE`  | `depthmap` |
    ///
    /// Unparseable values fall back to the default with a warning.
    pub fn from_env() -> Self {
        let mut params = Self::default();

        if let Ok(raw) = std::env::var("RECON_CONF_THRES") {
            match raw.parse::<f64>() {
                Ok(v) => params.conf_thres = v,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid RECON_CONF_THRES"),
            }
        }
        if let Ok(raw) = std::env::var("RECON_MASK_SKY") {
            match raw.parse::<bool>() {
                Ok(v) => params.mask_sky = v,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid RECON_MASK_SKY"),
            }
        }
        if let Ok(raw) = std::env::var("RECON_PREDICTION_MODE") {
            match PredictionMode::parse(&raw) {
                Some(mode) => params.prediction_mode = mode,
                None => tracing::warn!(value = %raw, "Ignoring invalid RECON_PREDICTION_MODE"),
            }
        }

        params
    }
}
