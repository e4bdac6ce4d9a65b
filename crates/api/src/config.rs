use std::path::PathBuf;

use video2glb_gradio::config::{GradioConfig, ReconstructionParams};

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running next to a local Gradio
/// app. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `900`). Reconstruction
    /// routinely takes minutes, so this is far above the usual API timeout.
    pub request_timeout_secs: u64,
    /// Largest accepted request body in bytes (default: 512 MiB).
    pub max_upload_bytes: usize,
    /// Directory for temporary uploads (default: system temp dir).
    pub upload_dir: PathBuf,
    /// Delete downloaded GLB files once they have been sent (default: `true`).
    pub delete_result_files: bool,
    /// Gradio app connection settings.
    pub gradio: GradioConfig,
    /// Parameters sent with every reconstruction.
    pub reconstruction: ReconstructionParams,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            cors_origins: vec!["http://localhost:5173".to_string()],
            request_timeout_secs: 900,
            max_upload_bytes: 512 * 1024 * 1024,
            upload_dir: std::env::temp_dir(),
            delete_result_files: true,
            gradio: GradioConfig::default(),
            reconstruction: ReconstructionParams::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5001`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `900`                      |
    /// | `MAX_UPLOAD_BYTES`     | `536870912`                |
    /// | `UPLOAD_DIR`           | system temp dir            |
    /// | `DELETE_RESULT_FILES`  | `true`                     |
    ///
    /// Gradio and reconstruction settings are read by
    /// [`GradioConfig::from_env`] and [`ReconstructionParams::from_env`].
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| defaults.port.to_string())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults.request_timeout_secs.to_string())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| defaults.max_upload_bytes.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);

        let delete_result_files: bool = std::env::var("DELETE_RESULT_FILES")
            .unwrap_or_else(|_| defaults.delete_result_files.to_string())
            .parse()
            .expect("DELETE_RESULT_FILES must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            upload_dir,
            delete_result_files,
            gradio: GradioConfig::from_env(),
            reconstruction: ReconstructionParams::from_env(),
        }
    }
}
