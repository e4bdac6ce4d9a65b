use std::path::PathBuf;
use std::time::Duration;

/// Relay client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the relay server, without a path.
    pub server_url: String,
    /// Video to upload.
    pub video_path: PathBuf,
    /// Where the returned GLB is written.
    pub output_path: PathBuf,
    /// How long to wait for the server to start answering.
    pub ready_timeout: Duration,
    /// Delay between liveness probes.
    pub poll_interval: Duration,
    /// Timeout for the upload request, which covers the whole reconstruction.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5001".to_string(),
            video_path: PathBuf::from("../videos/fountain.mp4"),
            output_path: PathBuf::from("vggt/scene.glb"),
            ready_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(600),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Variable                     | Default                    |
    /// |------------------------------|----------------------------|
    /// | `RELAY_SERVER_URL`           | `http://127.0.0.1:5001`    |
    /// | `RELAY_VIDEO_PATH`           | `../videos/fountain.mp4`   |
    /// | `RELAY_OUTPUT_PATH`          | `vggt/scene.glb`           |
    /// | `RELAY_READY_TIMEOUT_SECS`   | `60`                       |
    /// | `RELAY_REQUEST_TIMEOUT_SECS` | `600`                      |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let secs = |name: &str, default: Duration| {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        Self {
            server_url: std::env::var("RELAY_SERVER_URL").unwrap_or(defaults.server_url),
            video_path: std::env::var("RELAY_VIDEO_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.video_path),
            output_path: std::env::var("RELAY_OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            ready_timeout: secs("RELAY_READY_TIMEOUT_SECS", defaults.ready_timeout),
            poll_interval: defaults.poll_interval,
            request_timeout: secs("RELAY_REQUEST_TIMEOUT_SECS", defaults.request_timeout),
        }
    }

    /// URL of the liveness probe.
    pub fn health_url(&self) -> String {
        format!("{}/", self.server_url.trim_end_matches('/'))
    }

    /// URL of the upload endpoint.
    pub fn upload_url(&self) -> String {
        format!("{}/video2glb", self.server_url.trim_end_matches('/'))
    }
}
