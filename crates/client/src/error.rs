use std::time::Duration;

/// Everything that can go wrong while relaying a video.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The input video does not exist.
    #[error("Video file not found at {0}")]
    VideoNotFound(String),

    /// The server never answered the liveness probe.
    #[error("Server did not become ready within {}s", .waited.as_secs())]
    ServerUnreachable { waited: Duration },

    /// The upload was sent but no response arrived in time. The server is
    /// likely still reconstructing.
    #[error("The request timed out after {}s; the server is likely still processing", .after.as_secs())]
    RequestTimeout { after: Duration },

    /// The server answered with a non-2xx status.
    #[error("Server returned {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection-level failure during the upload.
    #[error("Error communicating with the server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pull a human-readable message out of an error response body.
///
/// Uses the `error` key of a JSON body when present, otherwise the raw text.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
