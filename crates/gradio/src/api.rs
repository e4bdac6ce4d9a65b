//! REST client for a Gradio app's HTTP endpoints.
//!
//! Wraps file upload, the two-phase `call` protocol (submit, then read the
//! server-sent event stream for the result) and file download using
//! [`reqwest`].

use std::path::Path;

use reqwest::multipart::Part;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

/// HTTP client for a single Gradio app.
pub struct GradioApi {
    client: reqwest::Client,
    api_url: String,
}

/// Response returned by `POST /gradio_api/call/{api_name}`.
#[derive(Debug, Deserialize)]
pub struct CallResponse {
    /// Identifier used to fetch the result stream.
    pub event_id: String,
}

/// Errors from the Gradio REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum GradioApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gradio returned a non-2xx status code.
    #[error("Gradio API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The app reported an error event while running the endpoint.
    #[error("Gradio endpoint '{endpoint}' failed: {message}")]
    Remote { endpoint: String, message: String },

    /// The response did not follow the expected protocol.
    #[error("Unexpected Gradio response: {0}")]
    Protocol(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GradioApi {
    /// Create a new API client for a Gradio app.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `https://abc123.gradio.live`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    /// Upload a local file to the app's temporary storage.
    ///
    /// Sends `POST /gradio_api/upload` and returns the server-side path
    /// that later calls reference the file by.
    pub async fn upload_file(&self, path: &Path) -> Result<String, GradioApiError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.bin".to_string());
        let part = streamed_part(path).await?.file_name(file_name);
        let form = reqwest::multipart::Form::new().part("files", part);

        let response = self
            .client
            .post(format!("{}/gradio_api/upload", self.api_url))
            .multipart(form)
            .send()
            .await?;

        let paths: Vec<String> = Self::parse_response(response).await?;
        paths
            .into_iter()
            .next()
            .ok_or_else(|| GradioApiError::Protocol("upload returned no file paths".into()))
    }

    /// Run a named endpoint and wait for its outputs.
    ///
    /// `endpoint` is the API name without the leading slash, e.g.
    /// `gradio_demo`. `data` holds the positional inputs.
    pub async fn call(&self, endpoint: &str, data: Vec<Value>) -> Result<Vec<Value>, GradioApiError> {
        let response = self
            .client
            .post(format!("{}/gradio_api/call/{endpoint}", self.api_url))
            .json(&json!({ "data": data }))
            .send()
            .await?;

        let CallResponse { event_id } = Self::parse_response(response).await?;
        tracing::debug!(endpoint, event_id = %event_id, "Gradio call queued");

        let response = self
            .client
            .get(format!(
                "{}/gradio_api/call/{endpoint}/{event_id}",
                self.api_url
            ))
            .send()
            .await?;
        let body = Self::ensure_success(response).await?.text().await?;

        parse_event_stream(endpoint, &body)
    }

    /// Resolve an output value to a downloadable URL.
    ///
    /// File outputs arrive either as a `FileData` object (with `url` and/or
    /// `path`) or as a bare server path. Returns `None` for `null` and empty
    /// values.
    pub fn file_url(&self, value: &Value) -> Option<String> {
        let path = match value {
            Value::String(path) => path.as_str(),
            Value::Object(map) => {
                if let Some(url) = map.get("url").and_then(Value::as_str) {
                    if !url.is_empty() {
                        return Some(url.to_string());
                    }
                }
                map.get("path").and_then(Value::as_str).unwrap_or("")
            }
            _ => "",
        };

        if path.is_empty() {
            None
        } else if path.starts_with("http://") || path.starts_with("https://") {
            Some(path.to_string())
        } else {
            Some(format!("{}/gradio_api/file={path}", self.api_url))
        }
    }

    /// Download `url` into `destination`, returning the number of bytes.
    pub async fn download(&self, url: &str, destination: &Path) -> Result<u64, GradioApiError> {
        let response = self.client.get(url).send().await?;
        let mut response = Self::ensure_success(response).await?;

        let mut file = tokio::fs::File::create(destination).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`GradioApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GradioApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GradioApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GradioApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// A multipart part that streams `path` from disk instead of buffering it.
async fn streamed_part(path: &Path) -> Result<Part, GradioApiError> {
    let file = tokio::fs::File::open(path).await?;
    let len = file.metadata().await?.len();
    let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
    Ok(Part::stream_with_length(body, len))
}

/// Wrap a server-side path as a `FileData` input value.
pub fn file_data(server_path: &str) -> Value {
    let orig_name = Path::new(server_path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string());
    json!({
        "path": server_path,
        "orig_name": orig_name,
        "meta": { "_type": "gradio.FileData" },
    })
}

/// Extract the outputs from a `call` result stream.
///
/// The stream is a sequence of `event: <name>` / `data: <json>` pairs.
/// `complete` carries the output array; `error` aborts; `generating` and
/// `heartbeat` are ignored.
pub fn parse_event_stream(endpoint: &str, body: &str) -> Result<Vec<Value>, GradioApiError> {
    let mut event = "";

    for line in body.lines() {
        if let Some(name) = line.strip_prefix("event:") {
            event = name.trim();
            continue;
        }
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();

        match event {
            "complete" => {
                return serde_json::from_str::<Vec<Value>>(data).map_err(|e| {
                    GradioApiError::Protocol(format!("bad completion payload ({e}): {data}"))
                });
            }
            "error" => {
                let message = match serde_json::from_str::<Value>(data) {
                    Ok(Value::String(s)) => s,
                    Ok(Value::Null) => "the app reported an error without details".to_string(),
                    _ if data.is_empty() => "the app reported an error without details".to_string(),
                    _ => data.to_string(),
                };
                return Err(GradioApiError::Remote {
                    endpoint: endpoint.to_string(),
                    message,
                });
            }
            _ => {}
        }
    }

    Err(GradioApiError::Protocol(format!(
        "event stream for '{endpoint}' ended without a result"
    )))
}
