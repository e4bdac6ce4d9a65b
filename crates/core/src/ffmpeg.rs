//! FFmpeg/FFprobe command utilities.
//!
//! Both binaries are expected on `PATH`. Probing goes through `ffprobe`'s
//! JSON output; single frames are decoded with `ffmpeg` and piped back as
//! PNG bytes.

use std::path::Path;

use serde::Deserialize;

/// Error type for FFmpeg/FFprobe operations.
#[derive(Debug, thiserror::Error)]
pub enum FfmpegError {
    #[error("ffprobe/ffmpeg binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("ffprobe/ffmpeg execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to parse ffprobe output: {0}")]
    ParseError(String),

    #[error("ffmpeg produced no data for frame {0}")]
    EmptyOutput(u64),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("video file not found: {0}")]
    VideoNotFound(String),
}

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

/// Top-level ffprobe JSON output (`-print_format json -show_format -show_streams`).
#[derive(Debug, Deserialize)]
pub struct FfprobeOutput {
    #[serde(default)]
    pub streams: Vec<FfprobeStream>,
    pub format: FfprobeFormat,
}

/// A single stream from ffprobe output.
#[derive(Debug, Deserialize)]
pub struct FfprobeStream {
    pub index: i32,
    pub codec_name: Option<String>,
    pub codec_type: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// e.g. "30/1" or "24000/1001"
    pub r_frame_rate: Option<String>,
    pub duration: Option<String>,
    pub nb_frames: Option<String>,
}

/// Format-level metadata from ffprobe.
#[derive(Debug, Deserialize)]
pub struct FfprobeFormat {
    pub duration: Option<String>,
    pub format_name: Option<String>,
}

/// How `ffmpeg` is told which frame to decode.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameSelection {
    /// Input seek to a timestamp in seconds; the first frame at or after it
    /// is decoded.
    Seek(f64),
    /// Decode from the start and keep only the frame with this number.
    Select(u64),
}

impl FrameSelection {
    /// Pick a selection strategy for `frame_index`.
    ///
    /// With a known frame rate the seek lands a quarter frame before the
    /// frame's presentation time so rounding never skips past it. Without
    /// one, the `select` filter counts frames instead.
    pub fn for_frame(frame_index: u64, framerate: f64) -> Self {
        if framerate > 0.0 {
            let secs = (frame_index as f64 - 0.25).max(0.0) / framerate;
            FrameSelection::Seek(secs)
        } else {
            FrameSelection::Select(frame_index)
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run `ffprobe` on a video file and return the parsed JSON output.
pub async fn probe_video(path: &Path) -> Result<FfprobeOutput, FfmpegError> {
    if !path.exists() {
        return Err(FfmpegError::VideoNotFound(
            path.to_string_lossy().to_string(),
        ));
    }

    let output = tokio::process::Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .await
        .map_err(FfmpegError::NotFound)?;

    if !output.status.success() {
        return Err(FfmpegError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str::<FfprobeOutput>(&stdout)
        .map_err(|e| FfmpegError::ParseError(format!("{e}: {stdout}")))
}

/// Decode a single frame and return it encoded as PNG.
pub async fn decode_frame_png(
    video_path: &Path,
    frame_index: u64,
    selection: &FrameSelection,
) -> Result<Vec<u8>, FfmpegError> {
    if !video_path.exists() {
        return Err(FfmpegError::VideoNotFound(
            video_path.to_string_lossy().to_string(),
        ));
    }

    let mut command = tokio::process::Command::new("ffmpeg");
    command.args(["-nostdin", "-v", "error"]);

    match selection {
        FrameSelection::Seek(secs) => {
            command.args(["-ss", &format!("{secs:.6}"), "-i"]).arg(video_path);
        }
        FrameSelection::Select(n) => {
            command
                .arg("-i")
                .arg(video_path)
                .args(["-vf", &format!("select=eq(n\\,{n})")]);
        }
    }

    let output = command
        .args(["-frames:v", "1", "-f", "image2pipe", "-c:v", "png", "pipe:1"])
        .output()
        .await
        .map_err(FfmpegError::NotFound)?;

    if !output.status.success() {
        return Err(FfmpegError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    if output.stdout.is_empty() {
        return Err(FfmpegError::EmptyOutput(frame_index));
    }

    Ok(output.stdout)
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Find the first video stream in the ffprobe output.
pub fn first_video_stream(probe: &FfprobeOutput) -> Option<&FfprobeStream> {
    probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
}

/// Parse the video duration in seconds from ffprobe output.
pub fn parse_duration(probe: &FfprobeOutput) -> f64 {
    // Try format-level duration first.
    if let Some(d) = &probe.format.duration {
        if let Ok(secs) = d.parse::<f64>() {
            return secs;
        }
    }
    // Fall back to the first video stream's duration.
    if let Some(stream) = first_video_stream(probe) {
        if let Some(d) = &stream.duration {
            if let Ok(secs) = d.parse::<f64>() {
                return secs;
            }
        }
    }
    0.0
}

/// Parse the video framerate from ffprobe output.
///
/// The `r_frame_rate` field is a fraction like `"30/1"` or `"24000/1001"`.
pub fn parse_framerate(probe: &FfprobeOutput) -> f64 {
    first_video_stream(probe)
        .and_then(|s| s.r_frame_rate.as_deref())
        .map(parse_fraction)
        .unwrap_or(0.0)
}

/// Parse a fraction string like `"30/1"` into a float.
fn parse_fraction(s: &str) -> f64 {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() == 2 {
        let num = parts[0].parse::<f64>().unwrap_or(0.0);
        let den = parts[1].parse::<f64>().unwrap_or(1.0);
        if den > 0.0 {
            return num / den;
        }
    }
    s.parse::<f64>().unwrap_or(0.0)
}

/// Count total frames from ffprobe output.
pub fn parse_total_frames(probe: &FfprobeOutput) -> u64 {
    if let Some(stream) = first_video_stream(probe) {
        if let Some(nb) = &stream.nb_frames {
            if let Ok(n) = nb.parse::<u64>() {
                return n;
            }
        }
    }
    // Estimate from duration * framerate.
    let duration = parse_duration(probe);
    let fps = parse_framerate(probe);
    if duration > 0.0 && fps > 0.0 {
        return (duration * fps).round() as u64;
    }
    0
}

/// Find the first video stream's resolution.
pub fn parse_resolution(probe: &FfprobeOutput) -> (i32, i32) {
    first_video_stream(probe)
        .map(|s| (s.width.unwrap_or(0), s.height.unwrap_or(0)))
        .unwrap_or((0, 0))
}
