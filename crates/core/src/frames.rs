//! Random-access frame decoding.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::DynamicImage;

use crate::ffmpeg::{self, FfmpegError, FrameSelection};

/// Errors from a [`FrameSource`].
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Ffmpeg(#[from] FfmpegError),

    #[error("failed to decode frame image: {0}")]
    Image(#[from] image::ImageError),

    #[error("no video stream in {0}")]
    NoVideoStream(String),
}

/// A video that can be asked for individual frames by index.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Total number of frames the source reports.
    fn frame_count(&self) -> u64;

    /// Decode the frame at `index` (0-based).
    async fn decode_frame(&self, index: u64) -> Result<DynamicImage, SourceError>;
}

/// A video file decoded through the `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegVideo {
    path: PathBuf,
    total_frames: u64,
    framerate: f64,
}

impl FfmpegVideo {
    /// Probe `path` and prepare it for frame decoding.
    pub async fn open(path: &Path) -> Result<Self, SourceError> {
        let probe = ffmpeg::probe_video(path).await?;

        if ffmpeg::first_video_stream(&probe).is_none() {
            return Err(SourceError::NoVideoStream(
                path.to_string_lossy().to_string(),
            ));
        }

        let (width, height) = ffmpeg::parse_resolution(&probe);
        let video = Self {
            path: path.to_path_buf(),
            total_frames: ffmpeg::parse_total_frames(&probe),
            framerate: ffmpeg::parse_framerate(&probe),
        };

        tracing::debug!(
            path = %video.path.display(),
            total_frames = video.total_frames,
            framerate = video.framerate,
            width,
            height,
            "Opened video",
        );

        Ok(video)
    }
}

#[async_trait]
impl FrameSource for FfmpegVideo {
    fn frame_count(&self) -> u64 {
        self.total_frames
    }

    async fn decode_frame(&self, index: u64) -> Result<DynamicImage, SourceError> {
        let selection = FrameSelection::for_frame(index, self.framerate);
        let png = ffmpeg::decode_frame_png(&self.path, index, &selection).await?;
        Ok(image::load_from_memory_with_format(
            &png,
            image::ImageFormat::Png,
        )?)
    }
}
