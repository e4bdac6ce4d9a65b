//! Frame extraction: decode the planned frames and write them as PNGs.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::frames::{FfmpegVideo, FrameSource, SourceError};
use crate::sampling::{SamplePlan, DEFAULT_FRAME_COUNT};

/// Errors from a frame extraction run.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The input video could not be opened. Fatal, nothing is written.
    #[error("could not open video {path}: {source}")]
    VideoOpen {
        path: String,
        #[source]
        source: SourceError,
    },

    /// A single frame could not be decoded. The run skips it and continues.
    #[error("could not read frame {index}: {source}")]
    FrameDecode {
        index: u64,
        #[source]
        source: SourceError,
    },

    #[error("failed to encode frame {index}: {source}")]
    Encode {
        index: u64,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where input videos live and where extracted frames go.
///
/// | Field         | Default  |
/// |---------------|----------|
/// | `videos_dir`  | `videos` |
/// | `data_dir`    | `data`   |
/// | `frame_count` | `100`    |
#[derive(Debug, Clone)]
pub struct VideoLayout {
    pub videos_dir: PathBuf,
    pub data_dir: PathBuf,
    pub frame_count: u64,
}

impl Default for VideoLayout {
    fn default() -> Self {
        Self {
            videos_dir: PathBuf::from("videos"),
            data_dir: PathBuf::from("data"),
            frame_count: DEFAULT_FRAME_COUNT,
        }
    }
}

impl VideoLayout {
    /// `<videos_dir>/<name>.mp4`
    pub fn video_path(&self, name: &str) -> PathBuf {
        self.videos_dir.join(format!("{name}.mp4"))
    }

    /// `<data_dir>/<name>/images`
    pub fn output_dir(&self, name: &str) -> PathBuf {
        self.data_dir.join(name).join("images")
    }
}

/// Outcome of an extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Frames planned for extraction.
    pub planned: usize,
    /// Files written, in plan order.
    pub written: Vec<PathBuf>,
    /// Source frame indices that failed to decode.
    pub skipped: Vec<u64>,
}

impl ExtractionReport {
    pub fn extracted(&self) -> usize {
        self.written.len()
    }
}

/// File name for the frame at 1-based position `sequence` in the plan.
pub fn frame_file_name(sequence: usize) -> String {
    format!("{sequence:06}.png")
}

/// Decode every frame in `plan` from `source` and write it into `output_dir`.
///
/// Frames are named by their 1-based position in the plan, not by their
/// source index, so a skipped frame leaves a gap in the numbering.
pub async fn extract_frames(
    source: &dyn FrameSource,
    plan: &SamplePlan,
    output_dir: &Path,
) -> Result<ExtractionReport, FrameError> {
    tokio::fs::create_dir_all(output_dir).await?;

    let mut report = ExtractionReport {
        planned: plan.len(),
        ..Default::default()
    };

    for (position, &index) in plan.indices().iter().enumerate() {
        let sequence = position + 1;

        let frame = match source.decode_frame(index).await {
            Ok(frame) => frame,
            Err(cause) => {
                let err = FrameError::FrameDecode {
                    index,
                    source: cause,
                };
                tracing::warn!(error = %err, index, "Skipping frame");
                report.skipped.push(index);
                continue;
            }
        };

        let mut png = Cursor::new(Vec::new());
        frame
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|source| FrameError::Encode { index, source })?;

        let file_name = frame_file_name(sequence);
        let path = output_dir.join(&file_name);
        tokio::fs::write(&path, png.into_inner()).await?;

        tracing::info!(
            index,
            "Extracted frame {sequence}/{}: {file_name}",
            plan.len(),
        );
        report.written.push(path);
    }

    Ok(report)
}

/// Sample `layout.frame_count` frames from the video called `name`.
///
/// Opens `<videos_dir>/<name>.mp4` and writes into
/// `<data_dir>/<name>/images`.
pub async fn sample_video(layout: &VideoLayout, name: &str) -> Result<ExtractionReport, FrameError> {
    let video_path = layout.video_path(name);
    let video = FfmpegVideo::open(&video_path)
        .await
        .map_err(|source| FrameError::VideoOpen {
            path: video_path.to_string_lossy().to_string(),
            source,
        })?;

    let plan = SamplePlan::new(video.frame_count(), layout.frame_count);
    let output_dir = layout.output_dir(name);
    let report = extract_frames(&video, &plan, &output_dir).await?;

    tracing::info!(
        extracted = report.extracted(),
        skipped = report.skipped.len(),
        output_dir = %output_dir.display(),
        "Successfully extracted {} frames",
        report.extracted(),
    );

    Ok(report)
}
