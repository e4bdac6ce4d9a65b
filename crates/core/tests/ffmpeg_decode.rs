//! Frame decoding through the real `ffmpeg`/`ffprobe` binaries.
//!
//! Each test renders a short synthetic clip with the `testsrc` source. When
//! the binaries are not installed the tests return early.

use std::path::{Path, PathBuf};
use std::process::Command;

use video2glb_core::ffmpeg::{self, FrameSelection};
use video2glb_core::frames::{FfmpegVideo, FrameSource};

const FPS: u32 = 10;
const SECONDS: u32 = 2;

fn ffmpeg_available() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|bin| {
        Command::new(bin)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    })
}

/// Render a 64x48 clip with a keyframe every 4 frames, so seeking has to
/// decode forward from a keyframe.
fn render_clip(dir: &Path) -> PathBuf {
    let path = dir.join("testsrc.mp4");
    let status = Command::new("ffmpeg")
        .args(["-v", "error", "-y", "-f", "lavfi", "-i"])
        .arg(format!("testsrc=size=64x48:rate={FPS}:duration={SECONDS}"))
        .args(["-c:v", "mpeg4", "-q:v", "2", "-g", "4", "-pix_fmt", "yuv420p"])
        .arg(&path)
        .status()
        .unwrap();
    assert!(status.success(), "ffmpeg failed to render test clip");
    path
}

async fn decode_selected(path: &Path, index: u64) -> Vec<u8> {
    let png = ffmpeg::decode_frame_png(path, index, &FrameSelection::Select(index))
        .await
        .unwrap();
    image::load_from_memory(&png).unwrap().to_rgb8().into_raw()
}

// ---------------------------------------------------------------------------
// Test: probing reports the rendered frame count
// ---------------------------------------------------------------------------

#[tokio::test]
async fn open_reports_frame_count() {
    if !ffmpeg_available() {
        eprintln!("ffmpeg not installed, skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let clip = render_clip(dir.path());

    let video = FfmpegVideo::open(&clip).await.unwrap();

    assert_eq!(video.frame_count(), u64::from(FPS * SECONDS));
}

// ---------------------------------------------------------------------------
// Test: seeking lands on the requested frame
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seek_returns_requested_frame() {
    if !ffmpeg_available() {
        eprintln!("ffmpeg not installed, skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let clip = render_clip(dir.path());
    let video = FfmpegVideo::open(&clip).await.unwrap();

    for index in [0u64, 6, 7, 19] {
        let seeked = video.decode_frame(index).await.unwrap();
        assert_eq!((seeked.width(), seeked.height()), (64, 48));

        let expected = decode_selected(&clip, index).await;
        assert!(
            seeked.to_rgb8().into_raw() == expected,
            "frame {index} decoded by seeking differs from the filtered decode"
        );
    }

    // Neighbouring frames differ, so the comparison above is meaningful.
    assert_ne!(decode_selected(&clip, 6).await, decode_selected(&clip, 7).await);
}

// ---------------------------------------------------------------------------
// Test: a frame past the end is an error, not a silent repeat
// ---------------------------------------------------------------------------

#[tokio::test]
async fn frame_past_end_fails() {
    if !ffmpeg_available() {
        eprintln!("ffmpeg not installed, skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let clip = render_clip(dir.path());
    let video = FfmpegVideo::open(&clip).await.unwrap();

    assert!(video.decode_frame(500).await.is_err());
}
