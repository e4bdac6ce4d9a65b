//! `video2glb-extractor` -- sample frames uniformly from a video.
//!
//! Reads `<videos-dir>/<name>.mp4` and writes up to `--frames` images to
//! `<data-dir>/<name>/images/000001.png`, `000002.png`, ... When no name is
//! given on the command line it is asked for interactively.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dialoguer::Input;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video2glb_core::extract::{self, VideoLayout};
use video2glb_core::sampling::DEFAULT_FRAME_COUNT;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Video name, without the `.mp4` extension
    name: Option<String>,

    /// Number of frames to sample
    #[arg(short = 'n', long, default_value_t = DEFAULT_FRAME_COUNT)]
    frames: u64,

    /// Directory holding the input videos
    #[arg(long, default_value = "videos")]
    videos_dir: PathBuf,

    /// Directory receiving `<name>/images`
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "video2glb_extractor=info,video2glb_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let name = match cli.name {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Enter video name (without .mp4 extension)")
            .interact_text()
            .context("Failed to read video name")?,
    };
    let name = name.trim().to_string();

    let layout = VideoLayout {
        videos_dir: cli.videos_dir,
        data_dir: cli.data_dir,
        frame_count: cli.frames,
    };

    tracing::info!(
        video = %layout.video_path(&name).display(),
        frames = layout.frame_count,
        "Starting frame extraction",
    );

    let report = extract::sample_video(&layout, &name)
        .await
        .with_context(|| format!("Frame extraction failed for '{name}'"))?;

    if !report.skipped.is_empty() {
        tracing::warn!(skipped = ?report.skipped, "Some frames could not be read");
    }

    Ok(())
}
