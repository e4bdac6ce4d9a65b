//! Shared building blocks for the video2glb tools.
//!
//! Wraps the `ffmpeg`/`ffprobe` binaries, plans which frames to sample from
//! a video, and writes the sampled frames out as numbered PNG files.

pub mod extract;
pub mod ffmpeg;
pub mod frames;
pub mod sampling;
