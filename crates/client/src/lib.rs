//! `video2glb-client` library crate.
//!
//! Uploads a local video to the relay server and saves the returned GLB.
//! The binary entrypoint lives in `main.rs`.

pub mod config;
pub mod error;
pub mod readiness;
pub mod upload;
