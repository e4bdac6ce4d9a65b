//! Client library for the hosted VGGT reconstruction demo.
//!
//! Provides a REST/SSE wrapper around the Gradio app that runs the model,
//! the narrow [`backend::ReconstructionBackend`] interface the relay
//! consumes, and the two-step [`reconstruct::Reconstructor`] flow built on
//! top of it.

pub mod api;
pub mod backend;
pub mod config;
pub mod reconstruct;
