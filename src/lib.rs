//! Real-time single-channel audio enhancement core.
//!
//! Ingests floating-point samples at a fixed 48 kHz and emits an enhanced
//! stream of identical rate and length. Enhancement is four serially
//! composed stages: a 10-band parametric EQ, a scalar pre-gain, a neural
//! noise-reduction stage operating in the short-time Fourier domain, and a
//! scalar post-gain.
//!
//! This crate is a library only: audio capture/playback, the FFI/host
//! binding layer, and configuration persistence are a host application's
//! job. See [`Pipeline`] for the per-hop processing contract.

mod config;
mod error;
pub mod dsp;
mod pipeline;

pub use config::{PipelineConfig, SAMPLE_RATE};
pub use error::PipelineError;
pub use pipeline::Pipeline;
